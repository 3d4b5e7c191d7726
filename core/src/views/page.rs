use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;

use crate::app::App;
use crate::display::Screen;
use crate::ui;
use crate::views::{View, ViewKind};
use crate::weather::WeatherSource;

/// One snapshot per screen: the current observation at cursor 0, forecast
/// entries after it.
pub struct PageView;

impl<S: WeatherSource> View<S> for PageView {
    fn render(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        log::debug!("page view, idx {}", app.cursor());
        app.refresh_weather(screen, now);

        let snapshot = app.snapshot_at(app.cursor()).cloned();
        let icon = snapshot
            .as_ref()
            .filter(|snap| !snap.icon.is_empty())
            .map(|snap| snap.icon.clone())
            .and_then(|code| app.fetch_icon(&code, screen));
        let heading = if app.cursor() == 0 { "Current" } else { "Forecast" };

        ui::clear(app.buffers());
        match &snapshot {
            Some(snap) => ui::paint_weather(app.buffers(), snap, icon.as_ref()),
            None => ui::paint_placeholder(app.buffers()),
        }
        ui::text(app.buffers(), heading, 0, ui::HEADER_Y, Rgb565::WHITE);
        screen.flush(app.buffers());
    }

    fn button_a(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.switch_to(ViewKind::Grid, screen, now);
    }

    fn button_b(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.switch_to(ViewKind::Errors, screen, now);
    }

    fn button_x(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.move_cursor(-1);
        app.switch_to(ViewKind::Page, screen, now);
    }

    fn button_y(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.move_cursor(1);
        app.switch_to(ViewKind::Page, screen, now);
    }

    fn on_tick(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.render(screen, now);
    }
}
