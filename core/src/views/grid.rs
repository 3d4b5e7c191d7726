use crate::app::App;
use crate::display::Screen;
use crate::framebuffer::{HEIGHT, WIDTH};
use crate::ui;
use crate::views::{View, ViewKind};
use crate::weather::WeatherSource;

/// Cursor step: one full screen of quadrants.
pub const GRID_STEP: i32 = 4;

/// Four consecutive snapshots in quadrants, starting at the cursor. Near the
/// end of the series the trailing cells stay empty.
pub struct GridView;

impl<S: WeatherSource> View<S> for GridView {
    fn render(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        log::debug!("grid view, idx {}", app.cursor());
        app.refresh_weather(screen, now);

        let half_w = WIDTH as i32 / 2;
        let half_h = HEIGHT as i32 / 2;
        let origins = [(0, 0), (half_w, 0), (0, half_h), (half_w, half_h)];

        ui::clear(app.buffers());
        let mut painted = 0usize;
        for (slot, (x, y)) in origins.into_iter().enumerate() {
            let Some(snapshot) = app.snapshot_at(app.cursor() + slot).cloned() else {
                continue;
            };
            let icon = if snapshot.icon.is_empty() {
                None
            } else {
                app.fetch_icon(&snapshot.icon, screen)
            };
            ui::paint_weather_small(app.buffers(), &snapshot, icon.as_ref(), x, y);
            painted += 1;
        }
        if painted == 0 {
            ui::paint_placeholder(app.buffers());
        }
        screen.flush(app.buffers());
    }

    fn button_a(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.switch_to(ViewKind::Page, screen, now);
    }

    fn button_b(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.switch_to(ViewKind::Errors, screen, now);
    }

    fn button_x(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.move_cursor(-GRID_STEP);
        app.switch_to(ViewKind::Grid, screen, now);
    }

    fn button_y(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.move_cursor(GRID_STEP);
        app.switch_to(ViewKind::Grid, screen, now);
    }

    fn on_tick(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.render(screen, now);
    }
}
