extern crate alloc;

use alloc::format;
use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;

use crate::app::App;
use crate::display::{LedColor, Screen};
use crate::framebuffer::HEIGHT;
use crate::ui;
use crate::views::{View, ViewKind};
use crate::weather::WeatherSource;

const CLOCK_TICK_MS: u32 = 1_000;
const LIST_TOP: i32 = 44;
const LIST_BOTTOM: i32 = HEIGHT as i32 - 90;
const NET_INFO_TOP: i32 = HEIGHT as i32 - 60;

/// Diagnostics mode: drains the error sink onto the screen, shows the
/// network interface summary and keeps a clock line live between visits.
pub struct ErrorsView;

impl<S: WeatherSource> View<S> for ErrorsView {
    fn render(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        log::debug!("errors view");
        screen.set_led(LedColor::OFF);
        let records = app.drain_errors();
        let net_info: Vec<_> = app.net_info().to_vec();

        ui::clear(app.buffers());
        if records.is_empty() {
            ui::text(app.buffers(), "No errors!", 0, ui::HEADER_Y, Rgb565::WHITE);
        } else {
            ui::text(app.buffers(), "Errors", 0, ui::HEADER_Y, Rgb565::RED);
            let mut y = LIST_TOP;
            let mut hidden = 0usize;
            for record in &records {
                log::warn!("surfacing error: {}", record.message);
                if y > LIST_BOTTOM {
                    hidden += 1;
                    continue;
                }
                ui::text(app.buffers(), &record.message, 20, y, Rgb565::RED);
                y += ui::LINE_HEIGHT;
                if let Some(cause) = &record.cause {
                    if y <= LIST_BOTTOM {
                        ui::small_text(app.buffers(), cause, 32, y - 8, Rgb565::RED);
                        y += ui::SMALL_LINE_HEIGHT;
                    }
                }
            }
            if hidden > 0 {
                ui::small_text(
                    app.buffers(),
                    &format!("... and {hidden} more (see log)"),
                    20,
                    LIST_BOTTOM + 16,
                    Rgb565::RED,
                );
            }
        }

        ui::small_text(
            app.buffers(),
            &ui::timestamp_str(now, true),
            250,
            12,
            Rgb565::WHITE,
        );

        let mut y = NET_INFO_TOP;
        for line in &net_info {
            ui::small_text(app.buffers(), line, 10, y, Rgb565::WHITE);
            y += ui::SMALL_LINE_HEIGHT;
        }
        screen.flush(app.buffers());
    }

    fn button_a(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.switch_to(ViewKind::Page, screen, now);
    }

    fn button_b(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.invalidate_icons();
        app.render(screen, now);
    }

    fn on_tick(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64) {
        app.render(screen, now);
    }

    fn tick_period_ms(&self) -> u32 {
        CLOCK_TICK_MS
    }
}
