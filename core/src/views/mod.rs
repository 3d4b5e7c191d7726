mod errors;
mod grid;
mod page;

pub use errors::ErrorsView;
pub use grid::GridView;
pub use page::PageView;

use crate::app::App;
use crate::display::Screen;
use crate::ticker::DEFAULT_TICK_MS;
use crate::weather::WeatherSource;

/// Tag for the closed set of display modes. The controller's active tag is
/// the single indirection every button and tick event routes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    Page,
    Grid,
    Errors,
}

/// One display mode: a full-redraw render pass, a handler per face button
/// (no-op unless overridden) and an optional periodic tick. Views hold no
/// state of their own; everything shared lives on the controller.
pub trait View<S: WeatherSource> {
    fn render(&self, app: &mut App<'_, S>, screen: &mut dyn Screen, now: i64);

    fn button_a(&self, _app: &mut App<'_, S>, _screen: &mut dyn Screen, _now: i64) {}
    fn button_b(&self, _app: &mut App<'_, S>, _screen: &mut dyn Screen, _now: i64) {}
    fn button_x(&self, _app: &mut App<'_, S>, _screen: &mut dyn Screen, _now: i64) {}
    fn button_y(&self, _app: &mut App<'_, S>, _screen: &mut dyn Screen, _now: i64) {}

    fn on_tick(&self, _app: &mut App<'_, S>, _screen: &mut dyn Screen, _now: i64) {}

    fn tick_period_ms(&self) -> u32 {
        DEFAULT_TICK_MS
    }
}

pub fn view_for<S: WeatherSource>(kind: ViewKind) -> &'static dyn View<S> {
    match kind {
        ViewKind::Page => &PageView,
        ViewKind::Grid => &GridView,
        ViewKind::Errors => &ErrorsView,
    }
}
