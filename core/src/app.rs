extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::cache::{CachePolicy, FetchOutcome, WeatherCache};
use crate::display::{BACKLIGHT_DIM, LedColor, Screen};
use crate::errors::{ErrorRecord, ErrorSink};
use crate::framebuffer::FrameBuffer;
use crate::input::{ButtonState, Buttons};
use crate::ticker::Ticker;
use crate::views::{ViewKind, view_for};
use crate::weather::{IconData, WeatherError, WeatherSnapshot, WeatherSource};

/// The application controller. Owns the cache, the error sink, the cursor
/// and the active view tag; borrows the frame buffer and the weather
/// provider for the life of the process. Construct exactly one.
///
/// All mutation funnels through `handle_buttons` and `advance`, which the
/// frontend must call from a single thread of control.
pub struct App<'a, S: WeatherSource> {
    buffers: &'a mut FrameBuffer,
    source: &'a mut S,
    cache: WeatherCache,
    errors: ErrorSink,
    fidx: usize,
    active: ViewKind,
    ticker: Ticker,
    net_info: Vec<String>,
}

impl<'a, S: WeatherSource> App<'a, S> {
    pub fn new(buffers: &'a mut FrameBuffer, source: &'a mut S, net_info: Vec<String>) -> Self {
        Self::with_policy(buffers, source, net_info, CachePolicy::default())
    }

    pub fn with_policy(
        buffers: &'a mut FrameBuffer,
        source: &'a mut S,
        net_info: Vec<String>,
        policy: CachePolicy,
    ) -> Self {
        let active = ViewKind::Page;
        let ticker = Ticker::new(view_for::<S>(active).tick_period_ms());
        Self {
            buffers,
            source,
            cache: WeatherCache::new(policy),
            errors: ErrorSink::new(),
            fidx: 0,
            active,
            ticker,
            net_info,
        }
    }

    pub fn active_view(&self) -> ViewKind {
        self.active
    }

    pub fn cursor(&self) -> usize {
        self.fidx
    }

    pub fn buffers(&mut self) -> &mut FrameBuffer {
        self.buffers
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    pub fn net_info(&self) -> &[String] {
        &self.net_info
    }

    pub fn pending_errors(&self) -> usize {
        self.errors.len()
    }

    pub fn drain_errors(&mut self) -> Vec<ErrorRecord> {
        self.errors.drain()
    }

    /// Make `kind` the active view. The tag swap rebinds the button and tick
    /// dispatch in one move, and the destination renders before returning.
    pub fn switch_to(&mut self, kind: ViewKind, screen: &mut dyn Screen, now: i64) {
        if self.active != kind {
            log::info!("view switch: {:?} -> {:?}", self.active, kind);
        }
        self.active = kind;
        self.ticker.set_period(view_for::<S>(kind).tick_period_ms());
        self.render(screen, now);
    }

    /// Full redraw of the active view.
    pub fn render(&mut self, screen: &mut dyn Screen, now: i64) {
        screen.set_backlight(BACKLIGHT_DIM);
        view_for::<S>(self.active).render(self, screen, now);
    }

    /// Single entry point for the button callback. Only rising edges
    /// dispatch; a button held across frames fires once.
    pub fn handle_buttons(&mut self, buttons: &ButtonState, screen: &mut dyn Screen, now: i64) {
        for button in Buttons::ALL {
            if buttons.is_pressed(button) {
                self.dispatch(button, screen, now);
            }
        }
    }

    /// Hardware-level entry point for pin interrupts. Release edges are
    /// no-ops; a pin outside the button map is a caller bug.
    pub fn on_pin(&mut self, pin: u8, pressed: bool, screen: &mut dyn Screen, now: i64) {
        if !pressed {
            return;
        }
        let Some(button) = Buttons::from_pin(pin) else {
            panic!("button callback fired for unmapped pin {pin}");
        };
        self.dispatch(button, screen, now);
    }

    fn dispatch(&mut self, button: Buttons, screen: &mut dyn Screen, now: i64) {
        log::debug!("button {:?} on {:?}", button, self.active);
        let view = view_for::<S>(self.active);
        match button {
            Buttons::A => view.button_a(self, screen, now),
            Buttons::B => view.button_b(self, screen, now),
            Buttons::X => view.button_x(self, screen, now),
            Buttons::Y => view.button_y(self, screen, now),
        }
    }

    /// Background ticker entry point; `elapsed_ms` is wall time since the
    /// previous call. Fires the active view's tick at most once per call.
    pub fn advance(&mut self, elapsed_ms: u32, screen: &mut dyn Screen, now: i64) {
        if self.ticker.advance(elapsed_ms) {
            view_for::<S>(self.active).on_tick(self, screen, now);
        }
    }

    /// Clamp-adjust the cursor within `[0, forecast.len()]`.
    pub fn move_cursor(&mut self, delta: i32) {
        let max = self.cache.forecast().len() as i64;
        self.fidx = (self.fidx as i64 + delta as i64).clamp(0, max) as usize;
    }

    /// Index 0 is the current observation; forecast entries follow.
    pub fn snapshot_at(&self, index: usize) -> Option<&WeatherSnapshot> {
        if index == 0 {
            self.cache.current()
        } else {
            self.cache.forecast().get(index - 1)
        }
    }

    /// Refresh both series through the cache, capturing any failure into the
    /// sink so the caller's render pass carries on with cached data.
    pub(crate) fn refresh_weather(&mut self, screen: &mut dyn Screen, now: i64) {
        if let Err(err) = self.try_refresh(screen, now) {
            self.handle(err, screen);
        }
    }

    fn try_refresh(&mut self, screen: &mut dyn Screen, now: i64) -> Result<(), WeatherError> {
        self.cache.get_current(now, self.source, screen)?;
        if self.cache.get_forecast(now, self.source, screen)? == FetchOutcome::Refreshed {
            self.fidx = 0;
        }
        Ok(())
    }

    /// Record a failure and raise the alert LED. The sink itself does not
    /// own the indicator, so the raise happens here.
    pub(crate) fn handle(&mut self, err: WeatherError, screen: &mut dyn Screen) {
        log::warn!("refresh failed: {err}");
        self.errors.record(ErrorRecord::from(err));
        screen.set_led(LedColor::RED);
    }

    /// Icon lookup that degrades to no icon instead of failing the render.
    pub(crate) fn fetch_icon(&mut self, code: &str, screen: &mut dyn Screen) -> Option<IconData> {
        match self.source.fetch_icon(code) {
            Ok(icon) => Some(icon),
            Err(err) => {
                self.handle(err, screen);
                None
            }
        }
    }

    pub fn invalidate_icons(&mut self) {
        self.source.invalidate_icons();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{forecast_series, snapshot, TestScreen, TestSource};

    fn loaded_app<'a>(
        buffers: &'a mut FrameBuffer,
        source: &'a mut TestSource,
        screen: &mut TestScreen,
        now: i64,
    ) -> App<'a, TestSource> {
        let mut app = App::new(buffers, source, Vec::new());
        // Prime the cache so cursor bounds are in place.
        app.refresh_weather(screen, now);
        app
    }

    #[test]
    fn cursor_clamps_in_both_directions() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::with_data(snapshot(1_000), forecast_series(2_000, 10));
        let mut screen = TestScreen::new();
        let mut app = loaded_app(&mut buffers, &mut source, &mut screen, 1_000);

        app.move_cursor(-5);
        assert_eq!(app.cursor(), 0);
        app.move_cursor(3);
        assert_eq!(app.cursor(), 3);
        app.move_cursor(100);
        assert_eq!(app.cursor(), 10);
        app.move_cursor(-4);
        assert_eq!(app.cursor(), 6);
        app.move_cursor(-100);
        assert_eq!(app.cursor(), 0);
    }

    #[test]
    fn eleven_next_presses_clamp_at_series_length() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::with_data(snapshot(1_000), forecast_series(2_000, 10));
        let mut screen = TestScreen::new();
        let mut app = loaded_app(&mut buffers, &mut source, &mut screen, 1_000);

        let mut buttons = ButtonState::default();
        for _ in 0..11 {
            buttons.update(1 << (Buttons::Y as u8));
            app.handle_buttons(&buttons, &mut screen, 1_000);
            buttons.update(0);
            app.handle_buttons(&buttons, &mut screen, 1_000);
        }
        assert_eq!(app.cursor(), 10);
        assert_eq!(app.active_view(), ViewKind::Page);
    }

    #[test]
    fn held_button_dispatches_once() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::with_data(snapshot(1_000), forecast_series(2_000, 10));
        let mut screen = TestScreen::new();
        let mut app = loaded_app(&mut buffers, &mut source, &mut screen, 1_000);

        let mut buttons = ButtonState::default();
        buttons.update(1 << (Buttons::Y as u8));
        app.handle_buttons(&buttons, &mut screen, 1_000);
        // Second frame with the button still down: no edge, no dispatch.
        buttons.update(1 << (Buttons::Y as u8));
        app.handle_buttons(&buttons, &mut screen, 1_000);
        assert_eq!(app.cursor(), 1);
    }

    #[test]
    fn forecast_replacement_resets_cursor() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::with_data(snapshot(1_000), forecast_series(2_000, 10));
        let state = source.handle();
        let mut screen = TestScreen::new();
        let mut app = loaded_app(&mut buffers, &mut source, &mut screen, 1_000);

        app.move_cursor(7);
        assert_eq!(app.cursor(), 7);

        // Head entry (t=2_000) is in the past at now=30_000: replacement due.
        state.borrow_mut().forecast = Some(forecast_series(40_000, 10));
        state.borrow_mut().current = Some(snapshot(30_000));
        app.refresh_weather(&mut screen, 30_000);
        assert_eq!(app.cursor(), 0);
    }

    #[test]
    fn switch_renders_destination_exactly_once_and_rebinds_dispatch() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::with_data(snapshot(1_000), forecast_series(2_000, 10));
        let mut screen = TestScreen::new();
        let mut app = loaded_app(&mut buffers, &mut source, &mut screen, 1_000);

        // On the page view, Y steps the cursor by one.
        let mut buttons = ButtonState::default();
        buttons.update(1 << (Buttons::Y as u8));
        app.handle_buttons(&buttons, &mut screen, 1_000);
        assert_eq!(app.cursor(), 1);

        let flushes_before = screen.flushes;
        buttons.update(0);
        app.handle_buttons(&buttons, &mut screen, 1_000);
        buttons.update(1 << (Buttons::A as u8));
        app.handle_buttons(&buttons, &mut screen, 1_000);
        assert_eq!(app.active_view(), ViewKind::Grid);
        assert_eq!(screen.flushes, flushes_before + 1);

        // Same physical button, new handler set: Y now steps by four.
        buttons.update(0);
        app.handle_buttons(&buttons, &mut screen, 1_000);
        buttons.update(1 << (Buttons::Y as u8));
        app.handle_buttons(&buttons, &mut screen, 1_000);
        assert_eq!(app.cursor(), 5);
    }

    #[test]
    fn switch_rebinds_tick_period() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::with_data(snapshot(1_000), forecast_series(2_000, 10));
        let mut screen = TestScreen::new();
        let mut app = loaded_app(&mut buffers, &mut source, &mut screen, 1_000);

        app.switch_to(ViewKind::Errors, &mut screen, 1_000);
        let flushes_before = screen.flushes;
        // The errors view ticks on a one-second clock period.
        app.advance(1_000, &mut screen, 1_000);
        assert_eq!(screen.flushes, flushes_before + 1);

        app.switch_to(ViewKind::Page, &mut screen, 1_000);
        let flushes_before = screen.flushes;
        app.advance(1_000, &mut screen, 1_000);
        assert_eq!(screen.flushes, flushes_before);
        app.advance(59_000, &mut screen, 1_000);
        assert_eq!(screen.flushes, flushes_before + 1);
    }

    #[test]
    fn failed_fetch_with_no_cache_records_once_and_render_completes() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::new();
        let mut screen = TestScreen::new();
        let mut app = App::new(&mut buffers, &mut source, Vec::new());

        app.render(&mut screen, 1_000);
        assert_eq!(app.pending_errors(), 1);
        assert_eq!(screen.flushes, 1);
        assert_eq!(screen.led_log.last(), Some(&LedColor::RED));
        assert!(app.snapshot_at(0).is_none());
    }

    #[test]
    fn errors_view_drains_sink_and_clears_alert() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::new();
        let mut screen = TestScreen::new();
        let mut app = App::new(&mut buffers, &mut source, Vec::new());

        app.render(&mut screen, 1_000);
        assert_eq!(app.pending_errors(), 1);

        app.switch_to(ViewKind::Errors, &mut screen, 1_000);
        assert_eq!(app.pending_errors(), 0);
        assert_eq!(screen.led_log.last(), Some(&LedColor::OFF));
    }

    #[test]
    fn failed_refresh_keeps_showing_cached_data() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::with_data(snapshot(1_000), forecast_series(2_000, 10));
        let state = source.handle();
        let mut screen = TestScreen::new();
        let mut app = loaded_app(&mut buffers, &mut source, &mut screen, 1_000);

        state.borrow_mut().current = None;
        state.borrow_mut().forecast = None;
        // Stale at now=10_000, refresh fails, render still completes with
        // the cached snapshot.
        let flushes_before = screen.flushes;
        app.render(&mut screen, 10_000);
        assert_eq!(screen.flushes, flushes_before + 1);
        assert_eq!(app.pending_errors(), 1);
        assert_eq!(app.snapshot_at(0).map(|s| s.timestamp), Some(1_000));
    }

    #[test]
    fn page_render_refreshes_through_the_cache() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::with_data(snapshot(1_000), forecast_series(2_000, 10));
        let state = source.handle();
        let mut screen = TestScreen::new();
        let mut app = App::new(&mut buffers, &mut source, Vec::new());

        app.render(&mut screen, 1_000);
        app.render(&mut screen, 1_000);
        // Two renders at one instant, one network round per series.
        assert_eq!(state.borrow().current_fetches, 1);
        assert_eq!(state.borrow().forecast_fetches, 1);
    }

    #[test]
    fn tick_rerenders_the_active_view() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::with_data(snapshot(1_000), forecast_series(2_000, 10));
        let mut screen = TestScreen::new();
        let mut app = loaded_app(&mut buffers, &mut source, &mut screen, 1_000);

        let flushes_before = screen.flushes;
        app.advance(59_999, &mut screen, 1_000);
        assert_eq!(screen.flushes, flushes_before);
        app.advance(1, &mut screen, 1_000);
        assert_eq!(screen.flushes, flushes_before + 1);
    }

    #[test]
    fn unmapped_pin_release_is_ignored_and_pin_dispatch_works() {
        let mut buffers = FrameBuffer::new();
        let mut source = TestSource::with_data(snapshot(1_000), forecast_series(2_000, 10));
        let mut screen = TestScreen::new();
        let mut app = loaded_app(&mut buffers, &mut source, &mut screen, 1_000);

        // Release edge: no dispatch even on a mapped pin.
        app.on_pin(Buttons::Y.pin(), false, &mut screen, 1_000);
        assert_eq!(app.cursor(), 0);

        app.on_pin(Buttons::Y.pin(), true, &mut screen, 1_000);
        assert_eq!(app.cursor(), 1);
    }
}
