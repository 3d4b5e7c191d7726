//! Hand-rolled doubles for the provider and screen seams.

use std::cell::RefCell;
use std::rc::Rc;

use crate::display::{LedColor, Screen};
use crate::framebuffer::FrameBuffer;
use crate::weather::{IconData, WeatherError, WeatherSnapshot, WeatherSource};

#[derive(Default)]
pub struct SourceState {
    /// `None` makes the next fetch fail with a network error.
    pub current: Option<WeatherSnapshot>,
    pub forecast: Option<Vec<WeatherSnapshot>>,
    pub icon: Option<IconData>,
    pub current_fetches: usize,
    pub forecast_fetches: usize,
    pub icon_fetches: usize,
    pub invalidations: usize,
}

/// Programmable provider. State sits behind a shared handle so a test can
/// keep reprogramming results while the controller holds the `&mut` borrow.
pub struct TestSource {
    state: Rc<RefCell<SourceState>>,
}

impl TestSource {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SourceState::default())),
        }
    }

    pub fn with_data(current: WeatherSnapshot, forecast: Vec<WeatherSnapshot>) -> Self {
        let source = Self::new();
        {
            let mut state = source.state.borrow_mut();
            state.current = Some(current);
            state.forecast = Some(forecast);
            state.icon = Some(test_icon());
        }
        source
    }

    pub fn handle(&self) -> Rc<RefCell<SourceState>> {
        Rc::clone(&self.state)
    }

    pub fn set_current(&self, current: Option<WeatherSnapshot>) {
        self.state.borrow_mut().current = current;
    }

    pub fn set_forecast(&self, forecast: Option<Vec<WeatherSnapshot>>) {
        self.state.borrow_mut().forecast = forecast;
    }

    pub fn current_fetches(&self) -> usize {
        self.state.borrow().current_fetches
    }

    pub fn forecast_fetches(&self) -> usize {
        self.state.borrow().forecast_fetches
    }
}

impl WeatherSource for TestSource {
    fn fetch_current(&mut self) -> Result<WeatherSnapshot, WeatherError> {
        let mut state = self.state.borrow_mut();
        state.current_fetches += 1;
        state.current.clone().ok_or(WeatherError::Network)
    }

    fn fetch_forecast(&mut self) -> Result<Vec<WeatherSnapshot>, WeatherError> {
        let mut state = self.state.borrow_mut();
        state.forecast_fetches += 1;
        state.forecast.clone().ok_or(WeatherError::Network)
    }

    fn fetch_icon(&mut self, _code: &str) -> Result<IconData, WeatherError> {
        let mut state = self.state.borrow_mut();
        state.icon_fetches += 1;
        state.icon.clone().ok_or(WeatherError::Network)
    }

    fn invalidate_icons(&mut self) {
        self.state.borrow_mut().invalidations += 1;
    }
}

/// Records every indicator call and counts flushes.
pub struct TestScreen {
    pub flushes: usize,
    pub led_log: Vec<LedColor>,
    pub backlight: f32,
}

impl TestScreen {
    pub fn new() -> Self {
        Self {
            flushes: 0,
            led_log: Vec::new(),
            backlight: 1.0,
        }
    }
}

impl Screen for TestScreen {
    fn flush(&mut self, _buffers: &FrameBuffer) {
        self.flushes += 1;
    }

    fn set_led(&mut self, color: LedColor) {
        self.led_log.push(color);
    }

    fn set_backlight(&mut self, level: f32) {
        self.backlight = level;
    }
}

pub fn snapshot(timestamp: i64) -> WeatherSnapshot {
    WeatherSnapshot {
        timestamp,
        temperature: 21.5,
        feels_like: 20.9,
        humidity: 64,
        icon: "01d".into(),
        location: Some("Testville".into()),
    }
}

/// Entries three hours apart, the provider's forecast cadence.
pub fn forecast_series(start: i64, count: usize) -> Vec<WeatherSnapshot> {
    (0..count)
        .map(|i| {
            let mut entry = snapshot(start + i as i64 * 10_800);
            entry.icon = "10d".into();
            entry
        })
        .collect()
}

pub fn test_icon() -> IconData {
    IconData {
        width: 2,
        height: 2,
        pixels: vec![200; 16],
    }
}
