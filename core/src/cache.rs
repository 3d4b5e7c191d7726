extern crate alloc;

use alloc::vec::Vec;

use crate::display::{LedColor, Screen};
use crate::weather::{WeatherError, WeatherSnapshot, WeatherSource};

/// Staleness thresholds in seconds. Current weather ages backwards from its
/// observation time; forecasts are judged by the lead time of their first
/// entry, which is future-dated.
#[derive(Clone, Copy, Debug)]
pub struct CachePolicy {
    pub current_max_age: i64,
    pub forecast_margin: i64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            current_max_age: 300,
            forecast_margin: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Cached,
    Refreshed,
}

/// Owns the two refreshable series and decides, lazily at read time, whether
/// a fetch is due. A view that is never visited never triggers traffic.
pub struct WeatherCache {
    current: Option<WeatherSnapshot>,
    forecast: Vec<WeatherSnapshot>,
    policy: CachePolicy,
}

impl WeatherCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            current: None,
            forecast: Vec::new(),
            policy,
        }
    }

    pub fn current(&self) -> Option<&WeatherSnapshot> {
        self.current.as_ref()
    }

    pub fn forecast(&self) -> &[WeatherSnapshot] {
        &self.forecast
    }

    /// Cached snapshot while it is younger than `current_max_age`, otherwise
    /// one provider fetch. On failure the stale value is kept and the error
    /// propagates unchanged.
    pub fn get_current<S: WeatherSource>(
        &mut self,
        now: i64,
        source: &mut S,
        screen: &mut dyn Screen,
    ) -> Result<WeatherSnapshot, WeatherError> {
        if let Some(snapshot) = &self.current {
            if now - snapshot.timestamp < self.policy.current_max_age {
                return Ok(snapshot.clone());
            }
        }
        let snapshot = {
            let _busy = BusyLight::raise(screen);
            source.fetch_current()?
        };
        log::info!("current weather refreshed (observed {})", snapshot.timestamp);
        self.current = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Cached series while its head entry is still at least `forecast_margin`
    /// seconds ahead of `now`; otherwise a wholesale replacement. The caller
    /// owns the cursor and must reset it on `Refreshed`.
    pub fn get_forecast<S: WeatherSource>(
        &mut self,
        now: i64,
        source: &mut S,
        screen: &mut dyn Screen,
    ) -> Result<FetchOutcome, WeatherError> {
        if let Some(first) = self.forecast.first() {
            if first.timestamp >= now + self.policy.forecast_margin {
                return Ok(FetchOutcome::Cached);
            }
        }
        let series = {
            let _busy = BusyLight::raise(screen);
            source.fetch_forecast()?
        };
        log::info!("forecast refreshed ({} entries)", series.len());
        self.forecast = series;
        Ok(FetchOutcome::Refreshed)
    }
}

/// Holds the busy LED on while a fetch is in flight. Dropping restores it,
/// on the success path and on `?` propagation alike.
struct BusyLight<'a> {
    screen: &'a mut dyn Screen,
}

impl<'a> BusyLight<'a> {
    fn raise(screen: &'a mut dyn Screen) -> Self {
        screen.set_led(LedColor::YELLOW);
        Self { screen }
    }
}

impl Drop for BusyLight<'_> {
    fn drop(&mut self) {
        self.screen.set_led(LedColor::OFF);
    }
}
