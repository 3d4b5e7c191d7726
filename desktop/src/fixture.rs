use std::time::{SystemTime, UNIX_EPOCH};

use skyhat_core::weather::{IconData, WeatherError, WeatherSnapshot, WeatherSource};

const FORECAST_STEP_SECS: i64 = 3 * 3600;
const FORECAST_LEN: usize = 10;
const ICON_SIZE: u32 = 50;

/// Canned provider for running the simulator without credentials. Readings
/// wobble per fetch so refreshes are visible on screen.
pub struct FixtureSource {
    fetches: u32,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self { fetches: 0 }
    }

    fn sample(&self, timestamp: i64, offset: u32) -> WeatherSnapshot {
        let wobble = ((self.fetches + offset) % 7) as f32 * 0.4;
        WeatherSnapshot {
            timestamp,
            temperature: 17.0 + wobble + offset as f32 * 0.3,
            feels_like: 16.2 + wobble,
            humidity: 55 + ((self.fetches + offset) % 20) as u8,
            icon: if offset % 3 == 0 { "01d" } else { "10d" }.to_string(),
            location: Some("Fixtureham".to_string()),
        }
    }
}

impl WeatherSource for FixtureSource {
    fn fetch_current(&mut self) -> Result<WeatherSnapshot, WeatherError> {
        self.fetches += 1;
        Ok(self.sample(unix_now(), 0))
    }

    fn fetch_forecast(&mut self) -> Result<Vec<WeatherSnapshot>, WeatherError> {
        self.fetches += 1;
        let now = unix_now();
        // First entry on the next three-hour boundary, like the live API.
        let first = (now / FORECAST_STEP_SECS + 1) * FORECAST_STEP_SECS;
        Ok((0..FORECAST_LEN)
            .map(|i| self.sample(first + i as i64 * FORECAST_STEP_SECS, i as u32 + 1))
            .collect())
    }

    fn fetch_icon(&mut self, code: &str) -> Result<IconData, WeatherError> {
        // A filled disc, sun-coloured for clear codes, grey otherwise.
        let (r, g, b) = if code.starts_with("01") {
            (250u8, 200u8, 60u8)
        } else {
            (170, 180, 200)
        };
        let mut pixels = vec![0u8; (ICON_SIZE * ICON_SIZE * 4) as usize];
        let center = ICON_SIZE as i32 / 2;
        let radius = ICON_SIZE as i32 / 2 - 4;
        for y in 0..ICON_SIZE as i32 {
            for x in 0..ICON_SIZE as i32 {
                let dx = x - center;
                let dy = y - center;
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let idx = ((y as u32 * ICON_SIZE + x as u32) * 4) as usize;
                pixels[idx] = r;
                pixels[idx + 1] = g;
                pixels[idx + 2] = b;
                pixels[idx + 3] = 255;
            }
        }
        Ok(IconData {
            width: ICON_SIZE,
            height: ICON_SIZE,
            pixels,
        })
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
