extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// One fetched observation. Replaced wholesale on refresh, never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherSnapshot {
    /// Seconds since epoch, UTC.
    pub timestamp: i64,
    /// Degrees Celsius.
    pub temperature: f32,
    pub feels_like: f32,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Provider icon code, e.g. "10d". Empty when the provider sent none.
    pub icon: String,
    pub location: Option<String>,
}

/// Decoded icon raster, RGBA8 row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct IconData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WeatherError {
    Network,
    Decode,
    Message(String),
}

impl core::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WeatherError::Network => f.write_str("network request failed"),
            WeatherError::Decode => f.write_str("malformed provider response"),
            WeatherError::Message(message) => f.write_str(message),
        }
    }
}

/// Weather data provider. Fetches block the caller; frontends are expected
/// to bound them with a request timeout.
pub trait WeatherSource: 'static {
    fn fetch_current(&mut self) -> Result<WeatherSnapshot, WeatherError>;
    fn fetch_forecast(&mut self) -> Result<Vec<WeatherSnapshot>, WeatherError>;
    fn fetch_icon(&mut self, code: &str) -> Result<IconData, WeatherError>;

    /// Drop any memoized icon rasters so the next fetch goes to the provider.
    fn invalidate_icons(&mut self) {}
}
