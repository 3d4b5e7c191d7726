use std::collections::HashMap;
use std::env;
use std::time::Duration;

use serde::Deserialize;
use skyhat_core::weather::{IconData, WeatherError, WeatherSnapshot, WeatherSource};

const API_BASE: &str = "https://api.openweathermap.org";
// Bounded so an unresponsive network reads as a fetch failure instead of
// hanging the input path.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// OpenWeatherMap provider. Credentials and coordinates come from the
/// environment (`LATITUDE`, `LONGITUDE`, `WEATHER_API_KEY`); icons are
/// memoized per code until the controller asks for an invalidation.
pub struct OwmSource {
    client: reqwest::blocking::Client,
    lat: f64,
    lon: f64,
    api_key: String,
    icons: HashMap<String, IconData>,
}

#[derive(Deserialize)]
struct CurrentResponse {
    dt: i64,
    main: MainFields,
    weather: Vec<ConditionFields>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct MainFields {
    temp: f32,
    feels_like: f32,
    humidity: u8,
}

#[derive(Deserialize)]
struct ConditionFields {
    icon: String,
}

#[derive(Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    city: Option<CityFields>,
}

#[derive(Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainFields,
    weather: Vec<ConditionFields>,
}

#[derive(Deserialize)]
struct CityFields {
    name: Option<String>,
}

impl OwmSource {
    pub fn from_env() -> Result<Self, String> {
        let lat = read_coord("LATITUDE")?;
        let lon = read_coord("LONGITUDE")?;
        let api_key =
            env::var("WEATHER_API_KEY").map_err(|_| String::from("WEATHER_API_KEY is not set"))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| format!("http client setup failed: {err}"))?;
        Ok(Self {
            client,
            lat,
            lon,
            api_key,
            icons: HashMap::new(),
        })
    }

    fn query_url(&self, path: &str) -> String {
        format!(
            "{API_BASE}{path}?units=metric&lat={}&lon={}&appid={}",
            self.lat, self.lon, self.api_key
        )
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        let response = self.client.get(url).send().map_err(|err| {
            log::debug!("request failed: {err}");
            WeatherError::Network
        })?;
        if !response.status().is_success() {
            return Err(WeatherError::Message(format!(
                "provider returned {}",
                response.status()
            )));
        }
        response.json::<T>().map_err(|_| WeatherError::Decode)
    }
}

fn read_coord(name: &str) -> Result<f64, String> {
    let raw = env::var(name).map_err(|_| format!("{name} is not set"))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("{name} is not a number"))
}

fn snapshot_from(
    dt: i64,
    main: MainFields,
    weather: &[ConditionFields],
    location: Option<String>,
) -> WeatherSnapshot {
    WeatherSnapshot {
        timestamp: dt,
        temperature: main.temp,
        feels_like: main.feels_like,
        humidity: main.humidity,
        icon: weather.first().map(|w| w.icon.clone()).unwrap_or_default(),
        location,
    }
}

impl WeatherSource for OwmSource {
    fn fetch_current(&mut self) -> Result<WeatherSnapshot, WeatherError> {
        let data: CurrentResponse = self.get_json(&self.query_url("/data/2.5/weather"))?;
        Ok(snapshot_from(data.dt, data.main, &data.weather, data.name))
    }

    fn fetch_forecast(&mut self) -> Result<Vec<WeatherSnapshot>, WeatherError> {
        let data: ForecastResponse = self.get_json(&self.query_url("/data/2.5/forecast"))?;
        let city = data.city.and_then(|c| c.name);
        Ok(data
            .list
            .into_iter()
            .map(|entry| snapshot_from(entry.dt, entry.main, &entry.weather, city.clone()))
            .collect())
    }

    fn fetch_icon(&mut self, code: &str) -> Result<IconData, WeatherError> {
        if let Some(icon) = self.icons.get(code) {
            return Ok(icon.clone());
        }
        let url = format!("{API_BASE}/img/wn/{code}.png");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|_| WeatherError::Network)?;
        if !response.status().is_success() {
            return Err(WeatherError::Message(format!(
                "icon fetch returned {}",
                response.status()
            )));
        }
        let bytes = response.bytes().map_err(|_| WeatherError::Network)?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|_| WeatherError::Decode)?
            .to_rgba8();
        let icon = IconData {
            width: decoded.width(),
            height: decoded.height(),
            pixels: decoded.into_raw(),
        };
        self.icons.insert(code.to_string(), icon.clone());
        Ok(icon)
    }

    fn invalidate_icons(&mut self) {
        log::info!("icon cache cleared ({} entries)", self.icons.len());
        self.icons.clear();
    }
}
