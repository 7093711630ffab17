//! Current-weather passthrough to OpenWeatherMap and the mapping from its
//! free-text conditions to the weather categories the models were trained on.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::WeatherConfig;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Missing OPENWEATHER_API_KEY environment variable")]
    MissingApiKey,
    #[error("OpenWeather request failed with status {0}")]
    Status(u16),
    #[error("OpenWeather request failed: {0}")]
    Transport(String),
    #[error("OpenWeather returned an unreadable payload: {0}")]
    Payload(String),
}

// ---------- Provider payload (only the fields we keep) ----------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwmPayload {
    name: Option<String>,
    dt: Option<i64>,
    main: OwmMain,
    wind: OwmWind,
    weather: Vec<OwmCondition>,
    sys: OwmSys,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwmMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwmWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwmCondition {
    main: Option<String>,
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwmSys {
    country: Option<String>,
}

// ---------- Curated response ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedWeather {
    pub coords: Coords,
    pub location: Location,
    pub weather: Conditions,
    pub timestamp: Option<i64>,
    pub units: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_deg: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl CuratedWeather {
    fn from_payload(lat: f64, lon: f64, units: &str, p: OwmPayload) -> Self {
        let first = p.weather.into_iter().next().unwrap_or_default();
        Self {
            coords: Coords { lat, lon },
            location: Location {
                city: p.name,
                country: p.sys.country,
            },
            weather: Conditions {
                temp: p.main.temp,
                feels_like: p.main.feels_like,
                humidity: p.main.humidity,
                pressure: p.main.pressure,
                wind_speed: p.wind.speed,
                wind_deg: p.wind.deg,
                condition: first.main,
                description: first.description,
                icon: first.icon,
            },
            timestamp: p.dt,
            units: units.to_string(),
            source: "openweathermap".to_string(),
        }
    }

    pub fn category(&self) -> WeatherCategory {
        WeatherCategory::classify(
            self.weather.condition.as_deref().unwrap_or_default(),
            self.weather.description.as_deref().unwrap_or_default(),
        )
    }
}

// ---------- Client ----------

pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(cfg: &WeatherConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    /// One GET to the provider, no retry. Error text never carries the
    /// request URL, since its query string holds the API key.
    pub async fn current(&self, lat: f64, lon: f64, units: &str) -> Result<CuratedWeather, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let lat_s = format!("{:.6}", lat);
        let lon_s = format!("{:.6}", lon);

        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("lat", lat_s.as_str()), ("lon", lon_s.as_str()), ("appid", api_key), ("units", units)])
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let payload: OwmPayload = resp
            .json()
            .await
            .map_err(|e| WeatherError::Payload(e.without_url().to_string()))?;
        tracing::debug!("weather fetched lat={:.4} lon={:.4} units={}", lat, lon, units);
        Ok(CuratedWeather::from_payload(lat, lon, units, payload))
    }
}

// ---------- Condition classification ----------

/// Weather categories known to the trip models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCategory {
    Clear,
    Sunny,
    HeavyRain,
    LightRain,
    Cloudy,
    Monsoon,
}

impl WeatherCategory {
    pub fn label(self) -> &'static str {
        match self {
            WeatherCategory::Clear => "clear",
            WeatherCategory::Sunny => "sunny",
            WeatherCategory::HeavyRain => "heavy_rain",
            WeatherCategory::LightRain => "light_rain",
            WeatherCategory::Cloudy => "cloudy",
            WeatherCategory::Monsoon => "monsoon",
        }
    }

    /// First matching rule wins:
    /// clear, sunny, heavy rain, rain, cloud, monsoon, else sunny.
    pub fn classify(condition: &str, description: &str) -> Self {
        let c = condition.to_lowercase();
        let d = description.to_lowercase();
        let either = |needle: &str| c.contains(needle) || d.contains(needle);

        if either("clear") {
            WeatherCategory::Clear
        } else if either("sunny") {
            WeatherCategory::Sunny
        } else if d.contains("heavy") && d.contains("rain") {
            WeatherCategory::HeavyRain
        } else if either("rain") {
            WeatherCategory::LightRain
        } else if either("cloud") {
            WeatherCategory::Cloudy
        } else if d.contains("monsoon") {
            WeatherCategory::Monsoon
        } else {
            WeatherCategory::Sunny
        }
    }
}
