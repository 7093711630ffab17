//! Travel-time estimate for a candidate path.
//!
//! Weather comes from, in priority order: the request's `weather` field, a
//! live lookup when `lat` and `lon` are given, or the sunny default. A failed
//! lookup degrades to sunny and is reported in `weather_info`.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{PredictError, ValidationError};
use crate::model::Model;
use crate::schema::{CaseFold, FeatureSchema, FeatureSpec};
use crate::weather::{CuratedWeather, WeatherClient, WeatherError};

pub const REQUIRED_FIELDS: &[&str] = &[
    "distance_km",
    "road_type",
    "traffic_level",
    "driving_style",
    "predicted_energy_kWh",
    "predicted_range_km",
    "battery_remaining_percent",
];

pub const DEFAULT_WEATHER: &str = "sunny";

pub fn schema() -> FeatureSchema {
    FeatureSchema::new(vec![
        FeatureSpec::numeric("distance_km"),
        FeatureSpec::label(
            "road_type",
            &[("city", 0), ("coastal", 1), ("highway", 2), ("rural", 3)],
            "city",
        )
        .case(CaseFold::Lower),
        FeatureSpec::label("traffic_level", &[("high", 0), ("low", 1), ("medium", 2)], "medium")
            .case(CaseFold::Lower),
        FeatureSpec::label(
            "weather",
            &[
                ("cloudy", 0),
                ("heavy_rain", 1),
                ("light_rain", 2),
                ("monsoon", 3),
                ("sunny", 4),
            ],
            DEFAULT_WEATHER,
        )
        .case(CaseFold::Lower)
        .alias("clear", "sunny"),
        FeatureSpec::label(
            "driving_style",
            &[("Aggressive", 0), ("Eco", 1), ("Normal", 2)],
            "Normal",
        ),
        FeatureSpec::numeric("predicted_energy_kWh"),
        FeatureSpec::numeric("predicted_range_km"),
        FeatureSpec::numeric("battery_remaining_percent"),
    ])
}

/// Where the weather feature came from.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherSource {
    Explicit(String),
    Observed(CuratedWeather),
    Fallback(String),
    Default,
}

impl WeatherSource {
    fn label(&self) -> String {
        match self {
            WeatherSource::Explicit(w) => w.clone(),
            WeatherSource::Observed(w) => w.category().label().to_string(),
            WeatherSource::Fallback(_) | WeatherSource::Default => DEFAULT_WEATHER.to_string(),
        }
    }

    fn info(&self) -> Option<Value> {
        match self {
            WeatherSource::Observed(w) => serde_json::to_value(w).ok(),
            WeatherSource::Fallback(err) => Some(json!({ "error": err, "fallback": true })),
            _ => None,
        }
    }
}

/// Reads optional coordinates. Both must be numbers when present.
pub fn coordinates(input: &Map<String, Value>) -> Result<Option<(f64, f64)>, ValidationError> {
    let read = |field: &str| match input.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| ValidationError::InvalidField {
            field: field.to_string(),
            expected: "a number",
        }),
    };
    Ok(match (read("lat")?, read("lon")?) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => None,
    })
}

pub async fn resolve_weather(
    input: &Map<String, Value>,
    client: &WeatherClient,
) -> Result<WeatherSource, ValidationError> {
    if let Some(w) = input.get("weather").and_then(Value::as_str) {
        return Ok(WeatherSource::Explicit(w.to_string()));
    }
    match coordinates(input)? {
        Some((lat, lon)) => Ok(observed_or_fallback(client.current(lat, lon, "metric").await)),
        None => Ok(WeatherSource::Default),
    }
}

fn observed_or_fallback(result: Result<CuratedWeather, WeatherError>) -> WeatherSource {
    match result {
        Ok(w) => WeatherSource::Observed(w),
        Err(e) => {
            tracing::warn!("weather lookup failed, assuming {}: {}", DEFAULT_WEATHER, e);
            WeatherSource::Fallback(e.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TravelTime {
    pub predicted_travel_time_min: f64,
    pub predicted_travel_time_hours: f64,
    pub input_parameters: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_info: Option<Value>,
}

pub fn predict(model: &Model, input: &Map<String, Value>, weather: &WeatherSource) -> Result<TravelTime, PredictError> {
    let mut features = input.clone();
    features.insert("weather".into(), Value::String(weather.label()));

    let enc = super::encode(model, &features, REQUIRED_FIELDS)?;
    let minutes = model.predict_value(&enc.values)?;

    let mut echo = Map::new();
    for field in REQUIRED_FIELDS {
        echo.insert(field.to_string(), input.get(*field).cloned().unwrap_or(Value::Null));
    }
    echo.insert(
        "weather".into(),
        enc.resolved.get("weather").cloned().unwrap_or(Value::Null),
    );

    Ok(TravelTime {
        predicted_travel_time_min: minutes,
        predicted_travel_time_hours: minutes / 60.0,
        input_parameters: echo,
        weather_info: weather.info(),
    })
}
