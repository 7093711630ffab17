use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{DependencyError, PredictError, ValidationError};
use crate::predictors::{
    self, battery_range, driving_style, energy_consumption, optimal_path, remaining_km, trip_energy,
};
use crate::registry::ModelId;
use crate::types::Success;
use crate::weather::CuratedWeather;
use crate::AppState;

type Predicted<T> = Result<Json<Success<T>>, PredictError>;

// ---------- Request helpers ----------

/// Accepts only a JSON object and checks the endpoint's required fields.
fn request_object(
    body: Result<Json<Value>, JsonRejection>,
    required: &[&str],
) -> Result<Map<String, Value>, PredictError> {
    let obj = match body {
        Ok(Json(Value::Object(obj))) => obj,
        _ => return Err(ValidationError::InvalidBody.into()),
    };
    predictors::require(&obj, required)?;
    Ok(obj)
}

// ---------- Liveness ----------

pub async fn root() -> Json<Value> {
    Json(json!("Server is Running"))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn ping() -> Json<Value> {
    Json(json!({ "ping": "pong" }))
}

pub async fn driving_demo() -> Json<Value> {
    Json(driving_style::demo())
}

// ---------- Predictions ----------

pub async fn predict_driving_style(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Predicted<driving_style::DrivingStylePrediction> {
    let input = request_object(body, driving_style::REQUIRED_FIELDS)?;
    let model = state.registry.fetch(ModelId::DrivingStyle).await?;
    Ok(Json(Success::new(driving_style::predict(&model, &input)?)))
}

pub async fn predict_trip_energy(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Predicted<trip_energy::TripEnergy> {
    let input = request_object(body, trip_energy::REQUIRED_FIELDS)?;
    let model = state.registry.fetch(ModelId::TripEnergy).await?;
    Ok(Json(Success::new(trip_energy::predict(&model, &input)?)))
}

pub async fn predict_energy_consumption(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Predicted<energy_consumption::EnergyConsumption> {
    let input = request_object(body, energy_consumption::REQUIRED_FIELDS)?;
    let model = state.registry.fetch(ModelId::EnergyConsumption).await?;
    Ok(Json(Success::new(energy_consumption::predict(&model, &input)?)))
}

pub async fn predict_battery_range(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Predicted<battery_range::BatteryRange> {
    let input = request_object(body, battery_range::REQUIRED_FIELDS)?;
    let model = state.registry.fetch(ModelId::BatteryRange).await?;
    Ok(Json(Success::new(battery_range::predict(&model, &input)?)))
}

pub async fn predict_remaining_km(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Predicted<remaining_km::RemainingKm> {
    let input = request_object(body, remaining_km::REQUIRED_FIELDS)?;
    let model = state.registry.fetch(ModelId::RemainingKm).await?;
    Ok(Json(Success::new(remaining_km::predict(&model, &input)?)))
}

pub async fn predict_optimal_path(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Predicted<optimal_path::TravelTime> {
    let input = request_object(body, optimal_path::REQUIRED_FIELDS)?;
    let model = state.registry.fetch(ModelId::OptimalPath).await?;
    let weather = optimal_path::resolve_weather(&input, &state.weather).await?;
    Ok(Json(Success::new(optimal_path::predict(&model, &input, &weather)?)))
}

// ---------- Weather passthrough ----------

type WeatherReply = Result<Json<CuratedWeather>, Response>;

fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    lat: Option<String>,
    lon: Option<String>,
    units: Option<String>,
}

async fn fetch_weather(state: &AppState, lat: f64, lon: f64, units: &str) -> WeatherReply {
    state
        .weather
        .current(lat, lon, units)
        .await
        .map(Json)
        .map_err(|e| DependencyError::from(e).into_response())
}

pub async fn weather_query(State(state): State<AppState>, Query(q): Query<WeatherQuery>) -> WeatherReply {
    let (Some(lat), Some(lon)) = (q.lat, q.lon) else {
        return Err(bad_request("Missing required query params: lat, lon"));
    };
    let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) else {
        return Err(bad_request("lat and lon must be numbers"));
    };
    let units = q.units.unwrap_or_else(|| "metric".to_string());
    fetch_weather(&state, lat, lon, &units).await
}

/// Coordinates may be JSON numbers or numeric strings.
fn coordinate(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub async fn weather_body(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> WeatherReply {
    let body = match body {
        Ok(Json(Value::Object(obj))) => obj,
        _ => Map::new(),
    };
    let present = |k: &str| body.get(k).filter(|v| !v.is_null());
    let (Some(lat), Some(lon)) = (present("lat"), present("lon")) else {
        return Err(bad_request("JSON body must include lat and lon"));
    };
    let (Some(lat), Some(lon)) = (coordinate(lat), coordinate(lon)) else {
        return Err(bad_request("lat and lon must be numbers"));
    };
    let units = body
        .get("units")
        .and_then(Value::as_str)
        .unwrap_or("metric")
        .to_string();
    fetch_weather(&state, lat, lon, &units).await
}
