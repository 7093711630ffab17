//! Prediction backend for EV trip planning: driving style, trip energy,
//! remaining range and travel time models behind a JSON API, plus a
//! current-weather passthrough.

pub mod config;
pub mod error;
pub mod model;
pub mod predictors;
pub mod registry;
pub mod routes;
pub mod schema;
pub mod types;
pub mod weather;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::registry::ModelRegistry;
use crate::weather::WeatherClient;

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub weather: Arc<WeatherClient>,
}

impl AppState {
    pub fn new(registry: ModelRegistry, weather: WeatherClient) -> Self {
        Self {
            registry: Arc::new(registry),
            weather: Arc::new(weather),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/ping", get(routes::ping))
        .route("/driving/demo", get(routes::driving_demo))
        .route("/driving/predict", post(routes::predict_driving_style))
        .route("/energy/predict", post(routes::predict_trip_energy))
        .route("/energy-consumption/predict", post(routes::predict_energy_consumption))
        .route("/battery/predict", post(routes::predict_battery_range))
        .route("/predicted-remaining-km/predict", post(routes::predict_remaining_km))
        .route("/optimal-path/predict", post(routes::predict_optimal_path))
        .route(
            "/external/weather",
            get(routes::weather_query).post(routes::weather_body),
        )
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
