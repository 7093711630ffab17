/// End-to-end tests for the HTTP surface.
///
/// Run with: cargo test --test integration_tests -- --nocapture
use std::{fs, path::Path};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use ev_predictor_backend::{
    config::WeatherConfig,
    registry::{ModelId, ModelRegistry},
    router,
    weather::WeatherClient,
    AppState,
};

// ---------- Fixtures ----------

/// Linear artifact picking single columns, so responses reveal what the model saw.
fn write_linear(dir: &Path, id: ModelId, coefficients: Vec<f64>, intercept: f64) {
    let body = json!({
        "name": id.name(),
        "version": "test",
        "estimator": {"type": "linear", "coefficients": coefficients, "intercept": intercept},
    });
    fs::write(dir.join(id.file_name()), body.to_string()).unwrap();
}

fn unit(width: usize, col: usize) -> Vec<f64> {
    let mut v = vec![0.0; width];
    v[col] = 1.0;
    v
}

fn write_driving_classifier(dir: &Path) {
    // acceleration_mean (column 4) <= 1.0 -> mostly Eco, else mostly Aggressive
    let body = json!({
        "name": "driving_style",
        "version": "test",
        "estimator": {
            "type": "forest_classifier",
            "classes": ["Aggressive", "Eco", "Normal"],
            "trees": [{
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [4, -2, -2],
                "threshold": [1.0, -2.0, -2.0],
                "value": [[0, 0, 0], [1, 6, 3], [8, 0, 2]]
            }]
        }
    });
    fs::write(dir.join("driving_style.json"), body.to_string()).unwrap();
}

fn write_all_models(dir: &Path) {
    write_driving_classifier(dir);
    // trip energy = distance * 0.2
    let mut trip = vec![0.0; 6];
    trip[0] = 0.2;
    write_linear(dir, ModelId::TripEnergy, trip, 0.0);
    // energy consumption = encoded weather column
    write_linear(dir, ModelId::EnergyConsumption, unit(10, 4), 0.0);
    // battery range = clamped percent
    write_linear(dir, ModelId::BatteryRange, unit(3, 1), 0.0);
    // remaining km = 100 * (Atto 3 indicator)
    let mut km = vec![0.0; 8];
    km[6] = 100.0;
    write_linear(dir, ModelId::RemainingKm, km, 5.0);
    // travel time = encoded weather column
    write_linear(dir, ModelId::OptimalPath, unit(8, 3), 0.0);
}

fn weather_cfg(base_url: &str, api_key: Option<&str>) -> WeatherConfig {
    WeatherConfig {
        base_url: base_url.to_string(),
        api_key: api_key.map(str::to_string),
        timeout_secs: 2,
    }
}

fn app_with(dir: &Path, weather: WeatherConfig) -> Router {
    let registry = ModelRegistry::new(dir);
    let weather = WeatherClient::new(&weather).unwrap();
    router(AppState::new(registry, weather))
}

fn app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    write_all_models(dir.path());
    let app = app_with(dir.path(), weather_cfg("http://127.0.0.1:9", None));
    (dir, app)
}

const API_KEY: &str = "owm-secret-0042";

/// Serves `reply` with `status` on a random local port; returns its base URL.
async fn fake_weather(status: StatusCode, reply: Value) -> String {
    serve_provider(Router::new().route(
        "/weather",
        get(move || {
            let reply = reply.clone();
            async move { (status, Json(reply)) }
        }),
    ))
    .await
}

/// A URL on a local port nobody listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/weather", addr)
}

async fn serve_provider(provider: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, provider).await.unwrap();
    });
    format!("http://{}/weather", addr)
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

async fn get_uri(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

fn driving_sample() -> Value {
    json!({
        "distance_km": 50,
        "elevation_gain_m": 0,
        "avg_speed": 60,
        "max_speed": 80,
        "acceleration_mean": 1.2,
        "acceleration_std": 0.36,
        "braking_intensity": 1.5,
        "trip_duration_min": 50,
        "vehicle_make": "MG",
        "vehicle_model": "ZS EV",
        "road_type": "city",
        "weather": "sunny",
        "time_of_day": "evening"
    })
}

fn optimal_sample() -> Value {
    json!({
        "distance_km": 50,
        "road_type": "city",
        "traffic_level": "medium",
        "driving_style": "Normal",
        "predicted_energy_kWh": 8.5,
        "predicted_range_km": 200,
        "battery_remaining_percent": 80
    })
}

// ---------- Liveness ----------

#[tokio::test]
async fn test_liveness_routes() {
    let (_dir, app) = app();
    assert_eq!(get_uri(app.clone(), "/").await, (StatusCode::OK, json!("Server is Running")));
    assert_eq!(get_uri(app.clone(), "/health").await, (StatusCode::OK, json!({"status": "ok"})));
    assert_eq!(get_uri(app.clone(), "/api/ping").await, (StatusCode::OK, json!({"ping": "pong"})));
    let (status, body) = get_uri(app, "/api/driving/demo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["module"], "driving");
}

// ---------- Happy paths ----------

#[tokio::test]
async fn test_driving_style_prediction() {
    println!("\n=== Test: Driving Style Prediction ===");
    let (_dir, app) = app();
    let (status, body) = post(app, "/api/driving/predict", driving_sample()).await;
    println!("{body}");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["predicted_driving_style"], "Aggressive");
    assert_eq!(body["confidence_score"], 0.8);
    assert_eq!(body["probabilities"]["Normal"], 0.2);
    assert_eq!(body["heuristic_style"], "Aggressive");
    assert_eq!(body["input_data"]["time_of_day"], "evening");
}

#[tokio::test]
async fn test_trip_energy_prediction() {
    let (_dir, app) = app();
    let (status, body) = post(
        app,
        "/api/energy/predict",
        json!({"distance_km": 50, "driving_style": "normal", "road_type": "City", "weather": "cloudy"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["predicted_energy_kWh"], 10.0);
    assert_eq!(body["efficiency_kWh_per_km"], 0.2);
    assert_eq!(body["input_data"]["driving_style"], "Normal");
    assert_eq!(body["input_data"]["weather"], "light_rain");
    assert_eq!(body["input_data"]["avg_speed"], 60.0);
    assert_eq!(body["input_data"]["elevation_gain_m"], 0.0);
}

#[tokio::test]
async fn test_energy_consumption_prediction() {
    let (_dir, app) = app();
    let (status, body) = post(
        app,
        "/api/energy-consumption/predict",
        json!({
            "vehicle_model": "Leaf",
            "distance_km": 100,
            "driving_style": "Eco",
            "road_type": "city",
            "weather": "heavy_rain",
            "elevation_gain_m": 50,
            "avg_speed": 60,
            "battery_capacity_kWh": 75,
            "battery_start_%": 80,
            "battery_end_%": 50
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "energy_consumed_kWh": 3.0}));
}

#[tokio::test]
async fn test_battery_range_clamps_percent() {
    println!("\n=== Test: Battery Percent Clamping ===");
    for (raw, want) in [(-10, 0.0), (150, 100.0)] {
        let (_dir, app) = app();
        let (status, body) = post(
            app,
            "/api/battery/predict",
            json!({"battery_capacity_kWh": 50.3, "battery_percent": raw, "efficiency_kWh_per_km": 0.171}),
        )
        .await;
        println!("  {raw} -> {}", body["battery_percent"]);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["battery_percent"], want);
        assert_eq!(body["predicted_range_km"], want);
        for key in ["theoretical_range_km", "available_energy_kWh", "input_data"] {
            assert!(body.get(key).is_some(), "missing {key}");
        }
    }
}

#[tokio::test]
async fn test_remaining_km_one_hot() {
    let (_dir, app) = app();
    let mut input = json!({
        "battery_capacity_kWh": 60,
        "battery_start_%": 75,
        "eff_kWh_per_km": 0.17,
        "max_possible_km": 250,
        "vehicle_model": "Atto 3"
    });
    let (status, body) = post(app.clone(), "/api/predicted-remaining-km/predict", input.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_remaining_km"], 105.0);

    // unknown model: every indicator stays zero
    input["vehicle_model"] = json!("Kona Electric");
    let (status, body) = post(app, "/api/predicted-remaining-km/predict", input).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_remaining_km"], 5.0);
}

#[tokio::test]
async fn test_optimal_path_with_explicit_weather() {
    let (_dir, app) = app();
    let mut input = optimal_sample();
    input["weather"] = json!("Monsoon");
    let (status, body) = post(app, "/api/optimal-path/predict", input).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_travel_time_min"], 3.0);
    assert_eq!(body["predicted_travel_time_hours"], 0.05);
    assert_eq!(body["input_parameters"]["weather"], "monsoon");
    assert!(body.get("weather_info").is_none());
}

// ---------- Validation ----------

#[tokio::test]
async fn test_missing_fields_are_listed_exactly() {
    println!("\n=== Test: Missing Required Fields ===");
    let cases = [
        ("/api/energy/predict", json!({"distance_km": 10, "weather": "sunny"}), vec!["driving_style", "road_type"]),
        ("/api/battery/predict", json!({"battery_percent": 50}), vec!["battery_capacity_kWh", "efficiency_kWh_per_km"]),
        ("/api/predicted-remaining-km/predict", json!({"vehicle_model": "Leaf", "max_possible_km": 1}), vec!["battery_capacity_kWh", "battery_start_%", "eff_kWh_per_km"]),
        ("/api/optimal-path/predict", json!({"distance_km": 1, "road_type": "city", "traffic_level": "low", "driving_style": "Eco"}), vec!["predicted_energy_kWh", "predicted_range_km", "battery_remaining_percent"]),
        ("/api/driving/predict", json!({"distance_km": 1, "avg_speed": 2}), vec!["elevation_gain_m", "max_speed", "acceleration_mean", "acceleration_std", "braking_intensity", "trip_duration_min"]),
    ];
    for (uri, input, missing) in cases {
        let (_dir, app) = app();
        let (status, body) = post(app, uri, input).await;
        println!("  {uri}: {}", body["error"]);
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["success"], false);
        assert_eq!(body["missing_fields"], json!(missing), "{uri}");
        assert_eq!(body["error"], format!("Missing required fields: {}", missing.join(", ")));
    }
}

#[tokio::test]
async fn test_every_field_missing_from_empty_object() {
    let (_dir, app) = app();
    let (status, body) = post(app, "/api/energy-consumption/predict", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["missing_fields"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let (_dir, app) = app();
    let req = Request::post("/api/energy/predict")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body must be valid JSON");

    let (status, _) = post(app, "/api/energy/predict", json!([1, 2, 3])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_field_is_rejected() {
    let (_dir, app) = app();
    let (status, body) = post(
        app,
        "/api/energy/predict",
        json!({"distance_km": "fifty", "driving_style": "Eco", "road_type": "city", "weather": "sunny"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("distance_km"));
}

#[tokio::test]
async fn test_unknown_categoricals_fall_back() {
    let (_dir, app) = app();
    let mut input = optimal_sample();
    input["weather"] = json!("volcanic ash");
    input["traffic_level"] = json!("gridlock");
    let (status, body) = post(app.clone(), "/api/optimal-path/predict", input).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_travel_time_min"], 4.0);
    assert_eq!(body["input_parameters"]["weather"], "sunny");

    let (status, body) = post(
        app,
        "/api/energy/predict",
        json!({"distance_km": 10, "driving_style": "reckless", "road_type": "dirt", "weather": "snow"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["input_data"]["driving_style"], "Normal");
    assert_eq!(body["input_data"]["road_type"], "city");
    assert_eq!(body["input_data"]["weather"], "sunny");
}

#[tokio::test]
async fn test_input_key_order_does_not_matter() {
    let (_dir, app) = app();
    let a = r#"{"battery_capacity_kWh": 60, "battery_percent": 40, "efficiency_kWh_per_km": 0.2}"#;
    let b = r#"{"efficiency_kWh_per_km": 0.2, "battery_percent": 40, "battery_capacity_kWh": 60}"#;
    let mut bodies = Vec::new();
    for raw in [a, b] {
        let req = Request::post("/api/battery/predict")
            .header("content-type", "application/json")
            .body(Body::from(raw))
            .unwrap();
        bodies.push(send(app.clone(), req).await);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0].0, StatusCode::OK);
}

// ---------- Dependencies ----------

#[tokio::test]
async fn test_missing_model_artifact_is_bad_gateway() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(dir.path(), weather_cfg("http://127.0.0.1:9", None));
    let (status, body) = post(
        app,
        "/api/battery/predict",
        json!({"battery_capacity_kWh": 50, "battery_percent": 50, "efficiency_kWh_per_km": 0.2}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("battery_range"));
}

#[tokio::test]
async fn test_weather_passthrough_curates_fields() {
    let url = fake_weather(
        StatusCode::OK,
        json!({
            "weather": [{"main": "Rain", "description": "heavy intensity rain", "icon": "10d"}],
            "main": {"temp": 27.5, "feels_like": 31.0, "humidity": 88, "pressure": 1008},
            "wind": {"speed": 6.2, "deg": 210},
            "sys": {"country": "LK"},
            "name": "Kandy",
            "dt": 1718000000
        }),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(dir.path(), weather_cfg(&url, Some("test-key")));

    let (status, body) = get_uri(app.clone(), "/api/external/weather?lat=7.2906&lon=80.6337").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"]["city"], "Kandy");
    assert_eq!(body["weather"]["wind_speed"], 6.2);
    assert_eq!(body["units"], "metric");
    assert_eq!(body["source"], "openweathermap");

    let (status, body) = post(
        app,
        "/api/external/weather",
        json!({"lat": "7.2906", "lon": 80.6337, "units": "imperial"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["units"], "imperial");
    assert_eq!(body["coords"]["lat"], 7.2906);
}

#[tokio::test]
async fn test_weather_provider_error_is_bad_gateway() {
    println!("\n=== Test: Weather Provider Failure ===");
    let url = fake_weather(StatusCode::INTERNAL_SERVER_ERROR, json!({"cod": 500})).await;
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(dir.path(), weather_cfg(&url, Some("test-key")));

    let (status, body) = get_uri(app, "/api/external/weather?lat=6.9&lon=79.8").await;
    println!("  {body}");
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "OpenWeather request failed with status 500");
}

#[tokio::test]
async fn test_weather_coordinates_are_validated() {
    let (_dir, app) = app();
    let (status, body) = get_uri(app.clone(), "/api/external/weather?lat=6.9").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required query params: lat, lon");

    let (status, body) = get_uri(app.clone(), "/api/external/weather?lat=north&lon=79.8").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "lat and lon must be numbers");

    let (status, body) = post(app.clone(), "/api/external/weather", json!({"lon": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "JSON body must include lat and lon");

    let (status, _) = post(app, "/api/external/weather", json!({"lat": [1], "lon": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_optimal_path_uses_observed_weather() {
    let url = fake_weather(
        StatusCode::OK,
        json!({"weather": [{"main": "Rain", "description": "heavy rain expected"}], "name": "Galle"}),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    write_all_models(dir.path());
    let app = app_with(dir.path(), weather_cfg(&url, Some("test-key")));

    let mut input = optimal_sample();
    input["lat"] = json!(6.0535);
    input["lon"] = json!(80.221);
    let (status, body) = post(app, "/api/optimal-path/predict", input).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_travel_time_min"], 1.0);
    assert_eq!(body["input_parameters"]["weather"], "heavy_rain");
    assert_eq!(body["weather_info"]["location"]["city"], "Galle");
}

#[tokio::test]
async fn test_optimal_path_falls_back_when_weather_fails() {
    let url = fake_weather(StatusCode::SERVICE_UNAVAILABLE, json!({})).await;
    let dir = tempfile::tempdir().unwrap();
    write_all_models(dir.path());
    let app = app_with(dir.path(), weather_cfg(&url, Some("test-key")));

    let mut input = optimal_sample();
    input["lat"] = json!(6.9);
    input["lon"] = json!(79.8);
    let (status, body) = post(app, "/api/optimal-path/predict", input).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["predicted_travel_time_min"], 4.0);
    assert_eq!(body["weather_info"]["fallback"], true);
    assert_eq!(
        body["weather_info"]["error"],
        "OpenWeather request failed with status 503"
    );
}

#[tokio::test]
async fn test_weather_transport_errors_do_not_leak_api_key() {
    println!("\n=== Test: Weather Failures Keep The Key Private ===");
    let slow = serve_provider(Router::new().route(
        "/weather",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            Json(json!({}))
        }),
    ))
    .await;
    let garbled = serve_provider(Router::new().route("/weather", get(|| async { "<html>not json</html>" }))).await;

    for (case, url) in [("closed port", closed_port_url()), ("timeout", slow), ("non-json body", garbled)] {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = weather_cfg(&url, Some(API_KEY));
        cfg.timeout_secs = 1;
        let app = app_with(dir.path(), cfg);

        let resp = app
            .oneshot(Request::get("/api/external/weather?lat=1&lon=2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&bytes);
        println!("  {case}: {status} {text}");

        assert_eq!(status, StatusCode::BAD_GATEWAY, "{case}");
        assert!(text.contains("OpenWeather"), "{case}: {text}");
        assert!(!text.contains(API_KEY), "{case}: {text}");
        assert!(!text.contains("appid"), "{case}: {text}");
    }
}

#[tokio::test]
async fn test_optimal_path_fallback_does_not_leak_api_key() {
    let dir = tempfile::tempdir().unwrap();
    write_all_models(dir.path());
    let app = app_with(dir.path(), weather_cfg(&closed_port_url(), Some(API_KEY)));

    let mut input = optimal_sample();
    input["lat"] = json!(6.9);
    input["lon"] = json!(79.8);
    let (status, body) = post(app, "/api/optimal-path/predict", input).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weather_info"]["fallback"], true);
    assert!(!body.to_string().contains(API_KEY), "{body}");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (_dir, app) = app();
    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/energy/predict")
        .header(header::ORIGIN, "http://planner.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(preflight).await.unwrap();
    assert!(resp.status().is_success(), "{}", resp.status());
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let simple = Request::get("/api/ping")
        .header(header::ORIGIN, "http://planner.example")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(simple).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_null_required_field_reports_endpoint_field_list() {
    let (_dir, app) = app();
    let (status, body) = post(
        app,
        "/api/energy/predict",
        json!({"distance_km": null, "driving_style": "Eco", "road_type": "city", "weather": "sunny"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["missing_fields"], json!(["distance_km"]));
    assert_eq!(
        body["required_fields"],
        json!(["distance_km", "driving_style", "road_type", "weather"])
    );
}

#[tokio::test]
async fn test_optimal_path_echoes_clear_as_sunny() {
    let (_dir, app) = app();
    let mut input = optimal_sample();
    input["weather"] = json!("Clear");
    let (status, body) = post(app, "/api/optimal-path/predict", input).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_travel_time_min"], 4.0);
    assert_eq!(body["input_parameters"]["weather"], "sunny");
}
