//! Driving-style classification from trip telemetry summaries.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::PredictError;
use crate::model::Model;
use crate::schema::{CaseFold, FeatureSchema, FeatureSpec};
use crate::types::{round_to, DrivingStyle};

pub const REQUIRED_FIELDS: &[&str] = &[
    "distance_km",
    "elevation_gain_m",
    "avg_speed",
    "max_speed",
    "acceleration_mean",
    "acceleration_std",
    "braking_intensity",
    "trip_duration_min",
];

/// Class order of the classifier when the artifact does not say otherwise.
pub const DEFAULT_CLASSES: &[&str] = &["Aggressive", "Eco", "Normal"];

pub fn schema() -> FeatureSchema {
    let mut features: Vec<FeatureSpec> = REQUIRED_FIELDS.iter().map(|f| FeatureSpec::numeric(f)).collect();
    features.extend([
        FeatureSpec::label(
            "vehicle_make",
            &[("BYD", 0), ("MG", 1), ("Nissan", 2), ("Tesla", 3)],
            "MG",
        ),
        FeatureSpec::label(
            "vehicle_model",
            &[("Atto 3", 0), ("Leaf", 1), ("Model 3", 2), ("ZS EV", 3)],
            "ZS EV",
        ),
        FeatureSpec::label(
            "road_type",
            &[("city", 0), ("coastal", 1), ("highway", 2), ("rural", 3)],
            "city",
        )
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
            "sunny",
        )
        .case(CaseFold::Lower)
        .alias("clear", "sunny"),
        FeatureSpec::label(
            "time_of_day",
            &[("afternoon", 0), ("evening", 1), ("morning", 2), ("night", 3)],
            "morning",
        )
        .case(CaseFold::Lower),
    ]);
    FeatureSchema::new(features)
}

/// The rule that labelled the synthetic training trips.
pub fn heuristic_style(acceleration_mean: f64, acceleration_std: f64, braking_intensity: f64) -> DrivingStyle {
    if acceleration_mean < 0.6 && acceleration_std < 0.5 && braking_intensity < 0.4 {
        DrivingStyle::Eco
    } else if acceleration_mean > 1.4 || acceleration_std > 1.0 || braking_intensity > 0.9 {
        DrivingStyle::Aggressive
    } else {
        DrivingStyle::Normal
    }
}

#[derive(Debug, Serialize)]
pub struct DrivingStylePrediction {
    pub predicted_driving_style: String,
    pub confidence_score: f64,
    pub probabilities: BTreeMap<String, f64>,
    pub heuristic_style: DrivingStyle,
    pub input_data: Map<String, Value>,
}

pub fn predict(model: &Model, input: &Map<String, Value>) -> Result<DrivingStylePrediction, PredictError> {
    let enc = super::encode(model, input, REQUIRED_FIELDS)?;
    let probs = model.predict_proba(&enc.values)?;

    let classes: Vec<String> = match model.classes() {
        Some(c) => c.to_vec(),
        None => DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect(),
    };

    let (best, confidence) = probs
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bp), (i, &p)| if p > bp { (i, p) } else { (bi, bp) });
    let predicted = classes
        .get(best)
        .cloned()
        .ok_or_else(|| PredictError::Inference("classifier produced no classes".into()))?;

    let heuristic = heuristic_style(
        enc.resolved_f64("acceleration_mean").unwrap_or_default(),
        enc.resolved_f64("acceleration_std").unwrap_or_default(),
        enc.resolved_f64("braking_intensity").unwrap_or_default(),
    );

    Ok(DrivingStylePrediction {
        predicted_driving_style: predicted,
        confidence_score: round_to(confidence, 4),
        probabilities: classes
            .into_iter()
            .zip(probs)
            .map(|(c, p)| (c, round_to(p, 4)))
            .collect(),
        heuristic_style: heuristic,
        input_data: enc.resolved,
    })
}

/// Payload for the driving module's liveness route.
pub fn demo() -> Value {
    serde_json::json!({
        "module": "driving",
        "controller": "demo",
        "status": "ok",
        "message": "Driving controller demo is live",
    })
}
