//! Remaining kilometres with the vehicle model one-hot encoded.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::PredictError;
use crate::model::Model;
use crate::schema::{FeatureSchema, FeatureSpec};

pub const REQUIRED_FIELDS: &[&str] = &[
    "battery_capacity_kWh",
    "battery_start_%",
    "eff_kWh_per_km",
    "max_possible_km",
    "vehicle_model",
];

pub const VEHICLE_MODELS: &[&str] = &["Leaf", "ZS EV", "Atto 3", "Model 3"];

pub fn schema() -> FeatureSchema {
    FeatureSchema::new(vec![
        FeatureSpec::numeric("battery_capacity_kWh").with_default(0.0),
        FeatureSpec::numeric("battery_start_%").with_default(0.0),
        FeatureSpec::numeric("eff_kWh_per_km").with_default(0.0),
        FeatureSpec::numeric("max_possible_km").with_default(0.0),
        FeatureSpec::one_hot("vehicle_model", VEHICLE_MODELS),
    ])
}

#[derive(Debug, Serialize)]
pub struct RemainingKm {
    pub predicted_remaining_km: f64,
}

pub fn predict(model: &Model, input: &Map<String, Value>) -> Result<RemainingKm, PredictError> {
    let enc = super::encode(model, input, REQUIRED_FIELDS)?;
    Ok(RemainingKm {
        predicted_remaining_km: model.predict_value(&enc.values)?,
    })
}
