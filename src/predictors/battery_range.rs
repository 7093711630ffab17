//! Remaining range from battery capacity, charge and efficiency.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::PredictError;
use crate::model::Model;
use crate::schema::{FeatureSchema, FeatureSpec};
use crate::types::round_to;

pub const REQUIRED_FIELDS: &[&str] = &["battery_capacity_kWh", "battery_percent", "efficiency_kWh_per_km"];

pub fn schema() -> FeatureSchema {
    FeatureSchema::new(vec![
        FeatureSpec::numeric("battery_capacity_kWh"),
        FeatureSpec::numeric("battery_start_%")
            .from_field("battery_percent")
            .clamped(0.0, 100.0),
        FeatureSpec::numeric("eff_kWh_per_km").from_field("efficiency_kWh_per_km"),
    ])
}

#[derive(Debug, Serialize)]
pub struct BatteryRange {
    pub predicted_range_km: f64,
    pub theoretical_range_km: f64,
    #[serde(rename = "available_energy_kWh")]
    pub available_energy_kwh: f64,
    pub battery_percent: f64,
    pub input_data: Map<String, Value>,
}

pub fn predict(model: &Model, input: &Map<String, Value>) -> Result<BatteryRange, PredictError> {
    let enc = super::encode(model, input, REQUIRED_FIELDS)?;
    let predicted = model.predict_value(&enc.values)?;

    let capacity = enc.resolved_f64("battery_capacity_kWh").unwrap_or_default();
    let percent = enc.resolved_f64("battery_percent").unwrap_or_default();
    let efficiency = enc.resolved_f64("efficiency_kWh_per_km").unwrap_or_default();

    let available = percent / 100.0 * capacity;
    let theoretical = if efficiency > 0.0 { available / efficiency } else { 0.0 };

    Ok(BatteryRange {
        predicted_range_km: round_to(predicted, 2),
        theoretical_range_km: round_to(theoretical, 2),
        available_energy_kwh: round_to(available, 2),
        battery_percent: percent,
        input_data: enc.resolved,
    })
}
