//! Vehicle-level energy consumption. Tables are case-sensitive and were
//! hand-assigned at training time, so they differ from the trip model's.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::PredictError;
use crate::model::Model;
use crate::schema::{FeatureSchema, FeatureSpec};

pub const REQUIRED_FIELDS: &[&str] = &[
    "vehicle_model",
    "distance_km",
    "driving_style",
    "road_type",
    "weather",
    "elevation_gain_m",
    "avg_speed",
    "battery_capacity_kWh",
    "battery_start_%",
    "battery_end_%",
];

pub fn schema() -> FeatureSchema {
    FeatureSchema::new(vec![
        FeatureSpec::label(
            "vehicle_model",
            &[("Leaf", 0), ("ZS EV", 1), ("Atto 3", 2), ("Model 3", 3)],
            "Leaf",
        ),
        FeatureSpec::numeric("distance_km"),
        FeatureSpec::label(
            "driving_style",
            &[("Eco", 0), ("Normal", 1), ("Aggressive", 2)],
            "Normal",
        ),
        FeatureSpec::label(
            "road_type",
            &[("city", 0), ("highway", 1), ("rural", 2), ("coastal", 3)],
            "city",
        ),
        FeatureSpec::label(
            "weather",
            &[
                ("sunny", 0),
                ("cloudy", 1),
                ("light_rain", 2),
                ("heavy_rain", 3),
                ("monsoon", 4),
            ],
            "sunny",
        ),
        FeatureSpec::numeric("elevation_gain_m"),
        FeatureSpec::numeric("avg_speed"),
        FeatureSpec::numeric("battery_capacity_kWh"),
        FeatureSpec::numeric("battery_start_%"),
        FeatureSpec::numeric("battery_end_%"),
    ])
}

#[derive(Debug, Serialize)]
pub struct EnergyConsumption {
    #[serde(rename = "energy_consumed_kWh")]
    pub energy_consumed_kwh: f64,
}

pub fn predict(model: &Model, input: &Map<String, Value>) -> Result<EnergyConsumption, PredictError> {
    let enc = super::encode(model, input, REQUIRED_FIELDS)?;
    Ok(EnergyConsumption {
        energy_consumed_kwh: model.predict_value(&enc.values)?,
    })
}
