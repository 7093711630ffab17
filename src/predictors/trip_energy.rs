//! Trip-level energy estimate from distance, style, road and weather.
//!
//! Categorical codes follow alphabetical label encoding of the training set.
//! Inputs are normalized first (style capitalized, road and weather
//! lower-cased, weather synonyms folded) and anything still unknown falls
//! back to Normal / city / sunny.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::PredictError;
use crate::model::Model;
use crate::schema::{CaseFold, FeatureSchema, FeatureSpec};
use crate::types::round_to;

pub const REQUIRED_FIELDS: &[&str] = &["distance_km", "driving_style", "road_type", "weather"];

pub const DEFAULT_ELEVATION_GAIN_M: f64 = 0.0;
pub const DEFAULT_AVG_SPEED: f64 = 60.0;

pub fn schema() -> FeatureSchema {
    FeatureSchema::new(vec![
        FeatureSpec::numeric("distance_km"),
        FeatureSpec::numeric("elevation_gain_m").with_default(DEFAULT_ELEVATION_GAIN_M),
        FeatureSpec::numeric("avg_speed").with_default(DEFAULT_AVG_SPEED),
        FeatureSpec::label(
            "driving_style_encoded",
            &[("Aggressive", 0), ("Eco", 1), ("Normal", 2)],
            "Normal",
        )
        .from_field("driving_style")
        .case(CaseFold::Capitalize),
        FeatureSpec::label(
            "road_type_encoded",
            &[("city", 0), ("coastal", 1), ("highway", 2), ("rural", 3)],
            "city",
        )
        .from_field("road_type")
        .case(CaseFold::Lower),
        FeatureSpec::label(
            "weather_encoded",
            &[("heavy_rain", 1), ("light_rain", 2), ("monsoon", 3), ("sunny", 4)],
            "sunny",
        )
        .from_field("weather")
        .case(CaseFold::Lower)
        .alias("clear", "sunny")
        .alias("cloudy", "light_rain")
        .alias("rainy", "light_rain")
        .alias("rain", "light_rain"),
    ])
}

#[derive(Debug, Serialize)]
pub struct TripEnergy {
    #[serde(rename = "predicted_energy_kWh")]
    pub predicted_energy_kwh: f64,
    #[serde(rename = "efficiency_kWh_per_km")]
    pub efficiency_kwh_per_km: f64,
    pub input_data: Map<String, Value>,
}

pub fn predict(model: &Model, input: &Map<String, Value>) -> Result<TripEnergy, PredictError> {
    let enc = super::encode(model, input, REQUIRED_FIELDS)?;
    let predicted = model.predict_value(&enc.values)?;

    let distance = enc.resolved_f64("distance_km").unwrap_or_default();
    let efficiency = if distance > 0.0 { predicted / distance } else { 0.0 };

    Ok(TripEnergy {
        predicted_energy_kwh: round_to(predicted, 2),
        efficiency_kwh_per_km: round_to(efficiency, 3),
        input_data: enc.resolved,
    })
}
