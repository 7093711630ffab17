//! One module per served model. Each exposes its required request fields,
//! its built-in feature schema and a `predict` that turns a validated
//! request object into a response body.

pub mod battery_range;
pub mod driving_style;
pub mod energy_consumption;
pub mod optimal_path;
pub mod remaining_km;
pub mod trip_energy;

use serde_json::{Map, Value};

use crate::error::{PredictError, ValidationError};
use crate::model::Model;
use crate::schema::{missing_fields, EncodedFeatures};

/// Fails with the exact list of absent required fields.
pub fn require(input: &Map<String, Value>, required: &[&str]) -> Result<(), ValidationError> {
    let missing = missing_fields(input, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields {
            missing,
            required: required.iter().map(|f| f.to_string()).collect(),
        })
    }
}

/// Encodes `input` with the model's schema and logs a short summary of the
/// vector so all-zero or mis-ordered inputs are easy to spot.
///
/// Missing-field errors report the endpoint's `required` list, the same one
/// `require` reports.
pub(crate) fn encode(
    model: &Model,
    input: &Map<String, Value>,
    required: &[&str],
) -> Result<EncodedFeatures, PredictError> {
    let enc = model.schema.encode(input).map_err(|e| match e {
        ValidationError::MissingFields { missing, .. } => ValidationError::MissingFields {
            missing,
            required: required.iter().map(|f| f.to_string()).collect(),
        },
        other => other,
    })?;

    if tracing::enabled!(tracing::Level::DEBUG) {
        let v = &enc.values;
        let nz = v.iter().filter(|x| **x != 0.0).count();
        let mean = if v.is_empty() { 0.0 } else { v.iter().sum::<f64>() / v.len() as f64 };
        let sample: Vec<String> = model
            .schema
            .columns()
            .iter()
            .zip(v)
            .take(6)
            .map(|(name, x)| format!("{}={:.3}", name, x))
            .collect();
        tracing::debug!(
            "encode model={} in_dim={} nonzero={} mean={:.3} sample=[{}]",
            model.name,
            v.len(),
            nz,
            mean,
            sample.join(", ")
        );
    }

    Ok(enc)
}
