use serde::{Deserialize, Serialize};

/// Successful prediction envelope: `{"success": true, ...fields}`.
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(body: T) -> Self {
        Self { success: true, body }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrivingStyle {
    Eco,
    Normal,
    Aggressive,
}

/// Rounds half away from zero to `places` decimals.
pub fn round_to(x: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (x * f).round() / f
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_flattens_body() {
        #[derive(Serialize)]
        struct Out {
            #[serde(rename = "energy_consumed_kWh")]
            energy_consumed_kwh: f64,
        }
        let v = serde_json::to_value(Success::new(Out {
            energy_consumed_kwh: 4.5,
        }))
        .unwrap();
        assert_eq!(v, json!({"success": true, "energy_consumed_kWh": 4.5}));
    }

    #[test]
    fn rounds_to_places() {
        assert_eq!(round_to(8.4567, 2), 8.46);
        assert_eq!(round_to(0.1714, 3), 0.171);
        assert_eq!(round_to(-1.005, 0), -1.0);
    }
}
