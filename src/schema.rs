//! Feature schema descriptors and the encoder that turns a flat JSON request
//! into the ordered vector a model was trained on.
//!
//! Column order comes from the schema alone. Input key order never matters.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Ordered list of feature descriptors for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub features: Vec<FeatureSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Column name as seen during training (prefix for one-hot columns).
    pub column: String,
    /// Request field feeding this column, when it differs from `column`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub kind: FeatureKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureKind {
    Numeric {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        clamp: Option<[f64; 2]>,
    },
    Label {
        table: BTreeMap<String, i64>,
        default: String,
        #[serde(default)]
        case: CaseFold,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        aliases: BTreeMap<String, String>,
    },
    OneHot {
        categories: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseFold {
    #[default]
    None,
    Lower,
    /// First character upper-cased, the rest lower-cased.
    Capitalize,
}

impl CaseFold {
    pub fn apply(self, raw: &str) -> String {
        match self {
            CaseFold::None => raw.to_string(),
            CaseFold::Lower => raw.to_lowercase(),
            CaseFold::Capitalize => {
                let mut chars = raw.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            }
        }
    }
}

/// Result of encoding one request.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatures {
    pub values: Vec<f64>,
    /// Resolved value per source field, after defaults, aliasing and clamping.
    pub resolved: Map<String, Value>,
}

impl EncodedFeatures {
    pub fn resolved_f64(&self, field: &str) -> Option<f64> {
        self.resolved.get(field).and_then(Value::as_f64)
    }

    pub fn resolved_str(&self, field: &str) -> Option<&str> {
        self.resolved.get(field).and_then(Value::as_str)
    }
}

// ---------- Builders used by the built-in schemas ----------

impl FeatureSpec {
    pub fn numeric(column: &str) -> Self {
        Self {
            column: column.to_string(),
            source: None,
            kind: FeatureKind::Numeric {
                default: None,
                clamp: None,
            },
        }
    }

    pub fn label(column: &str, table: &[(&str, i64)], default: &str) -> Self {
        Self {
            column: column.to_string(),
            source: None,
            kind: FeatureKind::Label {
                table: table.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                default: default.to_string(),
                case: CaseFold::None,
                aliases: BTreeMap::new(),
            },
        }
    }

    pub fn one_hot(column: &str, categories: &[&str]) -> Self {
        Self {
            column: column.to_string(),
            source: None,
            kind: FeatureKind::OneHot {
                categories: categories.iter().map(|c| c.to_string()).collect(),
            },
        }
    }

    pub fn from_field(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn with_default(mut self, value: f64) -> Self {
        if let FeatureKind::Numeric { default, .. } = &mut self.kind {
            *default = Some(value);
        }
        self
    }

    pub fn clamped(mut self, lo: f64, hi: f64) -> Self {
        if let FeatureKind::Numeric { clamp, .. } = &mut self.kind {
            *clamp = Some([lo, hi]);
        }
        self
    }

    pub fn case(mut self, fold: CaseFold) -> Self {
        if let FeatureKind::Label { case, .. } = &mut self.kind {
            *case = fold;
        }
        self
    }

    pub fn alias(mut self, from: &str, to: &str) -> Self {
        if let FeatureKind::Label { aliases, .. } = &mut self.kind {
            aliases.insert(from.to_string(), to.to_string());
        }
        self
    }

    pub fn source_field(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.column)
    }

    fn width(&self) -> usize {
        match &self.kind {
            FeatureKind::OneHot { categories } => categories.len(),
            _ => 1,
        }
    }
}

// ---------- Encoding ----------

impl FeatureSchema {
    pub fn new(features: Vec<FeatureSpec>) -> Self {
        Self { features }
    }

    /// Number of columns the model receives.
    pub fn width(&self) -> usize {
        self.features.iter().map(FeatureSpec::width).sum()
    }

    /// Column names in model order, one-hot columns expanded.
    pub fn columns(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.width());
        for spec in &self.features {
            match &spec.kind {
                FeatureKind::OneHot { categories } => {
                    out.extend(categories.iter().map(|c| format!("{}_{}", spec.column, c)))
                }
                _ => out.push(spec.column.clone()),
            }
        }
        out
    }

    /// Checks internal consistency: label defaults exist in their tables and
    /// clamp ranges are non-empty and NaN-free.
    pub fn validate(&self) -> Result<(), String> {
        for spec in &self.features {
            match &spec.kind {
                FeatureKind::Label { table, default, .. } if !table.contains_key(default) => {
                    return Err(format!(
                        "default '{}' of column '{}' is not in its table",
                        default, spec.column
                    ));
                }
                FeatureKind::Numeric {
                    clamp: Some([lo, hi]),
                    ..
                } if !matches!(lo.partial_cmp(hi), Some(Ordering::Less | Ordering::Equal)) => {
                    return Err(format!("clamp range of column '{}' is empty", spec.column));
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn encode(&self, input: &Map<String, Value>) -> Result<EncodedFeatures, ValidationError> {
        let mut values = Vec::with_capacity(self.width());
        let mut resolved = Map::new();
        let mut missing = Vec::new();

        for spec in &self.features {
            let field = spec.source_field();
            let raw = input.get(field).filter(|v| !v.is_null());

            match &spec.kind {
                FeatureKind::Numeric { default, clamp } => {
                    let value = match raw {
                        Some(v) => v.as_f64().ok_or_else(|| ValidationError::InvalidField {
                            field: field.to_string(),
                            expected: "a number",
                        })?,
                        None => match default {
                            Some(d) => *d,
                            None => {
                                missing.push(field.to_string());
                                continue;
                            }
                        },
                    };
                    let value = match clamp {
                        Some([lo, hi]) => value.clamp(*lo, *hi),
                        None => value,
                    };
                    values.push(value);
                    resolved.insert(field.to_string(), number(value));
                }
                FeatureKind::Label {
                    table,
                    default,
                    case,
                    aliases,
                } => {
                    let label = raw
                        .and_then(Value::as_str)
                        .map(|s| case.apply(s))
                        .map(|s| aliases.get(&s).cloned().unwrap_or(s))
                        .filter(|s| table.contains_key(s))
                        .unwrap_or_else(|| default.clone());
                    let code = table.get(&label).copied().unwrap_or_default();
                    values.push(code as f64);
                    resolved.insert(field.to_string(), Value::String(label));
                }
                FeatureKind::OneHot { categories } => {
                    let chosen = raw.and_then(Value::as_str);
                    values.extend(
                        categories
                            .iter()
                            .map(|c| if Some(c.as_str()) == chosen { 1.0 } else { 0.0 }),
                    );
                    let known = chosen.filter(|c| categories.iter().any(|k| k == c));
                    resolved.insert(
                        field.to_string(),
                        known.map_or(Value::Null, |c| Value::String(c.to_string())),
                    );
                }
            }
        }

        if !missing.is_empty() {
            let required = self
                .features
                .iter()
                .filter(|s| matches!(s.kind, FeatureKind::Numeric { default: None, .. }))
                .map(|s| s.source_field().to_string())
                .collect();
            return Err(ValidationError::MissingFields { missing, required });
        }

        Ok(EncodedFeatures { values, resolved })
    }
}

fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}

/// Lists `required` fields absent from `input`, in `required` order.
/// A field present with a `null` value counts as present.
pub fn missing_fields(input: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|f| !input.contains_key(**f))
        .map(|f| f.to_string())
        .collect()
}
