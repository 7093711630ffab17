use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::error::ModelError;
use crate::schema::FeatureSchema;

/// On-disk model artifact: estimator plus the schema it was trained with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<FeatureSchema>,
    pub estimator: Estimator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    /// Mean of the trees' leaf values.
    ForestRegressor { trees: Vec<Tree> },
    /// Mean of the trees' normalized leaf class distributions.
    ForestClassifier { classes: Vec<String>, trees: Vec<Tree> },
    Linear { coefficients: Vec<f64>, intercept: f64 },
}

/// Flat-array decision tree. Node `i` is a leaf when `children_left[i] == -1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub children_left: Vec<i32>,
    pub children_right: Vec<i32>,
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    /// Leaf payload: one value for regression, per-class weights for classification.
    pub value: Vec<Vec<f64>>,
}

/// Model ready for inference: estimator and the schema actually in force.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub version: String,
    pub schema: FeatureSchema,
    estimator: Estimator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Value(f64),
    Probabilities(Vec<f64>),
}

impl Tree {
    fn len(&self) -> usize {
        self.children_left.len()
    }

    fn check(&self, n_features: usize, leaf_width: usize) -> std::result::Result<(), String> {
        let n = self.len();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("tree arrays differ in length".into());
        }
        for i in 0..n {
            let (l, r) = (self.children_left[i], self.children_right[i]);
            if l == -1 {
                if self.value[i].len() != leaf_width {
                    return Err(format!(
                        "leaf {} has {} values, expected {}",
                        i,
                        self.value[i].len(),
                        leaf_width
                    ));
                }
                continue;
            }
            // Children always come after their parent, which also rules out cycles.
            let in_range = |c: i32| c > i as i32 && (c as usize) < n;
            if !in_range(l) || !in_range(r) {
                return Err(format!("node {} has out-of-range children", i));
            }
            let f = self.feature[i];
            if f < 0 || f as usize >= n_features {
                return Err(format!(
                    "node {} splits on feature {} but the schema has {} columns",
                    i, f, n_features
                ));
            }
        }
        Ok(())
    }

    fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut node = 0usize;
        while self.children_left[node] != -1 {
            let f = self.feature[node] as usize;
            node = if x[f] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        &self.value[node]
    }
}

impl Estimator {
    fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        match self {
            Estimator::ForestRegressor { trees } => {
                if trees.is_empty() {
                    return Err("forest has no trees".into());
                }
                trees.iter().try_for_each(|t| t.check(n_features, 1))
            }
            Estimator::ForestClassifier { classes, trees } => {
                if classes.is_empty() {
                    return Err("classifier has no classes".into());
                }
                if trees.is_empty() {
                    return Err("forest has no trees".into());
                }
                trees.iter().try_for_each(|t| t.check(n_features, classes.len()))
            }
            Estimator::Linear { coefficients, .. } => {
                if coefficients.len() != n_features {
                    return Err(format!(
                        "linear model has {} coefficients but the schema has {} columns",
                        coefficients.len(),
                        n_features
                    ));
                }
                Ok(())
            }
        }
    }

    fn predict(&self, x: &[f64]) -> Output {
        match self {
            Estimator::ForestRegressor { trees } => {
                let sum: f64 = trees.iter().map(|t| t.leaf(x)[0]).sum();
                Output::Value(sum / trees.len() as f64)
            }
            Estimator::ForestClassifier { classes, trees } => {
                let mut probs = vec![0.0; classes.len()];
                for t in trees {
                    let leaf = t.leaf(x);
                    let total: f64 = leaf.iter().sum();
                    if total > 0.0 {
                        for (p, w) in probs.iter_mut().zip(leaf) {
                            *p += w / total;
                        }
                    }
                }
                let n = trees.len() as f64;
                probs.iter_mut().for_each(|p| *p /= n);
                Output::Probabilities(probs)
            }
            Estimator::Linear {
                coefficients,
                intercept,
            } => Output::Value(
                intercept + coefficients.iter().zip(x).map(|(c, v)| c * v).sum::<f64>(),
            ),
        }
    }
}

impl Model {
    /// Pairs an artifact with a schema and checks the estimator fits it.
    /// The artifact's own schema wins over `fallback_schema`.
    pub fn from_artifact(artifact: ModelArtifact, fallback_schema: FeatureSchema) -> Result<Self> {
        let schema = artifact.schema.unwrap_or(fallback_schema);
        if let Err(e) = schema.validate() {
            bail!(ModelError::Invalid(e));
        }
        if let Err(e) = artifact.estimator.check(schema.width()) {
            bail!(ModelError::Invalid(e));
        }
        Ok(Self {
            name: artifact.name,
            version: artifact.version,
            schema,
            estimator: artifact.estimator,
        })
    }

    pub fn load(path: &Path, fallback_schema: FeatureSchema) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifact {}", path.display()))?;
        let artifact: ModelArtifact = serde_json::from_str(&txt)
            .with_context(|| format!("failed to parse model artifact {}", path.display()))?;
        Self::from_artifact(artifact, fallback_schema)
            .with_context(|| format!("model artifact {} does not fit its schema", path.display()))
    }

    pub fn n_features(&self) -> usize {
        self.schema.width()
    }

    /// Class labels for classifiers, `None` for regressors.
    pub fn classes(&self) -> Option<&[String]> {
        match &self.estimator {
            Estimator::ForestClassifier { classes, .. } => Some(classes),
            _ => None,
        }
    }

    pub fn predict(&self, x: &[f64]) -> std::result::Result<Output, ModelError> {
        if x.len() != self.n_features() {
            return Err(ModelError::FeatureLength {
                got: x.len(),
                expected: self.n_features(),
            });
        }
        if let Some(i) = x.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite { column: i });
        }
        Ok(self.estimator.predict(x))
    }

    pub fn predict_value(&self, x: &[f64]) -> std::result::Result<f64, ModelError> {
        match self.predict(x)? {
            Output::Value(v) => Ok(v),
            Output::Probabilities(_) => Err(ModelError::WrongOutput("a regression value")),
        }
    }

    pub fn predict_proba(&self, x: &[f64]) -> std::result::Result<Vec<f64>, ModelError> {
        match self.predict(x)? {
            Output::Probabilities(p) => Ok(p),
            Output::Value(_) => Err(ModelError::WrongOutput("class probabilities")),
        }
    }
}
