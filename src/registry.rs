use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::error::DependencyError;
use crate::model::Model;
use crate::predictors;
use crate::schema::FeatureSchema;

/// The models this service knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    DrivingStyle,
    TripEnergy,
    EnergyConsumption,
    BatteryRange,
    RemainingKm,
    OptimalPath,
}

impl ModelId {
    pub const ALL: [ModelId; 6] = [
        ModelId::DrivingStyle,
        ModelId::TripEnergy,
        ModelId::EnergyConsumption,
        ModelId::BatteryRange,
        ModelId::RemainingKm,
        ModelId::OptimalPath,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelId::DrivingStyle => "driving_style",
            ModelId::TripEnergy => "trip_energy",
            ModelId::EnergyConsumption => "energy_consumption",
            ModelId::BatteryRange => "battery_range",
            ModelId::RemainingKm => "remaining_km",
            ModelId::OptimalPath => "optimal_path",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }

    /// Schema used when the artifact does not carry its own.
    pub fn builtin_schema(self) -> FeatureSchema {
        match self {
            ModelId::DrivingStyle => predictors::driving_style::schema(),
            ModelId::TripEnergy => predictors::trip_energy::schema(),
            ModelId::EnergyConsumption => predictors::energy_consumption::schema(),
            ModelId::BatteryRange => predictors::battery_range::schema(),
            ModelId::RemainingKm => predictors::remaining_km::schema(),
            ModelId::OptimalPath => predictors::optimal_path::schema(),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lazily loads model artifacts from a directory and keeps them for the
/// process lifetime. Built once at startup and shared through `AppState`.
pub struct ModelRegistry {
    model_dir: PathBuf,
    cache: RwLock<HashMap<ModelId, Arc<Model>>>,
}

impl ModelRegistry {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn path_for(&self, id: ModelId) -> PathBuf {
        self.model_dir.join(id.file_name())
    }

    /// Cached model, loading it on first use. A failed load is not cached,
    /// so a later request retries once the artifact appears.
    ///
    /// The artifact is read with no lock held; concurrent first loads of the
    /// same model may both read it, and the first one inserted is kept.
    pub fn get(&self, id: ModelId) -> Result<Arc<Model>, DependencyError> {
        let cached = self.cache.read().get(&id).cloned();
        if let Some(m) = cached {
            return Ok(m);
        }

        let path = self.path_for(id);
        let model = Model::load(&path, id.builtin_schema()).map_err(|e| {
            DependencyError::ModelUnavailable {
                model: id.name().to_string(),
                reason: format!("{:#}", e),
            }
        })?;

        let mut cache = self.cache.write();
        let entry = cache.entry(id).or_insert_with(|| {
            tracing::info!(
                "loaded model {} (name={:?} version={:?}) from {} with {} columns",
                id,
                model.name,
                model.version,
                path.display(),
                model.n_features()
            );
            Arc::new(model)
        });
        Ok(Arc::clone(entry))
    }

    /// `get` for async handlers: a cache miss is loaded on the blocking pool.
    pub async fn fetch(self: &Arc<Self>, id: ModelId) -> Result<Arc<Model>, DependencyError> {
        let cached = self.cache.read().get(&id).cloned();
        if let Some(m) = cached {
            return Ok(m);
        }

        let registry = Arc::clone(self);
        tokio::task::spawn_blocking(move || registry.get(id))
            .await
            .map_err(|e| DependencyError::ModelUnavailable {
                model: id.name().to_string(),
                reason: format!("load task failed: {}", e),
            })?
    }

    pub fn is_loaded(&self, id: ModelId) -> bool {
        self.cache.read().contains_key(&id)
    }

    /// Loads every known model and runs one all-zero forward pass on each.
    /// Returns the ids that failed; failures are logged, not fatal.
    pub fn preload(&self) -> Vec<ModelId> {
        let mut failed = Vec::new();
        for id in ModelId::ALL {
            match self.get(id) {
                Ok(m) => match m.predict(&vec![0.0; m.n_features()]) {
                    Ok(_) => tracing::info!("warmup forward ok for {}", id),
                    Err(e) => {
                        tracing::warn!("warmup forward failed for {}: {}", id, e);
                        failed.push(id);
                    }
                },
                Err(e) => {
                    tracing::warn!("{}", e);
                    failed.push(id);
                }
            }
        }
        failed
    }
}
