use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_dir: PathBuf,
    pub preload_models: bool,
    pub weather: WeatherConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            model_dir: PathBuf::from("models"),
            preload_models: false,
            weather: WeatherConfig::default(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_URL.to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    /// Optional JSON file named by `CONFIG_PATH`, then environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("config file not found at {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("invalid config JSON in {}", path.display()))
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port.parse().with_context(|| format!("PORT is not a port number: {port}"))?;
        }
        if let Some(dir) = lookup("MODEL_DIR") {
            self.model_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("PRELOAD_MODELS") {
            self.preload_models = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        if let Some(key) = lookup("OPENWEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }
        if let Some(url) = lookup("WEATHER_BASE_URL") {
            self.weather.base_url = url;
        }
        if let Some(secs) = lookup("WEATHER_TIMEOUT_SECS") {
            self.weather.timeout_secs = secs
                .parse()
                .with_context(|| format!("WEATHER_TIMEOUT_SECS is not a whole number: {secs}"))?;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
