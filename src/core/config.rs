use crate::core::exchange::ExchangeType;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RestProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SnapshotProviderConfig {
    pub path: String,
}

/// Where ledger data is read from. A snapshot file, when configured, takes
/// precedence over the REST backend.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub rest: Option<RestProviderConfig>,
    pub snapshot: Option<SnapshotProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            rest: Some(RestProviderConfig {
                base_url: "http://localhost:8000/api".to_string(),
            }),
            snapshot: None,
        }
    }
}

fn default_auto_calculate() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeConfig {
    #[serde(default)]
    pub default_rate: Option<Decimal>,
    #[serde(default = "default_auto_calculate")]
    pub auto_calculate: bool,
    #[serde(default)]
    pub default_type: ExchangeType,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        ExchangeConfig {
            default_rate: None,
            auto_calculate: default_auto_calculate(),
            default_type: ExchangeType::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub exchange: ExchangeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "sarraf", "sarraf")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
