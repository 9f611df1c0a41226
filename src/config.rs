//! Service configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};
use crate::models::ArtifactKind;
use crate::types::MAX_YEAR;

pub const ENV_CONFIG_PATH: &str = "CAR_PRICE_CONFIG";
pub const ENV_REFERENCE_YEAR: &str = "CAR_PRICE_REFERENCE_YEAR";
pub const ENV_ARTIFACT_DIR: &str = "CAR_PRICE_ARTIFACT_DIR";
pub const ENV_BIND_ADDR: &str = "CAR_PRICE_BIND";

/// Year of the training data snapshot.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2025;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Age is computed as `reference_year - year`. Must match the training snapshot.
    pub reference_year: i32,
    /// Years the calendar may run ahead of `reference_year` before a warning is logged.
    pub max_reference_year_drift: i32,
    pub bind_addr: String,
    pub currency_symbol: String,
    pub artifacts: ArtifactConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            max_reference_year_drift: 2,
            bind_addr: "0.0.0.0:8000".to_string(),
            currency_symbol: "Rp".to_string(),
            artifacts: ArtifactConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub model: String,
    pub power_transformer: String,
    pub scaler: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            model: ArtifactKind::Model.default_file_name().to_string(),
            power_transformer: ArtifactKind::PowerTransformer.default_file_name().to_string(),
            scaler: ArtifactKind::Scaler.default_file_name().to_string(),
        }
    }
}

impl ArtifactConfig {
    pub fn path(&self, kind: ArtifactKind) -> PathBuf {
        let file = match kind {
            ArtifactKind::Model => &self.model,
            ArtifactKind::PowerTransformer => &self.power_transformer,
            ArtifactKind::Scaler => &self.scaler,
        };
        self.dir.join(file)
    }
}

impl AppConfig {
    /// Loads the optional config file and applies environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            PriceError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&data)
            .map_err(|e| PriceError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(year) = lookup(ENV_REFERENCE_YEAR) {
            self.reference_year = year.trim().parse().map_err(|_| {
                PriceError::Config(format!("{} is not a year: {:?}", ENV_REFERENCE_YEAR, year))
            })?;
        }
        if let Some(dir) = lookup(ENV_ARTIFACT_DIR) {
            self.artifacts.dir = PathBuf::from(dir);
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = addr;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.reference_year < MAX_YEAR {
            return Err(PriceError::Config(format!(
                "reference_year {} is before the latest accepted model year {}",
                self.reference_year, MAX_YEAR
            )));
        }
        if self.max_reference_year_drift < 0 {
            return Err(PriceError::Config(
                "max_reference_year_drift must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Distance between `current_year` and the reference year when it exceeds the allowed drift.
    pub fn reference_year_drift(&self, current_year: i32) -> Option<i32> {
        let drift = (current_year - self.reference_year).abs();
        (drift > self.max_reference_year_drift).then_some(drift)
    }
}
