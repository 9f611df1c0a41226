//! Loading of the fitted artifacts exported by the training process

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::ArtifactConfig;
use crate::error::{PriceError, Result};
use crate::models::gradient_boosting::{GradientBoostingParams, GradientBoostingRegressor};
use crate::pipeline::PricePipeline;
use crate::preprocessing::normalization::{StandardScaler, StandardScalerParams};
use crate::preprocessing::power_transform::{PowerTransformerParams, YeoJohnsonTransformer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    PowerTransformer,
    Scaler,
}

impl ArtifactKind {
    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::Model => "model",
            ArtifactKind::PowerTransformer => "power transformer",
            ArtifactKind::Scaler => "scaler",
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            ArtifactKind::Model => "gradient_boosting_regression_model.json",
            ArtifactKind::PowerTransformer => "power_transformer.json",
            ArtifactKind::Scaler => "standard_scaler.json",
        }
    }
}

/// Pipeline backed by the exported artifacts.
pub type CarPricePipeline =
    PricePipeline<GradientBoostingRegressor, YeoJohnsonTransformer, StandardScaler>;

pub fn read_params<T: DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T> {
    let data = std::fs::read_to_string(path).map_err(|source| PriceError::ArtifactIo {
        artifact: kind.name(),
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| PriceError::ArtifactFormat {
        artifact: kind.name(),
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_model(path: &Path) -> Result<GradientBoostingRegressor> {
    let params: GradientBoostingParams = read_params(ArtifactKind::Model, path)?;
    GradientBoostingRegressor::from_params(params)
}

pub fn load_power_transformer(path: &Path) -> Result<YeoJohnsonTransformer> {
    let params: PowerTransformerParams = read_params(ArtifactKind::PowerTransformer, path)?;
    let transformer = YeoJohnsonTransformer::from_params(params)?;
    // Fitted jointly on [selling_price, km_driven]
    if transformer.lambdas().len() != 2 {
        return Err(PriceError::invalid_artifact(
            ArtifactKind::PowerTransformer.name(),
            format!("expected 2 columns, got {}", transformer.lambdas().len()),
        ));
    }
    Ok(transformer)
}

pub fn load_scaler(path: &Path) -> Result<StandardScaler> {
    let params: StandardScalerParams = read_params(ArtifactKind::Scaler, path)?;
    StandardScaler::from_params(params)
}

/// Loads all three artifacts. Any failure aborts the whole load.
pub fn load_pipeline(artifacts: &ArtifactConfig, reference_year: i32) -> Result<CarPricePipeline> {
    let model_path = artifacts.path(ArtifactKind::Model);
    let power_path = artifacts.path(ArtifactKind::PowerTransformer);
    let scaler_path = artifacts.path(ArtifactKind::Scaler);

    let model = load_model(&model_path)?;
    tracing::info!(
        "Loaded model from {} ({} trees)",
        model_path.display(),
        model.n_trees()
    );

    let power = load_power_transformer(&power_path)?;
    tracing::info!("Loaded power transformer from {}", power_path.display());

    let scaler = load_scaler(&scaler_path)?;
    tracing::info!("Loaded scaler from {}", scaler_path.display());

    Ok(PricePipeline::new(model, power, scaler, reference_year))
}
