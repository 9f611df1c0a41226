//! Standardization with fitted per-column mean and scale

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};

const ARTIFACT: &str = "scaler";

/// Column order the scaler was fitted on.
pub const SCALER_COLUMNS: [&str; 2] = ["km_driven_yj", "age"];

pub trait FeatureScaler {
    fn n_features(&self) -> usize;

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScalerParams {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        Self::from_params(StandardScalerParams {
            feature_names: None,
            mean,
            scale,
        })
    }

    pub fn from_params(params: StandardScalerParams) -> Result<Self> {
        if let Some(ref names) = params.feature_names {
            if names.iter().map(String::as_str).ne(SCALER_COLUMNS.iter().copied()) {
                return Err(PriceError::invalid_artifact(
                    ARTIFACT,
                    format!(
                        "fitted on columns {:?}, expected {:?}",
                        names, SCALER_COLUMNS
                    ),
                ));
            }
        }
        if params.mean.len() != SCALER_COLUMNS.len() || params.scale.len() != SCALER_COLUMNS.len()
        {
            return Err(PriceError::invalid_artifact(
                ARTIFACT,
                format!(
                    "expected {} mean/scale values, got {}/{}",
                    SCALER_COLUMNS.len(),
                    params.mean.len(),
                    params.scale.len()
                ),
            ));
        }
        if params.mean.iter().chain(params.scale.iter()).any(|v| !v.is_finite()) {
            return Err(PriceError::invalid_artifact(ARTIFACT, "non-finite parameter"));
        }

        let mut scale = Array1::from(params.scale);
        // Avoid division by zero on constant columns
        for val in scale.iter_mut() {
            if *val == 0.0 {
                *val = 1.0;
            }
        }

        Ok(Self {
            mean: Array1::from(params.mean),
            scale,
        })
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            return Err(PriceError::ShapeMismatch {
                expected: self.mean.len(),
                got: x.ncols(),
            });
        }

        // (X - mean) / scale
        let mut normalized = x.clone();
        for mut row in normalized.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = (*val - self.mean[i]) / self.scale[i];
                if !val.is_finite() {
                    return Err(PriceError::NumericDomain(format!(
                        "scaled value of column {} is not finite",
                        SCALER_COLUMNS[i]
                    )));
                }
            }
        }

        Ok(normalized)
    }
}
