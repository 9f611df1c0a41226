/// Price model and artifact loading

pub mod artifacts;
pub mod gradient_boosting;

use ndarray::{Array1, Array2};

use crate::error::Result;

pub use artifacts::{load_pipeline, ArtifactKind};
pub use gradient_boosting::GradientBoostingRegressor;

/// Regression model producing the power-transformed price, one value per row.
pub trait PriceModel {
    fn n_features(&self) -> usize;

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}
