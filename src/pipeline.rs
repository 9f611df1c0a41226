//! Inference pipeline: encode, transform, predict, inverse-transform

use crate::error::{PriceError, Result};
use crate::models::PriceModel;
use crate::preprocessing::feature_engineering::{FeatureEngineer, PRICE_COLUMN};
use crate::preprocessing::normalization::FeatureScaler;
use crate::preprocessing::power_transform::PowerTransform;
use crate::types::{FeatureVector, Prediction, RawInput};

/// Fitted artifacts plus the reference year, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct PricePipeline<M, P, S> {
    model: M,
    power: P,
    scaler: S,
    reference_year: i32,
}

impl<M, P, S> PricePipeline<M, P, S>
where
    M: PriceModel,
    P: PowerTransform,
    S: FeatureScaler,
{
    pub fn new(model: M, power: P, scaler: S, reference_year: i32) -> Self {
        Self {
            model,
            power,
            scaler,
            reference_year,
        }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn power(&self) -> &P {
        &self.power
    }

    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    pub fn features(&self, input: &RawInput) -> Result<FeatureVector> {
        FeatureEngineer::build_features(input, self.reference_year, &self.power, &self.scaler)
    }

    pub fn predict(&self, input: &RawInput) -> Result<Prediction> {
        let features = self.features(input)?;

        let output = self.model.predict(&features.to_row())?;
        if output.len() != 1 {
            return Err(PriceError::ShapeMismatch {
                expected: 1,
                got: output.len(),
            });
        }
        let transformed_price = output[0];

        let price = self
            .power
            .inverse_transform_column(PRICE_COLUMN, transformed_price)?;
        if !price.is_finite() {
            return Err(PriceError::NumericDomain(format!(
                "price is not finite for model output {}",
                transformed_price
            )));
        }

        Ok(Prediction {
            features,
            transformed_price,
            price,
        })
    }
}

/// Object-safe view of a pipeline, used by the HTTP layer.
pub trait Predictor: Send + Sync {
    fn reference_year(&self) -> i32;

    fn predict(&self, input: &RawInput) -> Result<Prediction>;
}

impl<M, P, S> Predictor for PricePipeline<M, P, S>
where
    M: PriceModel + Send + Sync,
    P: PowerTransform + Send + Sync,
    S: FeatureScaler + Send + Sync,
{
    fn reference_year(&self) -> i32 {
        self.reference_year
    }

    fn predict(&self, input: &RawInput) -> Result<Prediction> {
        PricePipeline::predict(self, input)
    }
}
