//! Feature assembly for the price model

use ndarray::array;

use crate::error::{PriceError, Result};
use crate::preprocessing::encoding::Category;
use crate::preprocessing::normalization::FeatureScaler;
use crate::preprocessing::power_transform::{single_row_value, PowerTransform};
use crate::types::{FeatureVector, RawInput};

/// Power transform columns, in the order it was fitted on.
pub const PRICE_COLUMN: usize = 0;
pub const DISTANCE_COLUMN: usize = 1;

pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Age in years relative to the training snapshot year.
    pub fn age(reference_year: i32, year: i32) -> Result<f64> {
        let age = reference_year - year;
        if age < 0 {
            return Err(PriceError::InvalidInput(format!(
                "year {} is after the reference year {}",
                year, reference_year
            )));
        }
        Ok(age as f64)
    }

    /// Codes for fuel, seller type, transmission and owner, in model column order.
    pub fn category_codes(input: &RawInput) -> [u8; 4] {
        [
            input.fuel.code(),
            input.seller_type.code(),
            input.transmission.code(),
            input.owner.code(),
        ]
    }

    pub fn build_features<P, S>(
        input: &RawInput,
        reference_year: i32,
        power: &P,
        scaler: &S,
    ) -> Result<FeatureVector>
    where
        P: PowerTransform + ?Sized,
        S: FeatureScaler + ?Sized,
    {
        let codes = Self::category_codes(input);
        let age = Self::age(reference_year, input.year)?;

        let km_driven_yj = power.transform_column(DISTANCE_COLUMN, input.km_driven as f64)?;

        // Scaler columns: [km_driven_yj, age]
        let scaled = scaler.transform(&array![[km_driven_yj, age]])?;
        let scaled_distance = single_row_value(&scaled, 2, 0)?;
        let scaled_age = single_row_value(&scaled, 2, 1)?;

        Ok(FeatureVector::new(codes, scaled_distance, scaled_age))
    }
}
