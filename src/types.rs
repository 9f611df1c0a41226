/// Data types for the price prediction service

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};
use crate::preprocessing::encoding::Category;

pub const MIN_YEAR: i32 = 1990;
pub const MAX_YEAR: i32 = 2024;
pub const MAX_DISTANCE_KM: u32 = 1_000_000;
pub const DISTANCE_STEP_KM: u32 = 1_000;

pub const DEFAULT_YEAR: i32 = 2015;
pub const DEFAULT_DISTANCE_KM: u32 = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Diesel,
    Petrol,
    #[serde(rename = "CNG")]
    Cng,
    #[serde(rename = "LPG")]
    Lpg,
    Electric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellerType {
    Individual,
    Dealer,
    #[serde(rename = "Trustmark Dealer")]
    TrustmarkDealer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Manual,
    Automatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerStatus {
    #[serde(rename = "Test Drive Car")]
    TestDriveCar,
    #[serde(rename = "First Owner")]
    FirstOwner,
    #[serde(rename = "Second Owner")]
    SecondOwner,
    #[serde(rename = "Third Owner")]
    ThirdOwner,
    #[serde(rename = "Fourth & Above Owner")]
    FourthAndAboveOwner,
}

/// Validated car attributes for a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawInput {
    pub year: i32,
    pub km_driven: u32,
    pub fuel: FuelType,
    pub seller_type: SellerType,
    pub transmission: Transmission,
    pub owner: OwnerStatus,
}

impl RawInput {
    pub fn new(
        year: i32,
        km_driven: u32,
        fuel: FuelType,
        seller_type: SellerType,
        transmission: Transmission,
        owner: OwnerStatus,
    ) -> Result<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PriceError::InvalidInput(format!(
                "year must be within [{}, {}], got {}",
                MIN_YEAR, MAX_YEAR, year
            )));
        }
        if km_driven > MAX_DISTANCE_KM {
            return Err(PriceError::InvalidInput(format!(
                "km_driven must be within [0, {}], got {}",
                MAX_DISTANCE_KM, km_driven
            )));
        }

        Ok(Self {
            year,
            km_driven,
            fuel,
            seller_type,
            transmission,
            owner,
        })
    }
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            km_driven: DEFAULT_DISTANCE_KM,
            fuel: FuelType::ALL[0],
            seller_type: SellerType::ALL[0],
            transmission: Transmission::ALL[0],
            owner: OwnerStatus::ALL[0],
        }
    }
}

/// Inbound request as sent by the form; labels are checked against the category maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub year: i64,
    pub km_driven: i64,
    pub fuel: String,
    pub seller_type: String,
    pub transmission: String,
    pub owner: String,
}

impl TryFrom<PredictRequest> for RawInput {
    type Error = PriceError;

    fn try_from(request: PredictRequest) -> Result<Self> {
        let year = i32::try_from(request.year)
            .map_err(|_| PriceError::InvalidInput(format!("year out of range: {}", request.year)))?;
        let km_driven = u32::try_from(request.km_driven).map_err(|_| {
            PriceError::InvalidInput(format!(
                "km_driven must be within [0, {}], got {}",
                MAX_DISTANCE_KM, request.km_driven
            ))
        })?;

        RawInput::new(
            year,
            km_driven,
            FuelType::from_label(&request.fuel)?,
            SellerType::from_label(&request.seller_type)?,
            Transmission::from_label(&request.transmission)?,
            OwnerStatus::from_label(&request.owner)?,
        )
    }
}

/// Column names of the model input, in training order.
pub const FEATURE_COLUMNS: [&str; 6] = [
    "fuel",
    "seller_type",
    "transmission",
    "owner",
    "km_driven_yj",
    "age",
];

/// Model input: four category codes followed by scaled distance and scaled age.
/// The column order must match the order the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; 6]);

impl FeatureVector {
    pub fn new(codes: [u8; 4], scaled_distance: f64, scaled_age: f64) -> Self {
        Self([
            codes[0] as f64,
            codes[1] as f64,
            codes[2] as f64,
            codes[3] as f64,
            scaled_distance,
            scaled_age,
        ])
    }

    pub fn values(&self) -> &[f64; 6] {
        &self.0
    }

    pub fn scaled_distance(&self) -> f64 {
        self.0[4]
    }

    pub fn scaled_age(&self) -> f64 {
        self.0[5]
    }

    /// Single-row matrix for model input.
    pub fn to_row(&self) -> Array2<f64> {
        Array2::from_shape_fn((1, 6), |(_, j)| self.0[j])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub features: FeatureVector,
    /// Model output in power-transformed space.
    pub transformed_price: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub input: RawInput,
    pub features: FeatureVector,
    pub price: f64,
    pub formatted_price: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NumericRange {
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub default: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub year: NumericRange,
    pub km_driven: NumericRange,
    pub fuel: Vec<&'static str>,
    pub seller_type: Vec<&'static str>,
    pub transmission: Vec<&'static str>,
    pub owner: Vec<&'static str>,
    pub reference_year: i32,
}
