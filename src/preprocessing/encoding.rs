//! Categorical encoding with the fixed lookup tables used at training time

use crate::error::{PriceError, Result};
use crate::types::{FuelType, OwnerStatus, SellerType, Transmission};

/// A categorical input with a fixed label -> code table.
pub trait Category: Copy + Sized + 'static {
    /// Field name, used in error messages.
    const FIELD: &'static str;
    /// All variants in code order.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn code(self) -> u8;

    /// Exact label lookup. An unknown label is an error, never a default.
    fn from_label(label: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label() == label)
            .ok_or_else(|| PriceError::UnknownCategory {
                field: Self::FIELD,
                value: label.to_string(),
            })
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }

    /// The label -> code table.
    fn category_map() -> Vec<(&'static str, u8)> {
        Self::ALL.iter().map(|c| (c.label(), c.code())).collect()
    }
}

/// Encodes a label straight to its code.
pub fn encode<C: Category>(label: &str) -> Result<u8> {
    C::from_label(label).map(Category::code)
}

impl Category for FuelType {
    const FIELD: &'static str = "fuel";
    const ALL: &'static [Self] = &[
        FuelType::Diesel,
        FuelType::Petrol,
        FuelType::Cng,
        FuelType::Lpg,
        FuelType::Electric,
    ];

    fn label(self) -> &'static str {
        match self {
            FuelType::Diesel => "Diesel",
            FuelType::Petrol => "Petrol",
            FuelType::Cng => "CNG",
            FuelType::Lpg => "LPG",
            FuelType::Electric => "Electric",
        }
    }

    fn code(self) -> u8 {
        match self {
            FuelType::Diesel => 0,
            FuelType::Petrol => 1,
            FuelType::Cng => 2,
            FuelType::Lpg => 3,
            FuelType::Electric => 4,
        }
    }
}

impl Category for SellerType {
    const FIELD: &'static str = "seller_type";
    const ALL: &'static [Self] = &[
        SellerType::Individual,
        SellerType::Dealer,
        SellerType::TrustmarkDealer,
    ];

    fn label(self) -> &'static str {
        match self {
            SellerType::Individual => "Individual",
            SellerType::Dealer => "Dealer",
            SellerType::TrustmarkDealer => "Trustmark Dealer",
        }
    }

    fn code(self) -> u8 {
        match self {
            SellerType::Individual => 0,
            SellerType::Dealer => 1,
            SellerType::TrustmarkDealer => 2,
        }
    }
}

impl Category for Transmission {
    const FIELD: &'static str = "transmission";
    const ALL: &'static [Self] = &[Transmission::Manual, Transmission::Automatic];

    fn label(self) -> &'static str {
        match self {
            Transmission::Manual => "Manual",
            Transmission::Automatic => "Automatic",
        }
    }

    fn code(self) -> u8 {
        match self {
            Transmission::Manual => 0,
            Transmission::Automatic => 1,
        }
    }
}

impl Category for OwnerStatus {
    const FIELD: &'static str = "owner";
    const ALL: &'static [Self] = &[
        OwnerStatus::TestDriveCar,
        OwnerStatus::FirstOwner,
        OwnerStatus::SecondOwner,
        OwnerStatus::ThirdOwner,
        OwnerStatus::FourthAndAboveOwner,
    ];

    fn label(self) -> &'static str {
        match self {
            OwnerStatus::TestDriveCar => "Test Drive Car",
            OwnerStatus::FirstOwner => "First Owner",
            OwnerStatus::SecondOwner => "Second Owner",
            OwnerStatus::ThirdOwner => "Third Owner",
            OwnerStatus::FourthAndAboveOwner => "Fourth & Above Owner",
        }
    }

    fn code(self) -> u8 {
        match self {
            OwnerStatus::TestDriveCar => 0,
            OwnerStatus::FirstOwner => 1,
            OwnerStatus::SecondOwner => 2,
            OwnerStatus::ThirdOwner => 3,
            OwnerStatus::FourthAndAboveOwner => 4,
        }
    }
}
