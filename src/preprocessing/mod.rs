/// Preprocessing: encoding and fitted numeric transforms

pub mod encoding;
pub mod feature_engineering;
pub mod normalization;
pub mod power_transform;

pub use encoding::Category;
pub use feature_engineering::FeatureEngineer;
pub use normalization::{FeatureScaler, StandardScaler};
pub use power_transform::{PowerTransform, YeoJohnsonTransformer};
