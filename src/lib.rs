//! Car Price - used car price prediction from pre-fitted artifacts

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod types;

pub use config::AppConfig;
pub use error::{PriceError, Result};
pub use models::artifacts::CarPricePipeline;
pub use models::{load_pipeline, PriceModel};
pub use pipeline::{PricePipeline, Predictor};
pub use preprocessing::{FeatureScaler, PowerTransform};
pub use types::*;
