#![allow(dead_code)]

use std::path::PathBuf;

use car_price::config::ArtifactConfig;
use car_price::PredictRequest;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn fixture_artifacts() -> ArtifactConfig {
    ArtifactConfig {
        dir: fixtures_dir(),
        ..ArtifactConfig::default()
    }
}

pub fn request(year: i64, km_driven: i64, fuel: &str, transmission: &str) -> PredictRequest {
    PredictRequest {
        year,
        km_driven,
        fuel: fuel.to_string(),
        seller_type: "Individual".to_string(),
        transmission: transmission.to_string(),
        owner: "First Owner".to_string(),
    }
}
