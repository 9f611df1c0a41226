/// HTTP API for the prediction form

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::error::PriceError;
use crate::format::format_price;
use crate::pipeline::Predictor;
use crate::preprocessing::encoding::Category;
use crate::types::{
    FormOptions, FuelType, NumericRange, OwnerStatus, PredictRequest, PredictResponse, RawInput,
    SellerType, Transmission, DEFAULT_DISTANCE_KM, DEFAULT_YEAR, DISTANCE_STEP_KM,
    MAX_DISTANCE_KM, MAX_YEAR, MIN_YEAR,
};

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
    pub currency_symbol: Arc<str>,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>, currency_symbol: &str) -> Self {
        Self {
            predictor,
            currency_symbol: Arc::from(currency_symbol),
        }
    }
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error_response(err: PriceError) -> ApiError {
    let status = if err.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

/// Malformed or mistyped bodies keep axum's status but use the same error body.
fn rejection_response(rejection: JsonRejection) -> ApiError {
    (
        rejection.status(),
        Json(serde_json::json!({ "error": rejection.body_text() })),
    )
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/options", get(options))
        .route("/api/predict", post(predict))
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Used Car Price Prediction API (Rust)",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn options(State(state): State<AppState>) -> Json<FormOptions> {
    Json(FormOptions {
        year: NumericRange {
            min: MIN_YEAR as i64,
            max: MAX_YEAR as i64,
            step: 1,
            default: DEFAULT_YEAR as i64,
        },
        km_driven: NumericRange {
            min: 0,
            max: MAX_DISTANCE_KM as i64,
            step: DISTANCE_STEP_KM as i64,
            default: DEFAULT_DISTANCE_KM as i64,
        },
        fuel: FuelType::labels(),
        seller_type: SellerType::labels(),
        transmission: Transmission::labels(),
        owner: OwnerStatus::labels(),
        reference_year: state.predictor.reference_year(),
    })
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::info!("Rejected request body: {}", rejection.body_text());
        rejection_response(rejection)
    })?;

    tracing::info!(
        "Predict request: year={}, km_driven={}, fuel={}, seller_type={}, transmission={}, owner={}",
        request.year,
        request.km_driven,
        request.fuel,
        request.seller_type,
        request.transmission,
        request.owner
    );

    let input = RawInput::try_from(request).map_err(|e| {
        tracing::info!("Rejected input: {}", e);
        error_response(e)
    })?;

    let prediction = state.predictor.predict(&input).map_err(|e| {
        tracing::warn!("Prediction failed: {}", e);
        error_response(e)
    })?;

    Ok(Json(PredictResponse {
        input,
        features: prediction.features,
        price: prediction.price,
        formatted_price: format_price(prediction.price, &state.currency_symbol),
    }))
}
