/// API server for used car price prediction

use std::sync::Arc;

use anyhow::Context;
use chrono::Datelike;

use car_price::{api, load_pipeline, logging, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    tracing::info!("Reference year: {}", config.reference_year);
    let current_year = chrono::Utc::now().year();
    if let Some(drift) = config.reference_year_drift(current_year) {
        tracing::warn!(
            "Reference year {} is {} years away from the current year {}; ages may no longer match the training data",
            config.reference_year,
            drift,
            current_year
        );
    }

    // Without all three artifacts there is nothing to serve
    let pipeline = match load_pipeline(&config.artifacts, config.reference_year) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!(
                "Model or transformer artifacts could not be loaded. Make sure all artifact files are in {}",
                config.artifacts.dir.display()
            );
            return Err(e).context("failed to load artifacts");
        }
    };

    let state = api::AppState::new(Arc::new(pipeline), &config.currency_symbol);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Server listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
