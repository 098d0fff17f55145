//! uniwell-ma entry point

use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use uniwell_ma::config::{Cli, Settings};
use uniwell_ma::predictor::PredictorClient;
use uniwell_ma::{build_router, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting uniwell-ma v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli);

    // The assessment flow works without the store; history is just empty
    let db = match db::init(&settings.database_path).await {
        Ok(pool) => {
            info!("Database ready at {}", settings.database_path.display());
            Some(pool)
        }
        Err(e) => {
            warn!(
                "Failed to open database at {}: {}. Continuing without persistence",
                settings.database_path.display(),
                e
            );
            None
        }
    };

    let predictor = Arc::new(PredictorClient::new(settings.predictor_url.clone())?);
    info!("Prediction service at {}", predictor.base_url());

    let state = AppState { db, predictor };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    info!("uniwell-ma listening on {}", settings.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
