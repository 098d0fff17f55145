//! Main entry point for uniwell-tb (Token Broker)
//!
//! Initializes tracing, resolves configuration, constructs the Spotify
//! client and token lifecycle manager, and serves the HTTP API.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use uniwell_tb::config::{Cli, Settings};
use uniwell_tb::lifecycle::TokenLifecycle;
use uniwell_tb::spotify::SpotifyClient;
use uniwell_tb::store::CredentialStore;
use uniwell_tb::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting UniWell Token Broker (uniwell-tb) v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli)?;
    info!("Redirect URI: {}", settings.redirect_uri);

    let spotify = Arc::new(SpotifyClient::new(
        settings.client_id.clone(),
        settings.client_secret.clone(),
        settings.redirect_uri.clone(),
    )?);

    let store = CredentialStore::new();
    let lifecycle = TokenLifecycle::new(spotify.clone(), store);

    let bind_address = settings.bind_address.clone();
    let state = AppState::new(lifecycle, spotify, settings);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("uniwell-tb listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
