//! Configuration resolution for uniwell-ma
//!
//! Settings resolve CLI > environment > TOML (`~/.config/uniwell/ma.toml`)
//! > compiled default.

use clap::Parser;
use std::path::PathBuf;
use uniwell_common::config::{default_database_path, load_toml_config, resolve_setting};

/// Default bind address for the assessment backend
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// Default base URL of the prediction service
const DEFAULT_PREDICTOR_URL: &str = "http://127.0.0.1:5001";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "uniwell-ma", about = "UniWell mental-health assessment backend")]
pub struct Cli {
    /// Socket address to bind, e.g. 127.0.0.1:8000
    #[arg(long)]
    pub bind_address: Option<String>,

    /// Base URL of the prediction service
    #[arg(long)]
    pub predictor_url: Option<String>,

    /// Path to the SQLite database file
    #[arg(long)]
    pub database_path: Option<PathBuf>,
}

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_address: String,
    pub predictor_url: String,
    pub database_path: PathBuf,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Self {
        let toml = load_toml_config("ma");

        let bind_address = resolve_setting(
            cli.bind_address.as_deref(),
            "UNIWELL_MA_BIND",
            toml.bind_address.as_deref(),
            DEFAULT_BIND_ADDRESS,
        );

        let predictor_url = resolve_setting(
            cli.predictor_url.as_deref(),
            "UNIWELL_PREDICTOR_URL",
            toml.predictor_url.as_deref(),
            DEFAULT_PREDICTOR_URL,
        );

        let database_path = PathBuf::from(resolve_setting(
            cli.database_path.as_deref().and_then(|p| p.to_str()),
            "UNIWELL_DATABASE",
            toml.database_path.as_deref(),
            &default_database_path().to_string_lossy(),
        ));

        Self { bind_address, predictor_url, database_path }
    }
}
