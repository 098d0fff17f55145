//! Configuration resolution for uniwell-tb
//!
//! Settings resolve CLI > environment > TOML (`~/.config/uniwell/tb.toml`)
//! > compiled default. The Spotify client id/secret have no compiled
//! default and must come from the environment or the TOML file, matching
//! the provider's confidential-client model.

use clap::Parser;
use uniwell_common::config::{
    load_toml_config, resolve_optional_setting, resolve_setting, TomlConfig,
};
use uniwell_common::{Error, Result};

/// Default bind address for the token broker
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

/// Default redirect URI registered with the provider
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5000/callback";

/// Default frontend URL the callback returns to (code stripped)
const DEFAULT_RETURN_URL: &str = "http://127.0.0.1:5173/";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "uniwell-tb", about = "UniWell token broker (Spotify OAuth wrapper)")]
pub struct Cli {
    /// Socket address to bind, e.g. 127.0.0.1:5000
    #[arg(long)]
    pub bind_address: Option<String>,
}

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_address: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub return_url: String,
    pub admin_user_id: Option<String>,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let toml: TomlConfig = load_toml_config("tb");

        let bind_address = resolve_setting(
            cli.bind_address.as_deref(),
            "UNIWELL_TB_BIND",
            toml.bind_address.as_deref(),
            DEFAULT_BIND_ADDRESS,
        );

        let client_id = resolve_optional_setting(
            "SPOTIFY_CLIENT_ID",
            toml.spotify.client_id.as_deref(),
        )
        .ok_or_else(|| {
            Error::Config(
                "Spotify client id not configured. Set SPOTIFY_CLIENT_ID or \
                 spotify.client_id in ~/.config/uniwell/tb.toml"
                    .to_string(),
            )
        })?;

        let client_secret = resolve_optional_setting(
            "SPOTIFY_CLIENT_SECRET",
            toml.spotify.client_secret.as_deref(),
        )
        .ok_or_else(|| {
            Error::Config(
                "Spotify client secret not configured. Set SPOTIFY_CLIENT_SECRET or \
                 spotify.client_secret in ~/.config/uniwell/tb.toml"
                    .to_string(),
            )
        })?;

        let redirect_uri = resolve_setting(
            None,
            "SPOTIFY_REDIRECT_URI",
            toml.spotify.redirect_uri.as_deref(),
            DEFAULT_REDIRECT_URI,
        );

        let return_url = resolve_setting(
            None,
            "UNIWELL_TB_RETURN_URL",
            toml.spotify.return_url.as_deref(),
            DEFAULT_RETURN_URL,
        );

        let admin_user_id =
            resolve_optional_setting("ADMIN_USER_ID", toml.spotify.admin_user_id.as_deref());

        Ok(Self {
            bind_address,
            client_id,
            client_secret,
            redirect_uri,
            return_url,
            admin_user_id,
        })
    }
}
