//! Configuration loading and per-value resolution
//!
//! Each setting resolves through the same priority chain:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (`~/.config/uniwell/<module>.toml`)
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

/// Per-module TOML configuration file contents
///
/// Every field is optional; absent fields fall through to the next tier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Socket address the service binds to, e.g. "127.0.0.1:8000"
    pub bind_address: Option<String>,
    /// Path to the SQLite database file
    pub database_path: Option<String>,
    /// Base URL of the prediction service (uniwell-ma)
    pub predictor_url: Option<String>,
    /// Spotify confidential-client settings (uniwell-tb)
    #[serde(default)]
    pub spotify: SpotifyToml,
}

/// Spotify credentials section of the TOML config
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyToml {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub admin_user_id: Option<String>,
    /// Where the authorization callback redirects after stripping the code
    pub return_url: Option<String>,
}

/// Resolve a single setting through the CLI > env > TOML > default chain
pub fn resolve_setting(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
    default: &str,
) -> String {
    if let Some(value) = cli_arg {
        return value.to_string();
    }
    if let Ok(value) = std::env::var(env_var_name) {
        if !value.trim().is_empty() {
            return value;
        }
    }
    if let Some(value) = toml_value {
        return value.to_string();
    }
    default.to_string()
}

/// Resolve an optional setting (no compiled default exists)
pub fn resolve_optional_setting(
    env_var_name: &str,
    toml_value: Option<&str>,
) -> Option<String> {
    if let Ok(value) = std::env::var(env_var_name) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }
    toml_value.map(|v| v.to_string())
}

/// Get the config file path for a module (`~/.config/uniwell/<module>.toml`)
pub fn config_file_path(module: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("uniwell").join(format!("{}.toml", module)))
}

/// Load the module's TOML config, falling back to defaults
///
/// A missing file is not an error. A file that fails to parse is logged and
/// treated as absent so a broken config cannot prevent startup.
pub fn load_toml_config(module: &str) -> TomlConfig {
    let Some(path) = config_file_path(module) else {
        return TomlConfig::default();
    };
    if !path.exists() {
        return TomlConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse {}: {} (using defaults)", path.display(), e);
                TomlConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {} (using defaults)", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Get the OS-dependent default data folder for UniWell
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("uniwell"))
        .unwrap_or_else(|| PathBuf::from("./uniwell_data"))
}

/// Default database path inside the data folder
pub fn default_database_path() -> PathBuf {
    default_data_folder().join("uniwell.db")
}

/// Ensure the parent directory of a path exists
pub fn ensure_parent_exists(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_arg_wins_over_everything() {
        let value = resolve_setting(
            Some("from-cli"),
            "UNIWELL_TEST_UNSET_VAR",
            Some("from-toml"),
            "from-default",
        );
        assert_eq!(value, "from-cli");
    }

    #[test]
    fn toml_wins_over_default() {
        let value = resolve_setting(None, "UNIWELL_TEST_UNSET_VAR", Some("from-toml"), "from-default");
        assert_eq!(value, "from-toml");
    }

    #[test]
    fn default_is_the_last_resort() {
        let value = resolve_setting(None, "UNIWELL_TEST_UNSET_VAR", None, "from-default");
        assert_eq!(value, "from-default");
    }

    #[test]
    fn optional_setting_absent_when_nothing_set() {
        assert_eq!(resolve_optional_setting("UNIWELL_TEST_UNSET_VAR", None), None);
    }

    #[test]
    fn toml_parse_roundtrip() {
        let parsed: TomlConfig = toml::from_str(
            r#"
            bind_address = "127.0.0.1:9000"
            predictor_url = "http://127.0.0.1:5001"

            [spotify]
            client_id = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.bind_address.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(parsed.spotify.client_id.as_deref(), Some("abc"));
        assert_eq!(parsed.spotify.client_secret, None);
    }
}
