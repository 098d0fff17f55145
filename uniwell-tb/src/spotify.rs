//! Spotify client
//!
//! Talks to the two Spotify surfaces this service consumes:
//! - the accounts token endpoint (`grant_type` of authorization_code,
//!   refresh_token, or client_credentials, confidential-client Basic auth)
//! - the Web API playlist listing used by the admin playlists endpoint
//!
//! # API Reference
//! - Token endpoint: https://accounts.spotify.com/api/token
//! - Playlists: https://api.spotify.com/v1/users/{user_id}/playlists

use crate::lifecycle::{TokenGrant, TokenProvider};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use uniwell_common::{Error, Result};

/// Spotify accounts service base URL (token endpoint, authorize page)
const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Spotify Web API base URL
const WEB_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Default timeout for Spotify requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// OAuth scopes requested on login
const AUTHORIZE_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "user-modify-playback-state",
    "user-read-playback-state",
    "user-read-currently-playing",
    "user-read-recently-played",
    "user-top-read",
];

/// Confidential client for the Spotify accounts service and Web API
pub struct SpotifyClient {
    http_client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl SpotifyClient {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client, client_id, client_secret, redirect_uri })
    }

    /// Build the authorize URL the login endpoint redirects to
    pub fn authorize_url(&self) -> String {
        let scope = AUTHORIZE_SCOPES.join(" ");
        // Parsing a const base URL with known-good parameters cannot fail
        let url = Url::parse_with_params(
            &format!("{}/authorize", ACCOUNTS_BASE_URL),
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("scope", scope.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("show_dialog", "true"),
            ],
        )
        .expect("authorize URL construction is infallible");
        url.to_string()
    }

    /// POST a grant to the token endpoint with Basic client credentials
    ///
    /// Any non-2xx is surfaced as `UpstreamAuth` carrying the provider's
    /// status and error body verbatim.
    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenGrant> {
        debug!(grant_type = params[0].1, "Requesting token from Spotify");

        let response = self
            .http_client
            .post(format!("{}/api/token", ACCOUNTS_BASE_URL))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::UpstreamTimeout(format!("Token endpoint timed out: {}", e))
                } else {
                    Error::Internal(format!("Token endpoint request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamAuth { status: status.as_u16(), body });
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| Error::Internal(format!("Failed to parse token response: {}", e)))
    }

    /// Acquire an app token via the client-credentials flow
    pub async fn client_credentials_grant(&self) -> Result<TokenGrant> {
        self.token_request(&[("grant_type", "client_credentials")]).await
    }

    /// List a user's public playlists, mapped to `{name, id}` pairs
    pub async fn user_playlists(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Result<Vec<PlaylistSummary>> {
        debug!(user_id = %user_id, "Fetching user playlists");

        let response = self
            .http_client
            .get(format!("{}/users/{}/playlists", WEB_API_BASE_URL, user_id))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::UpstreamTimeout(format!("Playlist request timed out: {}", e))
                } else {
                    Error::Internal(format!("Playlist request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream { status: status.as_u16(), body });
        }

        let page: PlaylistsPage = response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Failed to parse playlists response: {}", e)))?;

        Ok(page
            .items
            .into_iter()
            .map(|item| PlaylistSummary { name: item.name, id: item.id })
            .collect())
    }
}

#[async_trait]
impl TokenProvider for SpotifyClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    async fn refresh_grant(&self, refresh_token: &str) -> Result<TokenGrant> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }
}

/// Playlist name/id pair returned by the admin playlists endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistSummary {
    pub name: String,
    pub id: String,
}

// ============================================================================
// Spotify Web API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlaylistsPage {
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    id: String,
    name: String,
}
