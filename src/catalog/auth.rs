//! OAuth2 client-credentials token exchange
//!
//! Runs once at startup, before the crawl, when no bearer token was supplied.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Default base URL of the token service
pub const DEFAULT_AUTH_BASE: &str = "https://icdaccessmanagement.who.int";

const TOKEN_PATH: &str = "connect/token";
const SCOPE: &str = "icdapi_access";
const GRANT_TYPE: &str = "client_credentials";

/// Errors from the token exchange
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token endpoint returned status {0}")]
    Status(u16),

    #[error("unexpected token response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges client credentials for a bearer token
///
/// # Arguments
///
/// * `http` - The HTTP client to use
/// * `auth_base` - Base URL of the token service
/// * `client_id` - OAuth2 client id
/// * `client_secret` - OAuth2 client secret
///
/// # Returns
///
/// * `Ok(String)` - The access token
/// * `Err(AuthError)` - The exchange failed
pub async fn exchange_token(
    http: &Client,
    auth_base: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, AuthError> {
    let url = format!("{}/{}", auth_base.trim_end_matches('/'), TOKEN_PATH);
    tracing::info!("Requesting access token from {}", url);

    let response = http
        .post(&url)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", SCOPE),
            ("grant_type", GRANT_TYPE),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AuthError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    let token: TokenResponse = serde_json::from_str(&body)?;
    Ok(token.access_token)
}
