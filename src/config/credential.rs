//! Credential resolution
//!
//! The crawl runs on a single bearer token. It is either given directly or
//! obtained once, before the crawl, from client credentials.

use crate::catalog::{exchange_token, AuthError};
use reqwest::Client;
use std::fmt;

/// Where the bearer token comes from
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A ready-to-use bearer token
    Token(String),

    /// Client credentials to exchange for a token
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
}

impl CredentialSource {
    /// Picks the credential from the available values
    ///
    /// A non-empty token wins. Otherwise both client id and secret must be
    /// non-empty. Returns `None` when neither is usable.
    pub fn from_parts(
        token: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Option<Self> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(token) {
            return Some(Self::Token(token));
        }

        match (non_empty(client_id), non_empty(client_secret)) {
            (Some(client_id), Some(client_secret)) => Some(Self::ClientCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        }
    }

    /// Produces the bearer token, exchanging client credentials if needed
    pub async fn resolve(&self, http: &Client, auth_base: &str) -> Result<String, AuthError> {
        match self {
            Self::Token(token) => Ok(token.clone()),
            Self::ClientCredentials {
                client_id,
                client_secret,
            } => exchange_token(http, auth_base, client_id, client_secret).await,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Token(_) => "bearer token",
            Self::ClientCredentials { .. } => "client credentials",
        }
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Self::ClientCredentials { client_id, .. } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
        }
    }
}
