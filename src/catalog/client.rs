//! HTTP catalog client
//!
//! This module handles all catalog reads, including:
//! - Building the shared HTTP client
//! - Attaching the bearer credential and API headers
//! - Classifying transport, status and decode failures

use crate::catalog::{Catalog, Code, NodeRecord};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default base URL of the catalog API
pub const DEFAULT_API_BASE: &str = "https://id.who.int";

/// Path of the ICD-10 (2010 release) tree below the API base
const RELEASE_PATH: &str = "icd/release/10/2010";

const API_VERSION: &str = "v2";
const LANGUAGE: &str = "en";

/// A failed fetch of one node
#[derive(Debug, Error)]
#[error("Error fetching data for code '{code}': {cause}")]
pub struct FetchError {
    /// The code that could not be fetched
    pub code: Code,

    /// What went wrong
    #[source]
    pub cause: FetchCause,
}

/// Why a fetch failed
#[derive(Debug, Error)]
pub enum FetchCause {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Builds the HTTP client used for catalog reads and token exchange
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("icd-harvest/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Catalog reader over the REST API
///
/// Holds the bearer token for the whole crawl; it is never refreshed.
pub struct CatalogClient {
    http: Client,
    base: String,
    token: String,
}

impl CatalogClient {
    /// Creates a client for the API rooted at `api_base`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use icd_harvest::catalog::{build_http_client, CatalogClient, DEFAULT_API_BASE};
    ///
    /// let http = build_http_client().unwrap();
    /// let client = CatalogClient::new(http, DEFAULT_API_BASE, "token");
    /// ```
    pub fn new(http: Client, api_base: &str, token: impl Into<String>) -> Self {
        Self {
            http,
            base: api_base.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// URL of the record for `code`
    ///
    /// The root code yields the release listing itself, with a trailing slash.
    pub fn endpoint(&self, code: &Code) -> String {
        format!("{}/{}/{}", self.base, RELEASE_PATH, code)
    }

    async fn request(&self, code: &Code) -> Result<NodeRecord, FetchCause> {
        let response = self
            .http
            .get(self.endpoint(code))
            .header(ACCEPT, "application/json")
            .header("API-Version", API_VERSION)
            .header(ACCEPT_LANGUAGE, LANGUAGE)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchCause::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        Ok(NodeRecord::new(value))
    }
}

impl Catalog for CatalogClient {
    async fn fetch(&self, code: &Code) -> Result<NodeRecord, FetchError> {
        tracing::debug!("GET {}", self.endpoint(code));

        self.request(code).await.map_err(|cause| {
            let error = FetchError {
                code: code.clone(),
                cause,
            };
            tracing::error!("{}", error);
            error
        })
    }
}

impl fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base", &self.base)
            .field("token", &"<redacted>")
            .finish()
    }
}
