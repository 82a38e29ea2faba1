//! Catalog module for reading the remote ICD-10 code tree
//!
//! This module contains:
//! - The `Code` and `NodeRecord` types the rest of the crate passes around
//! - Child reference decoding
//! - The `Catalog` trait and its HTTP implementation
//! - OAuth2 client-credentials token exchange

mod auth;
mod client;

pub use auth::{exchange_token, AuthError, DEFAULT_AUTH_BASE};
pub use client::{build_http_client, CatalogClient, FetchCause, FetchError, DEFAULT_API_BASE};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a catalog node, e.g. `I`, `A00-A09` or `A00.1`
///
/// The empty code addresses the root listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(String);

impl Code {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code of the root listing
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Filesystem-safe form of the code: every `.` and `/` becomes `_`
    ///
    /// # Examples
    ///
    /// ```
    /// use icd_harvest::Code;
    ///
    /// assert_eq!(Code::new("A00.1").storage_key(), "A00_1");
    /// assert_eq!(Code::new("A00-A09").storage_key(), "A00-A09");
    /// ```
    pub fn storage_key(&self) -> String {
        self.0.replace(['.', '/'], "_")
    }

    /// Decodes a child reference into a code
    ///
    /// The code is the final path segment of the reference, percent-decoded.
    /// Invalid UTF-8 after decoding is replaced rather than rejected.
    pub fn from_child_reference(reference: &str) -> Self {
        let segment = match reference.rsplit_once('/') {
            Some((_, last)) => last,
            None => reference,
        };
        let bytes = urlencoding::decode_binary(segment.as_bytes());
        Self(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Code {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Code {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// Payload returned by the catalog for one code
///
/// Only the `child` list is interpreted; everything else is passed through
/// to storage untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeRecord(Value);

impl NodeRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Raw child references, if the record carries a `child` list
    pub fn child_references(&self) -> Option<&[Value]> {
        self.0.get("child")?.as_array().map(Vec::as_slice)
    }

    /// Decoded child codes in listing order
    ///
    /// Returns `None` when the record has no `child` list. Entries that are
    /// not strings, or that decode to an empty code, are skipped.
    pub fn child_codes(&self) -> Option<Vec<Code>> {
        let references = self.child_references()?;
        let mut codes = Vec::with_capacity(references.len());

        for reference in references {
            let Some(reference) = reference.as_str() else {
                tracing::warn!("Ignoring non-string child reference: {}", reference);
                continue;
            };

            let code = Code::from_child_reference(reference);
            if code.is_root() {
                tracing::warn!("Ignoring child reference with empty code: {}", reference);
                continue;
            }
            codes.push(code);
        }

        Some(codes)
    }
}

impl From<Value> for NodeRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Read access to the catalog tree
///
/// The walker and the root discovery only need this one operation, which
/// lets tests drive them with in-memory trees.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Fetches the record for `code`
    ///
    /// Implementations report every failure through `FetchError` and never
    /// panic.
    async fn fetch(&self, code: &Code) -> Result<NodeRecord, FetchError>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    async fn fetch(&self, code: &Code) -> Result<NodeRecord, FetchError> {
        (**self).fetch(code).await
    }
}
