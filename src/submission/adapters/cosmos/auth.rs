//! Master-key request signing for the Cosmos DB REST API.
//!
//! Every request carries an `authorization` header of the form
//! `type=master&ver=1.0&sig=<signature>` (URL encoded), where the signature
//! is a base64 HMAC-SHA256 over the verb, resource type, resource link and
//! request date, keyed with the decoded account key.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors raised while loading the account key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MasterKeyError {
    /// The key is not valid base64.
    #[error("account key is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The decoded key cannot seed an HMAC.
    #[error("account key has an unusable length")]
    InvalidLength,
}

impl From<InvalidLength> for MasterKeyError {
    fn from(_: InvalidLength) -> Self {
        Self::InvalidLength
    }
}

/// Decoded Cosmos account key, ready to sign requests.
#[derive(Clone)]
pub struct MasterKey {
    mac: HmacSha256,
}

impl MasterKey {
    /// Decodes a base64 account key as shown in the Azure portal.
    ///
    /// # Errors
    ///
    /// Returns [`MasterKeyError::InvalidEncoding`] when the key is not valid
    /// base64.
    pub fn from_base64(encoded: &str) -> Result<Self, MasterKeyError> {
        let key = STANDARD.decode(encoded.trim())?;
        let mac = HmacSha256::new_from_slice(&key)?;
        Ok(Self { mac })
    }

    /// Produces the URL-encoded `authorization` header value.
    ///
    /// `verb` and `resource_type` are lower-cased as the service requires;
    /// `resource_link` is used verbatim; `date` must be the same RFC 1123
    /// string sent in `x-ms-date`.
    #[must_use]
    pub fn authorization(
        &self,
        verb: &str,
        resource_type: &str,
        resource_link: &str,
        date: &str,
    ) -> String {
        let payload = format!(
            "{}\n{}\n{}\n{}\n\n",
            verb.to_ascii_lowercase(),
            resource_type.to_ascii_lowercase(),
            resource_link,
            date.to_ascii_lowercase(),
        );

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        let token = format!("type=master&ver=1.0&sig={signature}");
        url::form_urlencoded::byte_serialize(token.as_bytes()).collect()
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}

/// Formats a timestamp for the `x-ms-date` header.
#[must_use]
pub fn http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
