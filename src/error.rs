//! Error taxonomy for JWKS fetching, key normalization, and lookup.

use thiserror::Error;

/// Errors surfaced by [`JwksClient`](crate::JwksClient) operations.
///
/// Failures always surface to the caller in the kind they occurred as; the
/// only exception is per-key filtering inside
/// [`get_signing_keys`](crate::resolver::KeySetResolver::get_signing_keys),
/// where ineligible or undecodable JWKs are dropped (and logged) rather than
/// reported individually.
#[derive(Debug, Error)]
pub enum JwksError {
    /// HTTP request failed without a usable response (connection, TLS,
    /// timeout, or body decode failure)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status. The message is the
    /// response body, or `Http Error {status}` when the body was empty.
    #[error("{0}")]
    InvalidResponse(String),

    /// The JWKS endpoint did not contain any keys
    #[error("the JWKS endpoint did not contain any keys")]
    NoKeys,

    /// Keys were present but none were usable for signature verification
    #[error("the JWKS endpoint did not contain any signing keys")]
    NoSigningKeys,

    /// No key in the fetched set matches the requested `kid`
    #[error("unable to find a signing key that matches '{kid}'")]
    SigningKeyNotFound {
        /// The key id that was requested
        kid: String,
    },

    /// Key material could not be decoded or re-encoded
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// The configured JWKS URI is not a valid URL
    #[error("invalid JWKS URI: {0}")]
    InvalidUri(#[from] url::ParseError),
}
