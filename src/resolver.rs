//! Key-set retrieval and `kid` lookup against a JWKS endpoint.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::error::JwksError;
use crate::jwk::{Jwk, JwkSet, SigningKey};

/// The decorator seam for single-key lookup.
///
/// The base implementation ([`KeySetResolver`]) re-fetches the key set on
/// every call; the cache and rate-limit wrappers compose around this trait
/// without knowing what sits beneath them.
#[async_trait]
pub trait SigningKeyLookup: Send + Sync {
    /// Resolve the signing key published under `kid`.
    async fn get_signing_key(&self, kid: &str) -> Result<SigningKey, JwksError>;
}

#[async_trait]
impl SigningKeyLookup for Box<dyn SigningKeyLookup> {
    async fn get_signing_key(&self, kid: &str) -> Result<SigningKey, JwksError> {
        (**self).get_signing_key(kid).await
    }
}

/// Stateless resolver: one HTTP round trip per operation, no cache of its own.
#[derive(Clone)]
pub struct KeySetResolver {
    http: reqwest::Client,
    jwks_uri: String,
}

impl std::fmt::Debug for KeySetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySetResolver")
            .field("jwks_uri", &self.jwks_uri)
            .finish_non_exhaustive()
    }
}

impl KeySetResolver {
    /// Build a resolver over an existing HTTP client.
    ///
    /// [`JwksClient`](crate::JwksClient) constructs one internally; use
    /// this directly only to hand-compose a decorator chain.
    pub fn new(http: reqwest::Client, jwks_uri: impl Into<String>) -> Self {
        Self {
            http,
            jwks_uri: jwks_uri.into(),
        }
    }

    /// The endpoint this resolver fetches from.
    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }

    /// Fetch the raw JWK entries from the endpoint, eligible or not.
    ///
    /// # Errors
    /// [`JwksError::InvalidResponse`] on a non-success status, carrying the
    /// response body (or `Http Error {status}` when the body is empty);
    /// [`JwksError::Http`] on any other transport failure.
    pub async fn fetch_keys(&self) -> Result<Vec<Jwk>, JwksError> {
        debug!(uri = %self.jwks_uri, "fetching JWKS");
        let response = self
            .http
            .get(&self.jwks_uri)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        let set: JwkSet = response.json().await?;
        debug!(num_keys = set.keys.len(), "fetched JWKS");
        Ok(set.keys)
    }

    /// Fetch, filter, and normalize every usable signing key.
    ///
    /// Ineligible entries and entries whose material fails to decode are
    /// dropped, not reported; only a fully-empty outcome is an error.
    ///
    /// # Errors
    /// [`JwksError::NoKeys`] when the endpoint serves no keys at all,
    /// [`JwksError::NoSigningKeys`] when none survive the filter, plus the
    /// fetch errors of [`fetch_keys`](Self::fetch_keys).
    pub async fn get_signing_keys(&self) -> Result<Vec<SigningKey>, JwksError> {
        let keys = self.fetch_keys().await?;
        if keys.is_empty() {
            return Err(JwksError::NoKeys);
        }

        let signing_keys: Vec<SigningKey> = keys
            .iter()
            .filter(|key| key.is_signing_key())
            .filter_map(|key| match key.to_signing_key() {
                Ok(signing_key) => Some(signing_key),
                Err(error) => {
                    warn!(kid = ?key.kid, %error, "dropping JWK with undecodable key material");
                    None
                }
            })
            .collect();

        if signing_keys.is_empty() {
            return Err(JwksError::NoSigningKeys);
        }
        Ok(signing_keys)
    }
}

#[async_trait]
impl SigningKeyLookup for KeySetResolver {
    /// Linear search of the freshly fetched set; first match in endpoint
    /// order wins (`kid` values are expected unique).
    async fn get_signing_key(&self, kid: &str) -> Result<SigningKey, JwksError> {
        debug!(%kid, "resolving signing key");
        let keys = self.get_signing_keys().await?;
        keys.into_iter().find(|key| key.kid() == kid).ok_or_else(|| {
            debug!(%kid, "no signing key matches the requested kid");
            JwksError::SigningKeyNotFound {
                kid: kid.to_string(),
            }
        })
    }
}

/// Fetch one signing key from an endpoint that serves a single JWK object
/// (no `keys` wrapper), e.g. `/.well-known/jwks/{kid}`.
///
/// Uses a default HTTP client; callers with transport requirements should
/// expose the key through a regular JWKS document and a [`crate::JwksClient`]
/// instead.
///
/// # Errors
/// The fetch errors of [`KeySetResolver::fetch_keys`], plus
/// [`JwksError::MalformedKey`] when the returned object is not a usable JWK.
pub async fn fetch_key(uri: &str) -> Result<SigningKey, JwksError> {
    debug!(%uri, "fetching single JWK");
    let response = reqwest::Client::new()
        .get(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(response_error(response).await);
    }

    let jwk: Jwk = response.json().await?;
    jwk.to_signing_key()
}

/// Map an error response to its message: the body when one was served,
/// otherwise the status code.
async fn response_error(response: reqwest::Response) -> JwksError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        format!("Http Error {}", status.as_u16())
    } else {
        body
    };
    JwksError::InvalidResponse(message)
}
