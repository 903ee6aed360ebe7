//! The public client: decorator composition over the base resolver.

use url::Url;

use crate::cache::CachedLookup;
use crate::config::JwksClientConfig;
use crate::error::JwksError;
use crate::jwk::{Jwk, SigningKey};
use crate::rate_limit::RateLimitedLookup;
use crate::resolver::{KeySetResolver, SigningKeyLookup};

/// Client resolving JWT signing keys from a JWKS endpoint.
///
/// The single-key lookup runs through the configured decorator chain. The
/// wrapper order is fixed: the rate limiter sits directly on the resolver
/// and the cache wraps the outside, so cache hits never spend rate-limit
/// budget. Each stage receives the previous one by value at construction;
/// cache store and rate-limit bucket are owned by this instance, so
/// independently configured clients coexist freely.
///
/// [`get_keys`](Self::get_keys) and
/// [`get_signing_keys`](Self::get_signing_keys) always go straight to the
/// endpoint; only [`get_signing_key`](Self::get_signing_key) is decorated.
pub struct JwksClient {
    resolver: KeySetResolver,
    lookup: Box<dyn SigningKeyLookup>,
}

impl JwksClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    /// [`JwksError::InvalidUri`] when `jwks_uri` does not parse;
    /// [`JwksError::Http`] when the HTTP client cannot be constructed.
    pub fn new(config: JwksClientConfig) -> Result<Self, JwksError> {
        Url::parse(&config.jwks_uri)?;

        let mut builder = reqwest::Client::builder().timeout(config.request_timeout);
        if !config.strict_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build()?;

        let resolver = KeySetResolver::new(http, config.jwks_uri.clone());

        let mut lookup: Box<dyn SigningKeyLookup> = Box::new(resolver.clone());
        if config.rate_limit {
            lookup = Box::new(RateLimitedLookup::new(
                lookup,
                config.jwks_requests_per_minute,
            ));
        }
        if config.cache {
            lookup = Box::new(CachedLookup::new(
                lookup,
                config.cache_max_entries,
                config.cache_max_age,
            ));
        }

        Ok(Self { resolver, lookup })
    }

    /// Fetch the raw JWK entries currently served by the endpoint,
    /// eligible or not.
    ///
    /// # Errors
    /// See [`KeySetResolver::fetch_keys`].
    pub async fn get_keys(&self) -> Result<Vec<Jwk>, JwksError> {
        self.resolver.fetch_keys().await
    }

    /// Fetch and normalize every usable signing key.
    ///
    /// # Errors
    /// See [`KeySetResolver::get_signing_keys`].
    pub async fn get_signing_keys(&self) -> Result<Vec<SigningKey>, JwksError> {
        self.resolver.get_signing_keys().await
    }

    /// Resolve the signing key published under `kid`, through the
    /// configured decorator chain.
    ///
    /// # Errors
    /// [`JwksError::SigningKeyNotFound`] when the set carries no matching
    /// key, plus the fetch errors of
    /// [`KeySetResolver::get_signing_keys`].
    pub async fn get_signing_key(&self, kid: &str) -> Result<SigningKey, JwksError> {
        self.lookup.get_signing_key(kid).await
    }
}

impl std::fmt::Debug for JwksClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksClient")
            .field("jwks_uri", &self.resolver.jwks_uri())
            .finish_non_exhaustive()
    }
}
