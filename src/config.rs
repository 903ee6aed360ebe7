//! Client configuration: recognized options and their defaults.

use std::time::Duration;

/// Configuration for a [`JwksClient`](crate::JwksClient).
///
/// Covers the endpoint, the two optional lookup decorators, and the
/// transport knobs passed through to the HTTP client. Setters chain:
///
/// ```rust
/// use std::time::Duration;
/// use jwks_rsa::JwksClientConfig;
///
/// let config = JwksClientConfig::new("https://tenant.auth0.com/.well-known/jwks.json")
///     .cache(true)
///     .cache_max_age(Duration::from_secs(600))
///     .rate_limit(true)
///     .jwks_requests_per_minute(10);
/// ```
#[derive(Debug, Clone)]
pub struct JwksClientConfig {
    /// Endpoint serving the `{ "keys": [...] }` document
    pub jwks_uri: String,
    /// Cache resolved keys per `kid`
    pub cache: bool,
    /// Bound on cached entries; least-recently-inserted evicted beyond this
    pub cache_max_entries: usize,
    /// How long a cached key stays valid
    pub cache_max_age: Duration,
    /// Throttle the lookup rate
    pub rate_limit: bool,
    /// Budget for the rate limiter, shared across all `kid`s
    pub jwks_requests_per_minute: u32,
    /// Verify TLS certificates; disable only against test servers
    pub strict_ssl: bool,
    /// Per-request timeout applied to the HTTP client
    pub request_timeout: Duration,
}

impl JwksClientConfig {
    /// Configuration with conventional defaults: both decorators off,
    /// strict TLS, 10 s request timeout.
    pub fn new(jwks_uri: impl Into<String>) -> Self {
        Self {
            jwks_uri: jwks_uri.into(),
            cache: false,
            cache_max_entries: 5,
            cache_max_age: Duration::from_secs(600),
            rate_limit: false,
            jwks_requests_per_minute: 10,
            strict_ssl: true,
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Enable or disable the per-`kid` response cache.
    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache = enabled;
        self
    }

    /// Cap the number of cached keys.
    pub fn cache_max_entries(mut self, max_entries: usize) -> Self {
        self.cache_max_entries = max_entries;
        self
    }

    /// Set how long cached keys stay valid.
    pub fn cache_max_age(mut self, max_age: Duration) -> Self {
        self.cache_max_age = max_age;
        self
    }

    /// Enable or disable lookup throttling.
    pub fn rate_limit(mut self, enabled: bool) -> Self {
        self.rate_limit = enabled;
        self
    }

    /// Set the throttling budget in lookups per minute.
    pub fn jwks_requests_per_minute(mut self, budget: u32) -> Self {
        self.jwks_requests_per_minute = budget;
        self
    }

    /// Control TLS certificate verification.
    pub fn strict_ssl(mut self, strict: bool) -> Self {
        self.strict_ssl = strict;
        self
    }

    /// Set the HTTP request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
