//! # jwks-rsa
//!
//! Signing-key resolution for JSON Web Token verification: fetch a JSON Web
//! Key Set from an authorization server, normalize the usable RSA keys to
//! PEM, and look one up by its `kid` — without the caller knowing the JWKS
//! wire format.
//!
//! ## Key Features
//!
//! - **PEM Normalization** - `x5c` certificates and raw `n`/`e` components
//!   both come back as ready-to-use PEM text
//! - **Response Caching** - optional bounded, time-expiring per-`kid` cache
//! - **Rate Limiting** - optional shared requests-per-minute budget with a
//!   delay (never reject) policy
//! - **Fixed Composition** - rate limiter innermost, cache outermost: cache
//!   hits never spend rate-limit budget
//! - **Thread-Safe** - lookups may race freely across tasks
//!
//! ## Architecture
//!
//! - [`client`] - [`JwksClient`]: configuration and decorator composition
//! - [`resolver`] - the fetch/filter/normalize pipeline and the
//!   [`SigningKeyLookup`] decorator seam
//! - [`pem`] - JWK key material to PEM text
//! - [`cache`] / [`rate_limit`] - the two optional lookup decorators
//! - [`jwk`] - wire types and the [`SigningKey`] value
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use jwks_rsa::{JwksClient, JwksClientConfig};
//!
//! # async fn example() -> Result<(), jwks_rsa::JwksError> {
//! let client = JwksClient::new(
//!     JwksClientConfig::new("https://tenant.auth0.com/.well-known/jwks.json")
//!         .cache(true)
//!         .cache_max_age(Duration::from_secs(600))
//!         .rate_limit(true)
//!         .jwks_requests_per_minute(10),
//! )?;
//!
//! let key = client.get_signing_key("NkFCNEE1NDFDNTQ5RTQ5OTE1QzRBMjYyMzY0NEJCQTJBMjJBQkZCMA").await?;
//! let pem = key.pem();
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all
)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod jwk;
pub mod pem;
pub mod rate_limit;
pub mod resolver;

pub use cache::CachedLookup;
pub use client::JwksClient;
pub use config::JwksClientConfig;
pub use error::JwksError;
pub use jwk::{Jwk, JwkSet, KeyMaterial, SigningKey};
pub use rate_limit::RateLimitedLookup;
pub use resolver::{fetch_key, KeySetResolver, SigningKeyLookup};
