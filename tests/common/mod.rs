//! Shared wiremock fixtures for JWKS endpoint tests.

#![allow(dead_code)]

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// JWKS mock server wrapping a wiremock instance.
pub struct MockJwksServer {
    pub server: MockServer,
    pub jwks_endpoint: String,
}

impl MockJwksServer {
    /// Start a mock authorization server.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let jwks_endpoint = format!("{}/.well-known/jwks.json", server.uri());
        Self {
            server,
            jwks_endpoint,
        }
    }

    /// Serve `keys` from the JWKS endpoint.
    pub async fn mock_keys(&self, keys: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": keys })))
            .mount(&self.server)
            .await;
    }

    /// Serve `keys`, asserting the endpoint is hit exactly `hits` times.
    pub async fn mock_keys_expecting(&self, keys: Vec<Value>, hits: u64) {
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": keys })))
            .expect(hits)
            .mount(&self.server)
            .await;
    }

    /// Serve an error response from the JWKS endpoint.
    pub async fn mock_error(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}

/// An eligible signing JWK backed by an `x5c` certificate chain.
pub fn x5c_jwk(kid: &str) -> Value {
    json!({
        "kty": "RSA",
        "kid": kid,
        "use": "sig",
        "alg": "RS256",
        "x5c": [STANDARD.encode(fake_certificate_der(kid))],
    })
}

/// An eligible signing JWK backed by raw modulus/exponent components.
pub fn rsa_components_jwk(kid: &str) -> Value {
    json!({
        "kty": "RSA",
        "kid": kid,
        "use": "sig",
        "alg": "RS256",
        "n": URL_SAFE_NO_PAD.encode(fake_modulus(kid)),
        "e": "AQAB",
    })
}

/// The DER bytes behind [`x5c_jwk`], for round-trip assertions.
pub fn fake_certificate_der(kid: &str) -> Vec<u8> {
    // the resolver never parses certificate DER, so any bytes will do
    let mut der = vec![0x30, 0x82, 0x01, 0x0A];
    der.extend_from_slice(kid.as_bytes());
    der.extend((0u8..=255).cycle().take(200));
    der
}

fn fake_modulus(kid: &str) -> Vec<u8> {
    // 2048-bit-sized modulus, top bit set, varied per kid
    let seed = kid.bytes().fold(0xC1u8, |acc, b| acc.wrapping_add(b));
    let mut modulus = vec![0x80 | seed];
    modulus.extend((0u8..=254).map(|i| seed.wrapping_mul(31).wrapping_add(i)));
    modulus
}
