//! JWKS wire types and the normalized signing-key value.

use serde::{Deserialize, Serialize};

use crate::error::JwksError;
use crate::pem;

/// One entry of a JSON Web Key Set, as served by the endpoint.
///
/// Every field is optional: a JWK missing required members degrades to
/// "ineligible for signing" rather than failing deserialization of the whole
/// set. Unknown members are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type; only `"RSA"` keys are usable here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,

    /// Key id used to select the key a token was signed with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Public key use; must be `"sig"` for signing keys
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,

    /// Algorithm (RS256 etc.); informational, not filtered on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Certificate chain as base64 DER entries, leaf first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5c: Option<Vec<String>>,

    /// RSA modulus, base64url
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA public exponent, base64url
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    /// Not-before timestamp, passed through unmodified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
}

impl Jwk {
    /// Whether this JWK can back RS* signature verification: a signing-use
    /// RSA key carrying a `kid` and either a certificate chain or raw
    /// modulus/exponent material.
    pub fn is_signing_key(&self) -> bool {
        self.key_use.as_deref() == Some("sig")
            && self.kty.as_deref() == Some("RSA")
            && self.kid.as_deref().is_some_and(|kid| !kid.is_empty())
            && (self.has_certificate() || (self.n.is_some() && self.e.is_some()))
    }

    fn has_certificate(&self) -> bool {
        self.x5c.as_ref().is_some_and(|chain| !chain.is_empty())
    }

    /// Convert to the normalized signing-key form.
    ///
    /// The leaf certificate wins when a chain is present; otherwise the raw
    /// RSA components are encoded.
    ///
    /// # Errors
    /// [`JwksError::MalformedKey`] when the JWK lacks a `kid`, carries
    /// neither `x5c` nor `n`/`e`, or its material does not decode.
    pub fn to_signing_key(&self) -> Result<SigningKey, JwksError> {
        let kid = self
            .kid
            .clone()
            .filter(|kid| !kid.is_empty())
            .ok_or_else(|| JwksError::MalformedKey("JWK is missing a kid".into()))?;

        let key = if let Some(cert) = self.x5c.as_ref().and_then(|chain| chain.first()) {
            KeyMaterial::Certificate(pem::cert_to_pem(cert)?)
        } else if let (Some(n), Some(e)) = (&self.n, &self.e) {
            KeyMaterial::RsaPublicKey(pem::rsa_public_key_to_pem(n, e)?)
        } else {
            return Err(JwksError::MalformedKey(
                "JWK carries neither x5c nor n/e material".into(),
            ));
        };

        Ok(SigningKey {
            kid,
            nbf: self.nbf,
            key,
        })
    }
}

/// The `{ "keys": [...] }` document served by a JWKS endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    /// Keys in endpoint order; an absent member deserializes as empty
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

/// PEM-encoded material backing a [`SigningKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// PEM certificate taken from the JWK's `x5c` chain
    Certificate(String),
    /// PKCS#1 PEM RSA public key built from the JWK's `n`/`e` components
    RsaPublicKey(String),
}

/// A verification key normalized out of the JWKS wire format.
///
/// Immutable value type carrying exactly one PEM encoding: a certificate
/// when the JWK embedded an `x5c` chain, or a PKCS#1 RSA public key derived
/// from `n`/`e`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    kid: String,
    nbf: Option<u64>,
    key: KeyMaterial,
}

impl SigningKey {
    pub(crate) fn new(kid: String, nbf: Option<u64>, key: KeyMaterial) -> Self {
        Self { kid, nbf, key }
    }

    /// The key id this key was published under.
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// The JWK's not-before timestamp, if it carried one.
    pub fn nbf(&self) -> Option<u64> {
        self.nbf
    }

    /// The PEM certificate, when this key came from an `x5c` chain.
    pub fn public_key(&self) -> Option<&str> {
        match &self.key {
            KeyMaterial::Certificate(pem) => Some(pem),
            KeyMaterial::RsaPublicKey(_) => None,
        }
    }

    /// The PKCS#1 PEM RSA public key, when this key came from `n`/`e`.
    pub fn rsa_public_key(&self) -> Option<&str> {
        match &self.key {
            KeyMaterial::Certificate(_) => None,
            KeyMaterial::RsaPublicKey(pem) => Some(pem),
        }
    }

    /// The PEM text, whichever encoding was produced.
    pub fn pem(&self) -> &str {
        match &self.key {
            KeyMaterial::Certificate(pem) | KeyMaterial::RsaPublicKey(pem) => pem,
        }
    }

    /// Which encoding this key carries.
    pub fn material(&self) -> &KeyMaterial {
        &self.key
    }
}
