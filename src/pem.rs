//! PEM encoding of JWK key material.
//!
//! Two conversions cover everything a JWKS can carry for RS* verification:
//! wrapping an `x5c` certificate in CERTIFICATE armor, and building the
//! PKCS#1 `RSAPublicKey` structure from raw `n`/`e` components:
//!
//! ```text
//! RSAPublicKey ::= SEQUENCE {
//!     modulus           INTEGER,  -- n
//!     publicExponent    INTEGER   -- e
//! }
//! ```
//!
//! The second conversion is where binary encoding rules bite: DER encodes
//! INTEGER as signed, so an unsigned value whose top bit is set needs a
//! leading zero byte, and payloads over 127 bytes need definite long-form
//! length prefixes. [`UintRef`] enforces both. No key validation happens
//! here; this is conversion, not verification.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use rsa::pkcs1;
use rsa::pkcs1::der::{asn1::UintRef, Encode as _};

use crate::error::JwksError;

/// PEM type label for certificates taken from an `x5c` chain
const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// PEM type label for PKCS#1 RSA public keys built from `n`/`e`
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

/// Wrap one `x5c` entry (standard-base64 DER certificate bytes) in PEM armor.
///
/// The input is decoded only to validate the base64 text; the DER bytes pass
/// through untouched and are re-wrapped at 64 columns per RFC 7468.
///
/// # Errors
/// [`JwksError::MalformedKey`] when the input is not valid base64.
pub fn cert_to_pem(der_base64: &str) -> Result<String, JwksError> {
    let der = STANDARD.decode(der_base64).map_err(|e| {
        JwksError::MalformedKey(format!("x5c certificate is not valid base64: {e}"))
    })?;
    pem_rfc7468::encode_string(CERTIFICATE_LABEL, pem_rfc7468::LineEnding::LF, &der)
        .map_err(|e| JwksError::MalformedKey(format!("failed to PEM-encode certificate: {e}")))
}

/// Build a PKCS#1 PEM RSA public key from base64url modulus and exponent.
///
/// Accepts the unpadded base64url mandated for JWK components; trailing `=`
/// padding is tolerated since some issuers emit it anyway.
///
/// # Errors
/// [`JwksError::MalformedKey`] when either component fails to decode or the
/// DER structure cannot be built.
pub fn rsa_public_key_to_pem(n: &str, e: &str) -> Result<String, JwksError> {
    let n = decode_component(n, "modulus")?;
    let e = decode_component(e, "exponent")?;

    let key = pkcs1::RsaPublicKey {
        modulus: UintRef::new(&n).map_err(|e| {
            JwksError::MalformedKey(format!("RSA modulus is not a valid DER integer: {e}"))
        })?,
        public_exponent: UintRef::new(&e).map_err(|err| {
            JwksError::MalformedKey(format!("RSA exponent is not a valid DER integer: {err}"))
        })?,
    };
    let der = key.to_der().map_err(|e| {
        JwksError::MalformedKey(format!("failed to DER-encode RSA public key: {e}"))
    })?;
    pem_rfc7468::encode_string(RSA_PUBLIC_KEY_LABEL, pem_rfc7468::LineEnding::LF, &der)
        .map_err(|e| JwksError::MalformedKey(format!("failed to PEM-encode RSA public key: {e}")))
}

fn decode_component(value: &str, name: &str) -> Result<Vec<u8>, JwksError> {
    URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|e| JwksError::MalformedKey(format!("RSA {name} is not valid base64url: {e}")))
}
