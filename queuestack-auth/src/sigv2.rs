//! AWS Signature Version 2 implementation

use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use queuestack_core::{Credentials, ParameterMap};
use sha2::Sha256;
use thiserror::Error;
use tracing::trace;

type HmacSha256 = Hmac<Sha256>;

/// Everything except the RFC 3986 unreserved characters is escaped
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Errors during request signing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Missing access key")]
    MissingAccessKey,

    #[error("Missing secret key")]
    MissingSecretKey,
}

/// Computes a request signature and injects it into the parameter map.
///
/// Must run after every other parameter is set; the signature covers exactly
/// the parameters present when `sign` returns.
pub trait Signer: Send + Sync {
    fn sign(
        &self,
        credentials: &Credentials,
        method: &str,
        path: &str,
        host: &str,
        params: &mut ParameterMap,
    ) -> Result<(), SignerError>;
}

/// Signature Version 2 with HMAC-SHA256
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureV2;

impl Signer for SignatureV2 {
    fn sign(
        &self,
        credentials: &Credentials,
        method: &str,
        path: &str,
        host: &str,
        params: &mut ParameterMap,
    ) -> Result<(), SignerError> {
        if credentials.access_key.is_empty() {
            return Err(SignerError::MissingAccessKey);
        }
        if credentials.secret_key.is_empty() {
            return Err(SignerError::MissingSecretKey);
        }

        params.remove("Signature");
        params.insert("AWSAccessKeyId".to_string(), credentials.access_key.clone());
        params.insert("SignatureVersion".to_string(), "2".to_string());
        params.insert("SignatureMethod".to_string(), "HmacSHA256".to_string());
        if let Some(token) = &credentials.session_token {
            params.insert("SecurityToken".to_string(), token.clone());
        }

        let string_to_sign = create_string_to_sign(method, host, path, params);
        trace!(string_to_sign = %string_to_sign, "Signing request");

        params.insert(
            "Signature".to_string(),
            signature(&credentials.secret_key, &string_to_sign),
        );
        Ok(())
    }
}

/// Base64 of the HMAC-SHA256 of the string to sign, keyed by the secret key
fn signature(secret_key: &str, string_to_sign: &str) -> String {
    let digest = HmacSha256::new_from_slice(secret_key.as_bytes())
        .expect("HMAC accepts keys of any length")
        .chain_update(string_to_sign.as_bytes())
        .finalize()
        .into_bytes();
    base64::engine::general_purpose::STANDARD.encode(digest)
}

fn encode(input: &str) -> String {
    utf8_percent_encode(input, UNRESERVED).to_string()
}

/// Sorted, RFC 3986 encoded `key=value` pairs joined by `&`
pub fn canonical_query(params: &ParameterMap) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Create the string to sign
///
/// Format: METHOD\nhost\npath\ncanonical-query
fn create_string_to_sign(method: &str, host: &str, path: &str, params: &ParameterMap) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        method.to_uppercase(),
        host.to_lowercase(),
        path,
        canonical_query(params)
    )
}
