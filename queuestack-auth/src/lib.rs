//! Request signing for queuestack
//!
//! Implements AWS Signature Version 2 over query-string parameters.

pub mod sigv2;

pub use sigv2::{canonical_query, SignatureV2, Signer, SignerError};
