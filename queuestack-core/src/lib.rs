//! Core types for queuestack
//!
//! This crate provides the types shared by the signer and the SQS client:
//! regions, credentials, response metadata and the service error envelope.

use std::collections::BTreeMap;

pub mod account;
pub mod error;
pub mod metadata;

pub use account::{Credentials, Region, RegionError};
pub use error::{ErrorDetail, ErrorEnvelope, ErrorShape, ServiceError};
pub use metadata::ResponseMetadata;

/// Request parameters for one query-protocol call, keyed by parameter name.
///
/// A `BTreeMap` keeps iteration order stable, which the signer relies on when
/// it builds the canonical query string.
pub type ParameterMap = BTreeMap<String, String>;
