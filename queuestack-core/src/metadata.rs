//! Response metadata block

use serde::Deserialize;

/// The `ResponseMetadata` element carried by every successful reply
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseMetadata {
    #[serde(default)]
    pub request_id: String,
    /// Billed machine usage for the request
    #[serde(default)]
    pub box_usage: f64,
}
