//! HCP (healthcare professional) reference entities.
//!
//! HCPs are created out-of-band and read-mostly; the client lists them and
//! references them by id from interactions.

use serde::{Deserialize, Serialize};

/// An HCP as returned by `GET /v1/hcps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hcp {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub speciality: Option<String>,
    #[serde(default)]
    pub organisation: Option<String>,
}

/// Payload for `POST /v1/hcps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HcpDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speciality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<serde_json::Value>,
}

/// Reduced record returned by the create-HCP call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HcpReceipt {
    pub id: i64,
    pub name: String,
}
