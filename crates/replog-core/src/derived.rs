//! Ephemeral tool results: follow-up suggestions and per-HCP trend summaries.
//!
//! These are re-created on each tool invocation and held alongside the
//! canonical interaction record, never merged into it.

use serde::{Deserialize, Serialize};

/// Response of `POST /v1/interactions/{id}/generate_followups`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowupResult {
    pub interaction_id: i64,
    pub followups: Vec<String>,
}

/// Response of `POST /v1/hcps/{id}/trend_summary`, normalized at the decode
/// boundary: the backend has shipped the headline field under `trend_summary`,
/// `trendSummary` and `summary` at various points, so all three deserialize
/// into `summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub hcp_id: i64,
    #[serde(alias = "trend_summary", alias = "trendSummary")]
    pub summary: String,
    #[serde(default)]
    pub topics: Vec<String>,
}
