//! Object-safe seam over the backend surface.
//!
//! The submission workflow and tool invoker are written against this trait so
//! tests can drive them with scripted fakes instead of a live server.

use async_trait::async_trait;
use replog_core::{
    FollowupResult, Hcp, HcpDraft, HcpReceipt, Interaction, InteractionDraft, InteractionReceipt,
    InteractionSummary, TrendSummary,
};

use crate::http::ApiError;

#[async_trait]
pub trait InteractionApi: Send + Sync {
    async fn list_hcps(&self) -> Result<Vec<Hcp>, ApiError>;

    async fn create_hcp(&self, draft: &HcpDraft) -> Result<HcpReceipt, ApiError>;

    async fn create_interaction(
        &self,
        draft: &InteractionDraft,
    ) -> Result<InteractionReceipt, ApiError>;

    async fn get_interaction(&self, id: i64) -> Result<Interaction, ApiError>;

    async fn list_interactions(
        &self,
        hcp_id: Option<i64>,
    ) -> Result<Vec<InteractionSummary>, ApiError>;

    /// Full replace-by-id semantics: the backend applies `updates` and resets
    /// the record to pending for re-processing.
    async fn edit_interaction(
        &self,
        id: i64,
        updates: &serde_json::Value,
    ) -> Result<InteractionReceipt, ApiError>;

    async fn process_now(&self, id: i64) -> Result<InteractionReceipt, ApiError>;

    async fn generate_followups(&self, id: i64) -> Result<FollowupResult, ApiError>;

    async fn trend_summary(&self, hcp_id: i64) -> Result<TrendSummary, ApiError>;
}
