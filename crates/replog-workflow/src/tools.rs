//! On-demand derived computations against already-resolved identifiers.
//!
//! Two structurally identical operations — follow-up generation keyed by
//! interaction id, trend summarization keyed by HCP id — each owning its own
//! loading/result/error slot, fully decoupled from the submission poll loop
//! and from each other. Results are ephemeral: every invocation replaces the
//! slot wholesale.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use replog_client::InteractionApi;
use replog_core::{FollowupResult, TrendSummary};
use replog_store::StoreHandle;
use tracing::{debug, info};

use crate::WorkflowError;

/// Lifecycle of one tool slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolState<T> {
    #[default]
    Idle,
    Running,
    Succeeded(T),
    Failed(String),
}

pub struct ToolInvoker {
    api: Arc<dyn InteractionApi>,
    store: StoreHandle,
    followups: RwLock<ToolState<FollowupResult>>,
    trend: RwLock<ToolState<TrendSummary>>,
    followup_seq: AtomicU64,
    trend_seq: AtomicU64,
}

impl ToolInvoker {
    pub fn new(api: Arc<dyn InteractionApi>, store: StoreHandle) -> Self {
        Self {
            api,
            store,
            followups: RwLock::new(ToolState::Idle),
            trend: RwLock::new(ToolState::Idle),
            followup_seq: AtomicU64::new(0),
            trend_seq: AtomicU64::new(0),
        }
    }

    pub fn followups(&self) -> ToolState<FollowupResult> {
        self.followups.read().expect("followup slot lock").clone()
    }

    pub fn trend(&self) -> ToolState<TrendSummary> {
        self.trend.read().expect("trend slot lock").clone()
    }

    /// Generate follow-up suggestions for the active interaction.
    ///
    /// The id is resolved through the store's documented precedence (observed
    /// record over just-created receipt); with no resolvable id this fails
    /// before any network call is attempted.
    pub async fn generate_followups(&self) -> Result<FollowupResult, WorkflowError> {
        let id = self
            .store
            .active_interaction_id()
            .ok_or(WorkflowError::NoInteraction)?;

        let seq = self.followup_seq.fetch_add(1, Ordering::SeqCst) + 1;
        *self.followups.write().expect("followup slot lock") = ToolState::Running;
        debug!(id, "generating follow-ups");

        let outcome = self.api.generate_followups(id).await;
        if self.followup_seq.load(Ordering::SeqCst) != seq {
            // A newer invocation owns the slot; this response is stale.
            debug!(id, "discarding stale follow-up response");
            return outcome.map_err(Into::into);
        }

        match outcome {
            Ok(result) => {
                info!(id, count = result.followups.len(), "follow-ups generated");
                *self.followups.write().expect("followup slot lock") =
                    ToolState::Succeeded(result.clone());
                Ok(result)
            }
            Err(error) => {
                *self.followups.write().expect("followup slot lock") =
                    ToolState::Failed(error.to_string());
                Err(error.into())
            }
        }
    }

    /// Summarize recent topics for an HCP.
    ///
    /// An explicitly selected id always wins over the one inferred from the
    /// currently viewed interaction; with neither this fails before any
    /// network call is attempted.
    pub async fn generate_trend_summary(
        &self,
        explicit_hcp_id: Option<i64>,
    ) -> Result<TrendSummary, WorkflowError> {
        let hcp_id = explicit_hcp_id
            .or_else(|| self.store.active_hcp_id())
            .ok_or(WorkflowError::NoHcpSelected)?;

        let seq = self.trend_seq.fetch_add(1, Ordering::SeqCst) + 1;
        *self.trend.write().expect("trend slot lock") = ToolState::Running;
        debug!(hcp_id, "generating trend summary");

        let outcome = self.api.trend_summary(hcp_id).await;
        if self.trend_seq.load(Ordering::SeqCst) != seq {
            debug!(hcp_id, "discarding stale trend response");
            return outcome.map_err(Into::into);
        }

        match outcome {
            Ok(trend) => {
                info!(hcp_id, topics = trend.topics.len(), "trend summary generated");
                *self.trend.write().expect("trend slot lock") = ToolState::Succeeded(trend.clone());
                Ok(trend)
            }
            Err(error) => {
                *self.trend.write().expect("trend slot lock") = ToolState::Failed(error.to_string());
                Err(error.into())
            }
        }
    }
}
