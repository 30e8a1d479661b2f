//! Orchestration over the transport client and domain store: the submission
//! state machine with its cancellable poll loop, and the independent tool
//! invocations that run against resolved identifiers.

pub mod submission;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

use replog_client::ApiError;
use replog_core::DraftError;
use thiserror::Error;

pub use submission::{PollConfig, SubmissionState, SubmissionWorkflow};
pub use tools::{ToolInvoker, ToolState};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid draft: {0}")]
    InvalidDraft(#[from] DraftError),
    /// No interaction id is resolvable; caught client-side, no call is made.
    #[error("no interaction available")]
    NoInteraction,
    /// No HCP id is resolvable; caught client-side, no call is made.
    #[error("no provider selected")]
    NoHcpSelected,
}
