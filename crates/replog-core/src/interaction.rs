//! Interaction records and submission payloads.
//!
//! Wire shapes follow the backend exactly: snake_case field names, ISO 8601
//! timestamps carried as strings. The backend returns three different
//! projections of the same record — a reduced receipt from create/edit/process
//! calls, a summary row from the list endpoint, and the full record from
//! fetch-by-id — so each gets its own type rather than a single struct full
//! of optional fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input mode for a logged interaction.
///
/// Determines which of `form_data` / `raw_text` is populated; the two are
/// mutually exclusive (see [`InteractionDraft::validate`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Form,
    Chat,
}

/// Backend processing status.
///
/// `pending` immediately after creation, `processed` once extraction has
/// completed. Any other status string fails to deserialize — the poll loop
/// must never treat an unknown status as terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Processed,
}

/// Structured form fields for form-mode submissions.
///
/// `topic` and `materials` are the conventional keys; anything else the form
/// captured rides along in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A draft that violates the mode/payload shape contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("form mode requires form_data and no raw_text")]
    FormShape,
    #[error("chat mode requires non-empty raw_text and no form_data")]
    ChatShape,
    #[error("rep_id must not be empty")]
    MissingRepId,
}

/// Payload for `POST /v1/interactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionDraft {
    pub hcp_id: Option<i64>,
    pub rep_id: String,
    pub mode: Mode,
    pub raw_text: Option<String>,
    pub form_data: Option<FormData>,
}

impl InteractionDraft {
    /// A form-mode draft carrying structured fields.
    pub fn form(hcp_id: Option<i64>, rep_id: impl Into<String>, form_data: FormData) -> Self {
        Self {
            hcp_id,
            rep_id: rep_id.into(),
            mode: Mode::Form,
            raw_text: None,
            form_data: Some(form_data),
        }
    }

    /// A chat-mode draft carrying free-form narrative.
    pub fn chat(hcp_id: Option<i64>, rep_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            hcp_id,
            rep_id: rep_id.into(),
            mode: Mode::Chat,
            raw_text: Some(raw_text.into()),
            form_data: None,
        }
    }

    /// Check the mode/payload shape contract: exactly one of `form_data` /
    /// `raw_text` is set, matching the declared mode.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.rep_id.trim().is_empty() {
            return Err(DraftError::MissingRepId);
        }
        match self.mode {
            Mode::Form => {
                if self.form_data.is_none() || self.raw_text.is_some() {
                    return Err(DraftError::FormShape);
                }
            }
            Mode::Chat => {
                let has_text = self
                    .raw_text
                    .as_deref()
                    .is_some_and(|text| !text.trim().is_empty());
                if !has_text || self.form_data.is_some() {
                    return Err(DraftError::ChatShape);
                }
            }
        }
        Ok(())
    }
}

/// Full record as returned by `GET /v1/interactions/{id}`.
///
/// `summary`, `topics` and `sentiment` are derived server-side and only
/// present once `status` is [`Status::Processed`]. They are copied verbatim
/// from responses, never synthesized on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: i64,
    #[serde(default)]
    pub hcp_id: Option<i64>,
    pub rep_id: String,
    pub mode: Mode,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub form_data: Option<FormData>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub sentiment: Option<String>,
    pub status: Status,
    /// ISO 8601 timestamp string.
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Reduced record returned by create, edit and force-process calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionReceipt {
    pub id: i64,
    pub status: Status,
    /// Present on create responses, absent on edit/process responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Row shape of the `GET /v1/interactions` list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSummary {
    pub id: i64,
    #[serde(default)]
    pub hcp_id: Option<i64>,
    pub rep_id: String,
    pub mode: Mode,
    #[serde(default)]
    pub summary: Option<String>,
    pub status: Status,
    pub created_at: String,
}
