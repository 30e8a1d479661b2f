//! Normalized client-visible state for the interaction workflow.
//!
//! Every write is a whole-slot replacement driven by a [`StoreEvent`]; no
//! transition ever merges partial fields into an existing record, so readers
//! never observe a record mixing fields from unrelated responses. The last
//! writer to a slot wins — that is the entire concurrency discipline.

use std::sync::{Arc, RwLock};

use replog_core::{Hcp, Interaction, InteractionReceipt, InteractionSummary};

/// Lifecycle flag for one fetch category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// A state transition. Applying an event replaces the corresponding slot
/// wholesale.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    HcpsLoading,
    /// Replaces the HCP list as received: order preserved, no dedup by id.
    HcpsLoaded(Vec<Hcp>),
    HcpsFailed(String),
    SubmissionStarted,
    /// Records the receipt of a freshly created (or re-submitted) record.
    InteractionCreated(InteractionReceipt),
    SubmissionFailed(String),
    /// Sets the currently viewed record; used by both the poll loop and any
    /// direct fetch-by-id.
    InteractionObserved(Interaction),
    InteractionsListed(Vec<InteractionSummary>),
    CurrentCleared,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionStore {
    pub hcps: Vec<Hcp>,
    pub last_created: Option<InteractionReceipt>,
    pub current: Option<Interaction>,
    pub list: Vec<InteractionSummary>,
    pub hcp_fetch: FetchStatus,
    pub submission: FetchStatus,
    pub last_error: Option<String>,
}

impl InteractionStore {
    pub fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::HcpsLoading => self.hcp_fetch = FetchStatus::Loading,
            StoreEvent::HcpsLoaded(hcps) => {
                self.hcps = hcps;
                self.hcp_fetch = FetchStatus::Succeeded;
            }
            StoreEvent::HcpsFailed(message) => {
                self.hcp_fetch = FetchStatus::Failed;
                self.last_error = Some(message);
            }
            StoreEvent::SubmissionStarted => {
                self.submission = FetchStatus::Loading;
                self.last_error = None;
            }
            StoreEvent::InteractionCreated(receipt) => {
                self.last_created = Some(receipt);
                self.submission = FetchStatus::Succeeded;
            }
            StoreEvent::SubmissionFailed(message) => {
                self.submission = FetchStatus::Failed;
                self.last_error = Some(message);
            }
            StoreEvent::InteractionObserved(record) => self.current = Some(record),
            StoreEvent::InteractionsListed(rows) => self.list = rows,
            StoreEvent::CurrentCleared => self.current = None,
        }
    }

    /// The interaction the client is currently acting on.
    ///
    /// Contract: the observed (`current`) record takes precedence over the
    /// just-created receipt. This is the single place that precedence lives.
    pub fn active_interaction_id(&self) -> Option<i64> {
        self.current
            .as_ref()
            .map(|record| record.id)
            .or_else(|| self.last_created.as_ref().map(|receipt| receipt.id))
    }

    /// The HCP referenced by the currently viewed record, if any. Explicit
    /// selection by the caller always wins over this inference.
    pub fn active_hcp_id(&self) -> Option<i64> {
        self.current.as_ref().and_then(|record| record.hcp_id)
    }
}

/// Cheaply clonable shared handle. All writes go through [`StoreHandle::apply`].
#[derive(Clone, Default)]
pub struct StoreHandle {
    inner: Arc<RwLock<InteractionStore>>,
}

impl StoreHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&self, event: StoreEvent) {
        self.inner
            .write()
            .expect("interaction store write lock")
            .apply(event);
    }

    pub fn snapshot(&self) -> InteractionStore {
        self.inner
            .read()
            .expect("interaction store read lock")
            .clone()
    }

    pub fn active_interaction_id(&self) -> Option<i64> {
        self.inner
            .read()
            .expect("interaction store read lock")
            .active_interaction_id()
    }

    pub fn active_hcp_id(&self) -> Option<i64> {
        self.inner
            .read()
            .expect("interaction store read lock")
            .active_hcp_id()
    }
}
