//! Submission state machine: create a pending record, then poll by id until
//! the backend reports it processed.
//!
//! Exactly one poll loop may be active per workflow instance. A fresh
//! submission supersedes any in-flight one by cancelling its loop first, and
//! the loop handle is a scoped resource: explicit [`SubmissionWorkflow::cancel`]
//! on supersession, abort-on-drop for owner teardown.

use std::sync::Arc;
use std::time::Duration;

use replog_client::InteractionApi;
use replog_core::{Interaction, InteractionDraft, Status};
use replog_store::{StoreEvent, StoreHandle};
use tokio::sync::{Mutex, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::WorkflowError;

/// Observable state of the current submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    AwaitingProcessing { id: i64 },
    Resolved { id: i64 },
    /// The poll budget ran out before the backend reported `processed`.
    TimedOut { id: i64, attempts: u32 },
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Cadence between poll ticks.
    pub interval: Duration,
    /// Ticks before giving up and entering [`SubmissionState::TimedOut`].
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(800),
            max_attempts: 75,
        }
    }
}

#[derive(Debug)]
struct PollerState {
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl Drop for PollerState {
    fn drop(&mut self) {
        // An owner dropping the workflow without an explicit cancel must not
        // leave the timer polling in the background.
        self.task.abort();
    }
}

pub struct SubmissionWorkflow {
    api: Arc<dyn InteractionApi>,
    store: StoreHandle,
    config: PollConfig,
    poller: Mutex<Option<PollerState>>,
    state_tx: watch::Sender<SubmissionState>,
}

impl SubmissionWorkflow {
    pub fn new(api: Arc<dyn InteractionApi>, store: StoreHandle) -> Self {
        Self::with_config(api, store, PollConfig::default())
    }

    pub fn with_config(api: Arc<dyn InteractionApi>, store: StoreHandle, config: PollConfig) -> Self {
        let (state_tx, _) = watch::channel(SubmissionState::Idle);
        Self {
            api,
            store,
            config,
            poller: Mutex::new(None),
            state_tx,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state_tx.borrow().clone()
    }

    /// Watch state transitions as they are published.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state_tx.subscribe()
    }

    /// Validate and submit a draft, then start polling the created record.
    ///
    /// On a create failure the workflow reverts to `Idle`, records the error
    /// in the store, and starts no poll loop. A submission while a previous
    /// poll loop is active cancels that loop first.
    pub async fn submit(&self, draft: InteractionDraft) -> Result<i64, WorkflowError> {
        draft.validate()?;
        self.cancel().await;

        self.state_tx.send_replace(SubmissionState::Submitting);
        self.store.apply(StoreEvent::SubmissionStarted);

        let receipt = match self.api.create_interaction(&draft).await {
            Ok(receipt) => receipt,
            Err(error) => {
                self.store.apply(StoreEvent::SubmissionFailed(error.to_string()));
                self.state_tx.send_replace(SubmissionState::Idle);
                return Err(error.into());
            }
        };

        let id = receipt.id;
        info!(id, "interaction created, awaiting processing");
        self.store.apply(StoreEvent::InteractionCreated(receipt));
        self.start_polling(id).await;
        Ok(id)
    }

    /// Apply field updates to an existing record and poll it again.
    ///
    /// The backend resets the record to pending, so the stale `current`
    /// record (whose derived fields no longer apply) is cleared and the
    /// record is re-treated as unresolved until the loop observes it
    /// processed again.
    pub async fn edit(&self, id: i64, updates: serde_json::Value) -> Result<(), WorkflowError> {
        self.cancel().await;

        self.state_tx.send_replace(SubmissionState::Submitting);
        self.store.apply(StoreEvent::SubmissionStarted);

        let receipt = match self.api.edit_interaction(id, &updates).await {
            Ok(receipt) => receipt,
            Err(error) => {
                self.store.apply(StoreEvent::SubmissionFailed(error.to_string()));
                self.state_tx.send_replace(SubmissionState::Idle);
                return Err(error.into());
            }
        };

        info!(id, "interaction edited, awaiting re-processing");
        self.store.apply(StoreEvent::CurrentCleared);
        self.store.apply(StoreEvent::InteractionCreated(receipt));
        self.start_polling(id).await;
        Ok(())
    }

    /// Ask the backend to process a record immediately, then observe the
    /// result directly instead of polling.
    pub async fn force_process(&self, id: i64) -> Result<Interaction, WorkflowError> {
        self.api.process_now(id).await?;
        let record = self.api.get_interaction(id).await?;
        self.store
            .apply(StoreEvent::InteractionObserved(record.clone()));
        Ok(record)
    }

    /// Stop the active poll loop, if any. Safe to call when none is running.
    ///
    /// Callers must invoke this on teardown of the owning context; `submit`
    /// and `edit` call it themselves on supersession.
    pub async fn cancel(&self) {
        let state = { self.poller.lock().await.take() };
        if let Some(mut state) = state {
            if let Some(stop_tx) = state.stop_tx.take() {
                let _ = stop_tx.send(());
            }
            if let Err(error) = (&mut state.task).await {
                warn!(error = %error, "poll task join failed");
            }
        }
    }

    /// Wait until the in-flight submission reaches a terminal state.
    ///
    /// Returns immediately with `Idle` if nothing is in flight.
    pub async fn wait_for_outcome(&self) -> SubmissionState {
        let mut rx = self.subscribe();
        loop {
            let state = rx.borrow_and_update().clone();
            match state {
                SubmissionState::Idle
                | SubmissionState::Resolved { .. }
                | SubmissionState::TimedOut { .. } => return state,
                SubmissionState::Submitting | SubmissionState::AwaitingProcessing { .. } => {
                    if rx.changed().await.is_err() {
                        return self.state();
                    }
                }
            }
        }
    }

    async fn start_polling(&self, id: i64) {
        self.state_tx
            .send_replace(SubmissionState::AwaitingProcessing { id });

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let api = Arc::clone(&self.api);
        let store = self.store.clone();
        let state_tx = self.state_tx.clone();
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately;
            // consume it so polls run on the configured cadence.
            interval.tick().await;

            let mut attempts = 0u32;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        attempts += 1;
                        match api.get_interaction(id).await {
                            Ok(record) if record.status == Status::Processed => {
                                info!(id, attempts, "interaction processed");
                                store.apply(StoreEvent::InteractionObserved(record));
                                state_tx.send_replace(SubmissionState::Resolved { id });
                                break;
                            }
                            // Still pending; wait for the next tick.
                            Ok(_) => {}
                            Err(error) => {
                                // Transient tick failures are absorbed; the
                                // next tick retries.
                                warn!(id, error = %error, "poll tick failed");
                            }
                        }
                        if attempts >= config.max_attempts {
                            warn!(id, attempts, "poll budget exhausted before processing completed");
                            state_tx.send_replace(SubmissionState::TimedOut { id, attempts });
                            break;
                        }
                    }
                }
            }
        });

        let mut guard = self.poller.lock().await;
        *guard = Some(PollerState {
            stop_tx: Some(stop_tx),
            task,
        });
    }
}
