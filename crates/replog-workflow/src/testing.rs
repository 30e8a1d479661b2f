//! Scripted in-memory [`InteractionApi`] for workflow tests.
//!
//! Each operation pops the next scripted response for that operation (keyed
//! by id for fetches) and counts the call. A fetch with no script left
//! answers with a pending record, so unresolved poll loops can run
//! indefinitely under test.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use replog_client::{ApiError, InteractionApi};
use replog_core::{
    FollowupResult, Hcp, HcpDraft, HcpReceipt, Interaction, InteractionDraft, InteractionReceipt,
    InteractionSummary, Mode, Status, TrendSummary,
};

#[derive(Debug)]
pub enum ScriptedResponse {
    Receipt(InteractionReceipt),
    Record(Interaction),
    Followups(FollowupResult),
    Trend(TrendSummary),
    Error { status: u16, body: String },
    /// Wait before answering with the inner response; lets tests race two
    /// invocations against each other under paused time.
    Delayed(Duration, Box<ScriptedResponse>),
}

impl ScriptedResponse {
    pub fn receipt(id: i64) -> Self {
        Self::Receipt(InteractionReceipt {
            id,
            status: Status::Pending,
            created_at: Some("2026-08-27T10:00:00".into()),
        })
    }

    pub fn pending(id: i64) -> Self {
        Self::Record(pending_record(id))
    }

    pub fn processed(id: i64, summary: &str, topics: &[&str], sentiment: &str) -> Self {
        let mut record = pending_record(id);
        record.status = Status::Processed;
        record.summary = Some(summary.to_string());
        record.topics = Some(topics.iter().map(|t| t.to_string()).collect());
        record.sentiment = Some(sentiment.to_string());
        Self::Record(record)
    }

    pub fn followups(id: i64, suggestions: &[&str]) -> Self {
        Self::Followups(FollowupResult {
            interaction_id: id,
            followups: suggestions.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn trend(hcp_id: i64, summary: &str) -> Self {
        Self::Trend(TrendSummary {
            hcp_id,
            summary: summary.to_string(),
            topics: vec![],
        })
    }

    pub fn server_error(status: u16, body: &str) -> Self {
        Self::Error {
            status,
            body: body.to_string(),
        }
    }

    pub fn delayed(delay: Duration, inner: ScriptedResponse) -> Self {
        Self::Delayed(delay, Box::new(inner))
    }
}

fn pending_record(id: i64) -> Interaction {
    Interaction {
        id,
        hcp_id: Some(2),
        rep_id: "rep_a".into(),
        mode: Mode::Chat,
        raw_text: Some("met dr x".into()),
        form_data: None,
        summary: None,
        topics: None,
        sentiment: None,
        status: Status::Pending,
        created_at: "2026-08-27T10:00:00".into(),
        updated_at: None,
    }
}

#[derive(Default)]
struct Scripts {
    create: Vec<ScriptedResponse>,
    edit: Vec<ScriptedResponse>,
    process: Vec<ScriptedResponse>,
    get: HashMap<i64, Vec<ScriptedResponse>>,
    followups: Vec<ScriptedResponse>,
    trend: Vec<ScriptedResponse>,
}

#[derive(Default)]
struct Counters {
    create: u32,
    get: HashMap<i64, u32>,
    followups: u32,
    followup_requests: Vec<i64>,
    trend: u32,
    trend_requests: Vec<i64>,
}

#[derive(Default)]
pub struct FakeApi {
    scripts: Mutex<Scripts>,
    counters: Mutex<Counters>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_create(&self, response: ScriptedResponse) {
        self.scripts.lock().unwrap().create.push(response);
    }

    pub fn script_edit(&self, response: ScriptedResponse) {
        self.scripts.lock().unwrap().edit.push(response);
    }

    pub fn script_process(&self, response: ScriptedResponse) {
        self.scripts.lock().unwrap().process.push(response);
    }

    pub fn script_get(&self, id: i64, response: ScriptedResponse) {
        self.scripts
            .lock()
            .unwrap()
            .get
            .entry(id)
            .or_default()
            .push(response);
    }

    pub fn script_followups(&self, response: ScriptedResponse) {
        self.scripts.lock().unwrap().followups.push(response);
    }

    pub fn script_trend(&self, response: ScriptedResponse) {
        self.scripts.lock().unwrap().trend.push(response);
    }

    pub fn create_calls(&self) -> u32 {
        self.counters.lock().unwrap().create
    }

    pub fn get_calls(&self, id: i64) -> u32 {
        self.counters
            .lock()
            .unwrap()
            .get
            .get(&id)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_get_calls(&self) -> u32 {
        self.counters.lock().unwrap().get.values().sum()
    }

    pub fn followup_calls(&self) -> u32 {
        self.counters.lock().unwrap().followups
    }

    /// Interaction ids the follow-up tool was invoked with, in call order.
    pub fn followup_requests(&self) -> Vec<i64> {
        self.counters.lock().unwrap().followup_requests.clone()
    }

    pub fn trend_calls(&self) -> u32 {
        self.counters.lock().unwrap().trend
    }

    /// HCP ids the trend tool was invoked with, in call order.
    pub fn trend_requests(&self) -> Vec<i64> {
        self.counters.lock().unwrap().trend_requests.clone()
    }

    async fn resolve(response: ScriptedResponse) -> ScriptedResponse {
        match response {
            ScriptedResponse::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                *inner
            }
            other => other,
        }
    }
}

fn pop_front(queue: &mut Vec<ScriptedResponse>) -> Option<ScriptedResponse> {
    if queue.is_empty() {
        None
    } else {
        Some(queue.remove(0))
    }
}

fn as_receipt(response: ScriptedResponse, op: &str) -> Result<InteractionReceipt, ApiError> {
    match response {
        ScriptedResponse::Receipt(receipt) => Ok(receipt),
        ScriptedResponse::Error { status, body } => Err(ApiError::Server { status, body }),
        other => panic!("scripted {op} response is not a receipt: {other:?}"),
    }
}

#[async_trait]
impl InteractionApi for FakeApi {
    async fn list_hcps(&self) -> Result<Vec<Hcp>, ApiError> {
        Ok(vec![])
    }

    async fn create_hcp(&self, _draft: &HcpDraft) -> Result<HcpReceipt, ApiError> {
        unimplemented!("not exercised by workflow tests")
    }

    async fn create_interaction(
        &self,
        _draft: &InteractionDraft,
    ) -> Result<InteractionReceipt, ApiError> {
        self.counters.lock().unwrap().create += 1;
        let scripted = pop_front(&mut self.scripts.lock().unwrap().create)
            .expect("no scripted create response left");
        as_receipt(Self::resolve(scripted).await, "create")
    }

    async fn get_interaction(&self, id: i64) -> Result<Interaction, ApiError> {
        {
            let mut counters = self.counters.lock().unwrap();
            *counters.get.entry(id).or_insert(0) += 1;
        }
        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .get
            .get_mut(&id)
            .and_then(pop_front);
        match scripted {
            None => Ok(pending_record(id)),
            Some(response) => match Self::resolve(response).await {
                ScriptedResponse::Record(record) => Ok(record),
                ScriptedResponse::Error { status, body } => {
                    Err(ApiError::Server { status, body })
                }
                other => panic!("scripted get response is not a record: {other:?}"),
            },
        }
    }

    async fn list_interactions(
        &self,
        _hcp_id: Option<i64>,
    ) -> Result<Vec<InteractionSummary>, ApiError> {
        Ok(vec![])
    }

    async fn edit_interaction(
        &self,
        _id: i64,
        _updates: &serde_json::Value,
    ) -> Result<InteractionReceipt, ApiError> {
        let scripted = pop_front(&mut self.scripts.lock().unwrap().edit)
            .expect("no scripted edit response left");
        as_receipt(Self::resolve(scripted).await, "edit")
    }

    async fn process_now(&self, _id: i64) -> Result<InteractionReceipt, ApiError> {
        let scripted = pop_front(&mut self.scripts.lock().unwrap().process)
            .expect("no scripted process response left");
        as_receipt(Self::resolve(scripted).await, "process")
    }

    async fn generate_followups(&self, id: i64) -> Result<FollowupResult, ApiError> {
        {
            let mut counters = self.counters.lock().unwrap();
            counters.followups += 1;
            counters.followup_requests.push(id);
        }
        let scripted = pop_front(&mut self.scripts.lock().unwrap().followups)
            .expect("no scripted followups response left");
        match Self::resolve(scripted).await {
            ScriptedResponse::Followups(result) => Ok(result),
            ScriptedResponse::Error { status, body } => Err(ApiError::Server { status, body }),
            other => panic!("scripted followups response has wrong shape: {other:?}"),
        }
    }

    async fn trend_summary(&self, hcp_id: i64) -> Result<TrendSummary, ApiError> {
        {
            let mut counters = self.counters.lock().unwrap();
            counters.trend += 1;
            counters.trend_requests.push(hcp_id);
        }
        let scripted = pop_front(&mut self.scripts.lock().unwrap().trend)
            .expect("no scripted trend response left");
        match Self::resolve(scripted).await {
            ScriptedResponse::Trend(trend) => Ok(trend),
            ScriptedResponse::Error { status, body } => Err(ApiError::Server { status, body }),
            other => panic!("scripted trend response has wrong shape: {other:?}"),
        }
    }
}
