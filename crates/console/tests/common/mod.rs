//! Shared fixtures for console integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use andon_console::EntityListView;
use andon_core::entity::{EntityInput, EntityKind, EntityRecord};
use andon_core::notification::Notification;
use andon_core::types::EntityId;
use andon_events::{MetricsSink, NotificationRelay};
use andon_graphql::{ApiError, EntityService, GraphQlError};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// A scripted backend failure for the next call.
#[derive(Debug, Clone)]
pub enum Failure {
    /// GraphQL error with the given `errorType` tag.
    Tagged(&'static str),
    /// Non-2xx HTTP response.
    Http(u16),
}

impl Failure {
    fn into_error(self) -> ApiError {
        match self {
            Failure::Tagged(tag) => ApiError::GraphQl(vec![GraphQlError {
                message: format!("{tag} raised by test backend"),
                error_type: Some(tag.to_string()),
            }]),
            Failure::Http(status) => ApiError::Http {
                status,
                body: "test backend failure".to_string(),
            },
        }
    }
}

/// One recorded service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(EntityKind, Option<String>),
    Create(EntityKind, EntityInput),
    Update(EntityKind, EntityId, EntityInput),
    Delete(EntityKind, EntityId),
}

#[derive(Default)]
struct Inner {
    records: Vec<EntityRecord>,
    next_id: u32,
    failure: Option<Failure>,
    stall: bool,
    calls: Vec<Call>,
}

/// In-memory stand-in for the GraphQL backend.
#[derive(Default)]
pub struct InMemoryService {
    inner: Mutex<Inner>,
}

impl InMemoryService {
    pub fn with_records(records: Vec<EntityRecord>) -> Arc<Self> {
        let service = Self::default();
        service.inner.lock().unwrap().records = records;
        Arc::new(service)
    }

    /// Make the next call fail.
    pub fn fail_next(&self, failure: Failure) {
        self.inner.lock().unwrap().failure = Some(failure);
    }

    /// Make the next call hang until its future is dropped.
    pub fn stall_next(&self) {
        self.inner.lock().unwrap().stall = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn stored(&self) -> Vec<EntityRecord> {
        self.inner.lock().unwrap().records.clone()
    }

    async fn pause_if_stalled(&self) {
        let stalled = std::mem::take(&mut self.inner.lock().unwrap().stall);
        if stalled {
            std::future::pending::<()>().await;
        }
    }

    fn begin(&self, call: Call) -> Result<std::sync::MutexGuard<'_, Inner>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        match inner.failure.take() {
            Some(failure) => Err(failure.into_error()),
            None => Ok(inner),
        }
    }
}

fn record_from(id: EntityId, input: &EntityInput) -> EntityRecord {
    let mut record = EntityRecord::new(id, input.name.clone()).with_description(input.description.clone());
    record.parent_id = input.parent_id.clone();
    record.attributes = input.attributes.clone();
    record
}

#[async_trait]
impl EntityService for InMemoryService {
    async fn list(
        &self,
        kind: EntityKind,
        parent_id: Option<&str>,
    ) -> Result<Vec<EntityRecord>, ApiError> {
        self.pause_if_stalled().await;
        let inner = self.begin(Call::List(kind, parent_id.map(str::to_string)))?;
        Ok(inner
            .records
            .iter()
            .filter(|r| parent_id.is_none() || r.parent_id.as_deref() == parent_id)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        kind: EntityKind,
        input: &EntityInput,
    ) -> Result<EntityRecord, ApiError> {
        self.pause_if_stalled().await;
        let mut inner = self.begin(Call::Create(kind, input.clone()))?;
        inner.next_id += 1;
        let record = record_from(format!("new-{}", inner.next_id), input);
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: &str,
        input: &EntityInput,
    ) -> Result<EntityRecord, ApiError> {
        self.pause_if_stalled().await;
        let mut inner = self.begin(Call::Update(kind, id.to_string(), input.clone()))?;
        let record = record_from(id.to_string(), input);
        inner.records.retain(|r| r.id != id);
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<EntityId, ApiError> {
        self.pause_if_stalled().await;
        let mut inner = self.begin(Call::Delete(kind, id.to_string()))?;
        inner.records.retain(|r| r.id != id);
        Ok(id.to_string())
    }
}

/// Metrics sink that remembers every report.
#[derive(Default)]
pub struct RecordingMetrics {
    sent: Mutex<Vec<serde_json::Value>>,
}

impl RecordingMetrics {
    pub fn sent(&self) -> Vec<serde_json::Value> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsSink for RecordingMetrics {
    async fn send(&self, data: serde_json::Value) {
        self.sent.lock().unwrap().push(data);
    }
}

/// A view wired to fresh fixtures.
pub struct Harness {
    pub view: EntityListView<Arc<InMemoryService>>,
    pub service: Arc<InMemoryService>,
    pub metrics: Arc<RecordingMetrics>,
    pub toasts: broadcast::Receiver<Notification>,
}

impl Harness {
    pub fn new(kind: EntityKind, records: Vec<EntityRecord>) -> Self {
        let service = InMemoryService::with_records(records);
        let metrics = Arc::new(RecordingMetrics::default());
        let relay = Arc::new(NotificationRelay::default());
        let toasts = relay.subscribe();
        let view = EntityListView::new(
            kind,
            Arc::clone(&service),
            relay,
            Arc::clone(&metrics) as Arc<dyn MetricsSink>,
        );
        Self {
            view,
            service,
            metrics,
            toasts,
        }
    }

    /// Every notification published so far.
    pub fn drain_toasts(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(toast) = self.toasts.try_recv() {
            out.push(toast);
        }
        out
    }
}

pub fn site(id: &str, name: &str) -> EntityRecord {
    EntityRecord::new(id, name).with_description(format!("{name} site"))
}

pub fn names<'a>(records: impl IntoIterator<Item = &'a EntityRecord>) -> Vec<&'a str> {
    records.into_iter().map(|r| r.name.as_str()).collect()
}
