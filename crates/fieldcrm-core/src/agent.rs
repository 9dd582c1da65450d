//! Boundary facade consumed by presentation layers.

use crate::bootstrap::{build_connector, build_engine};
use crate::error::CoreError;
use crate::workflow::CallWorkflow;
use fieldcrm_config::CrmConfig;
use fieldcrm_engine::CallAnalyst;
use fieldcrm_protocol::{
    CallId, EventSink, ReasoningEngine, SheetConnector, SheetRow, SubmitRequest, SubmitResponse,
};
use fieldcrm_store::RecordStore;
use log::info;
use std::sync::Arc;

/// Call intake agent: ID allocation, submission, and recent-record reads.
#[derive(Clone)]
pub struct CrmAgent {
    store: RecordStore,
    workflow: CallWorkflow,
}

impl CrmAgent {
    pub fn new(connector: Arc<dyn SheetConnector>, engine: Arc<dyn ReasoningEngine>) -> Self {
        let store = RecordStore::new(connector);
        let workflow = CallWorkflow::new(CallAnalyst::new(engine), store.clone());
        Self { store, workflow }
    }

    /// Build the store and engine described by `config`.
    pub fn from_config(config: &CrmConfig) -> Result<Self, CoreError> {
        let connector = build_connector(&config.store);
        let engine = build_engine(&config.engine)?;
        info!(
            "call agent ready (backend={:?}, provider={:?}, model={})",
            config.store.backend, config.engine.provider, config.engine.model
        );
        Ok(Self::new(connector, engine))
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.workflow = self.workflow.with_event_sink(sink);
        self
    }

    /// Next call identifier; degrades to a sentinel instead of failing.
    pub fn allocate_next_id(&self) -> CallId {
        self.store.allocate_next_id()
    }

    pub async fn submit(&self, request: &SubmitRequest) -> SubmitResponse {
        self.workflow.submit(request).await
    }

    /// Advisory read of the last `n` rows; empty when the store is down.
    pub fn peek_recent_records(&self, n: usize) -> Vec<SheetRow> {
        self.store.read_recent(n)
    }
}
