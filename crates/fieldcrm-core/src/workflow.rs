//! Per-submission state machine: analyze, validate, persist.

use crate::validate::validate_action;
use chrono::Utc;
use fieldcrm_engine::CallAnalyst;
use fieldcrm_protocol::{
    CallAnalysis, CallId, EventSink, SubmissionId, SubmitRequest, SubmitResponse, WorkflowError,
    WorkflowEvent, WorkflowState,
};
use fieldcrm_store::RecordStore;
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

/// Runs submissions through `Analyzing -> Validating -> Persisting`.
///
/// Holds no state across submissions. Every failure is terminal for the
/// submission; nothing is retried and nothing is written unless validation
/// passed. The store write is blocking I/O and runs on tokio's blocking pool.
#[derive(Clone)]
pub struct CallWorkflow {
    analyst: CallAnalyst,
    store: RecordStore,
    events: Option<Arc<dyn EventSink>>,
}

impl CallWorkflow {
    pub fn new(analyst: CallAnalyst, store: RecordStore) -> Self {
        Self {
            analyst,
            store,
            events: None,
        }
    }

    /// Publish state transitions to `sink`.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Run one submission to `Done` or `Failed`.
    pub async fn submit(&self, request: &SubmitRequest) -> SubmitResponse {
        let mut run = Run::start(request.call_id.clone(), self.events.clone());
        info!(
            "submission started (submission_id={}, call_id={})",
            run.submission_id, request.call_id
        );
        match self.drive(&mut run, request).await {
            Ok(analysis) => {
                run.advance(WorkflowState::Done, None);
                info!(
                    "submission saved (submission_id={}, call_id={}, risk={})",
                    run.submission_id, request.call_id, analysis.compliance_flag
                );
                SubmitResponse::Success(analysis)
            }
            Err(err) => {
                run.advance(WorkflowState::Failed, Some(err.to_string()));
                warn!(
                    "submission failed (submission_id={}, call_id={}): {}",
                    run.submission_id, request.call_id, err
                );
                SubmitResponse::from(err)
            }
        }
    }

    async fn drive(
        &self,
        run: &mut Run,
        request: &SubmitRequest,
    ) -> Result<CallAnalysis, WorkflowError> {
        run.advance(WorkflowState::Analyzing, None);
        let invocation = self.analyst.analyze_and_decide(request).await?;

        run.advance(WorkflowState::Validating, None);
        let action = validate_action(&invocation, request)?;

        run.advance(WorkflowState::Persisting, None);
        let record = action.to_record(request);
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.append(&record))
            .await
            .map_err(|err| WorkflowError::PersistFailed(err.to_string()))??;

        Ok(action.into_analysis())
    }
}

/// Bookkeeping for one submission's transitions.
struct Run {
    submission_id: SubmissionId,
    call_id: CallId,
    state: WorkflowState,
    events: Option<Arc<dyn EventSink>>,
}

impl Run {
    fn start(call_id: CallId, events: Option<Arc<dyn EventSink>>) -> Self {
        Self {
            submission_id: Uuid::new_v4(),
            call_id,
            state: WorkflowState::Idle,
            events,
        }
    }

    fn advance(&mut self, next: WorkflowState, error: Option<String>) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(
            "workflow transition (submission_id={}, from={:?}, to={:?})",
            self.submission_id, self.state, next
        );
        self.state = next;
        if let Some(events) = &self.events {
            events.emit(WorkflowEvent {
                submission_id: self.submission_id,
                call_id: self.call_id.clone(),
                state: next,
                error,
                at: Utc::now(),
            });
        }
    }
}
