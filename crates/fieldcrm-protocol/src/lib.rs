//! Shared vocabulary for the field call intake agent.
//!
//! Identifiers, the persisted call record, the request/response contract
//! consumed by presentation layers, the error taxonomy, and the capability
//! ports implemented by the record store and reasoning engine adapters.

mod action;
mod error;
mod id;
mod port;
mod record;
mod request;

pub use action::{
    ActionInvocation, ActionPolicy, ActionSpec, CallingMode, EngineResponse, GenerationRequest,
};
pub use error::{EngineError, IntakeError, StoreError, WorkflowError};
pub use id::{CALL_ID_PREFIX, CallDate, CallId};
pub use port::{ReasoningEngine, Sheet, SheetConnector};
pub use record::{CallRecord, SheetRow};
pub use request::{CallAnalysis, STATUS_SUCCESS, SubmitRequest, SubmitResponse};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single submission run.
pub type SubmissionId = Uuid;

/// Lifecycle of one submission through the call workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Analyzing,
    Validating,
    Persisting,
    Done,
    Failed,
}

impl WorkflowState {
    /// Whether the state ends the submission.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a legal step.
    ///
    /// The pipeline is strictly sequential; any non-terminal stage may fail.
    pub fn can_transition_to(self, next: WorkflowState) -> bool {
        use WorkflowState::*;
        matches!(
            (self, next),
            (Idle, Analyzing)
                | (Analyzing, Validating)
                | (Validating, Persisting)
                | (Persisting, Done)
                | (Analyzing | Validating | Persisting, Failed)
        )
    }
}

/// State transition published while a submission runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    /// Submission the transition belongs to.
    pub submission_id: SubmissionId,
    /// Call the submission is analyzing.
    pub call_id: CallId,
    /// State entered.
    pub state: WorkflowState,
    /// Failure message, set only when `state` is `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Timestamp of the transition.
    pub at: DateTime<Utc>,
}

/// Observer for workflow transitions.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: WorkflowEvent);
}

#[cfg(test)]
mod tests {
    use super::WorkflowState::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pipeline_steps_are_sequential() {
        assert_eq!(Idle.can_transition_to(Analyzing), true);
        assert_eq!(Analyzing.can_transition_to(Validating), true);
        assert_eq!(Validating.can_transition_to(Persisting), true);
        assert_eq!(Persisting.can_transition_to(Done), true);
        assert_eq!(Analyzing.can_transition_to(Persisting), false);
        assert_eq!(Idle.can_transition_to(Done), false);
    }

    #[test]
    fn only_running_stages_can_fail() {
        assert_eq!(Analyzing.can_transition_to(Failed), true);
        assert_eq!(Persisting.can_transition_to(Failed), true);
        assert_eq!(Idle.can_transition_to(Failed), false);
        assert_eq!(Done.can_transition_to(Failed), false);
        assert_eq!(Failed.is_terminal(), true);
        assert_eq!(Validating.is_terminal(), false);
    }
}
