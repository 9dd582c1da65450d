//! Error taxonomy shared by the adapters and the workflow.

use thiserror::Error;

/// Errors raised by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store handle could not be established.
    #[error("Database Connection Failed")]
    ConnectionFailed,
    /// A row write was rejected.
    #[error("{0}")]
    WriteFailed(String),
    /// A scan failed on an established handle.
    #[error("read failed: {0}")]
    ReadFailed(String),
}

/// Faults raised by a reasoning engine transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Network or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// Credentials were missing or rejected.
    #[error("authentication error: {0}")]
    Auth(String),
    /// Provider quota or rate limit reached.
    #[error("quota exceeded: {0}")]
    Quota(String),
    /// Provider answered with an unusable payload.
    #[error("invalid response: {0}")]
    Response(String),
    /// Engine could not be configured.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Classified failures of a single submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Engine returned no candidate output.
    #[error("Agent produced empty response.")]
    EmptyResponse,
    /// Engine answered without invoking the save action.
    #[error("Agent analyzed but refused to execute save.")]
    ActionRefused,
    /// Invocation is missing a required argument.
    #[error("Agent action is missing required argument '{0}'.")]
    MalformedAction(String),
    /// Store write failed while persisting.
    #[error("DB Write Failed: {0}")]
    PersistFailed(String),
    /// Transport, auth or quota fault from the engine.
    #[error("Workflow Exception: {0}")]
    EngineException(String),
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        WorkflowError::PersistFailed(err.to_string())
    }
}

impl From<EngineError> for WorkflowError {
    fn from(err: EngineError) -> Self {
        WorkflowError::EngineException(err.to_string())
    }
}

/// Rejections at the caller boundary, before a submission starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("Please enter a valid HCP ID (e.g. HCP_00123).")]
    InvalidHcpId,
    #[error("Please enter visit notes.")]
    EmptyNote,
    #[error("Call ID {0} is the offline placeholder; start a new call once the database is reachable.")]
    OfflineCallId(String),
}
