//! Error types for workflow bootstrap.

use fieldcrm_protocol::EngineError;
use thiserror::Error;

/// Errors returned while assembling an agent from config.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Credential environment variable is unset or blank.
    #[error("missing credential: set {0}")]
    MissingCredential(String),
    /// Config is incomplete for the selected provider.
    #[error("config error: {0}")]
    Config(String),
    /// Engine construction failed.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    /// LLM provider builder rejected the settings.
    #[error("provider error: {0}")]
    Provider(String),
}
