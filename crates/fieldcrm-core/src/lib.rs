//! Call workflow orchestration for the field call intake agent.
//!
//! This crate owns the submission state machine, validation of the model's
//! save action, the boundary facade consumed by presentation layers, and
//! construction of the store and engine from config.

pub mod agent;
pub mod bootstrap;
pub mod error;
pub mod validate;
pub mod workflow;

pub use agent::CrmAgent;
pub use error::CoreError;
pub use workflow::CallWorkflow;

pub use fieldcrm_protocol::EventSink;
