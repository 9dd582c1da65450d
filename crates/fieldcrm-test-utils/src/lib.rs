//! Test helpers shared across fieldcrm crates.

pub mod engine;
pub mod events;
pub mod fixtures;
pub mod llm;
pub mod sheet;

pub use engine::{FailingEngine, ScriptedEngine};
pub use events::RecordingSink;
pub use fixtures::{log_crm_entry_args, sample_request};
pub use llm::{FailingLLM, FixedChatResponse, ScriptedLLM};
pub use sheet::{MemorySheet, OfflineConnector};
