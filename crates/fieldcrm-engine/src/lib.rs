//! Reasoning engine adapter for call analysis.
//!
//! Builds the deterministic analysis instruction, declares the single
//! `log_crm_entry` action, forces the engine to invoke it, and classifies
//! whatever comes back. Concrete engines for the Gemini/Vertex REST API and
//! for any `autoagents_llm` provider live alongside.

pub mod action;
mod analyst;
mod gemini;
pub mod prompt;
mod provider;

pub use action::{LOG_CRM_ENTRY, log_crm_entry_spec};
pub use analyst::CallAnalyst;
pub use gemini::{GeminiAuth, GeminiEngine, GeminiEngineConfig};
pub use provider::LlmProviderEngine;
