//! Structured-generation request and response shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declaration of one invocable action offered to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the action arguments.
    pub parameters: Value,
}

/// How the engine may answer with respect to the declared actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallingMode {
    /// Model decides between text and action calls.
    Auto,
    /// Model must call one of the allowed actions.
    Any,
    /// Model must not call actions.
    None,
}

/// Calling mode plus the set of actions the model may pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPolicy {
    pub mode: CallingMode,
    pub allowed: Vec<String>,
}

impl ActionPolicy {
    /// Force invocation of exactly the named action.
    pub fn forced(name: impl Into<String>) -> Self {
        Self {
            mode: CallingMode::Any,
            allowed: vec![name.into()],
        }
    }

    pub fn allows(&self, name: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == name)
    }
}

/// A single structured-generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Instruction text sent as the user turn.
    pub instruction: String,
    pub actions: Vec<ActionSpec>,
    pub policy: ActionPolicy,
}

/// Action call chosen by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInvocation {
    pub name: String,
    pub args: Map<String, Value>,
}

/// First output part of an engine response.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineResponse {
    /// The model invoked an action.
    Invocation(ActionInvocation),
    /// The model answered with text only.
    Refusal { text: String },
    /// No candidate output at all.
    Empty,
}
