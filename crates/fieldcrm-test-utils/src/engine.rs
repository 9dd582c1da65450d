use async_trait::async_trait;
use fieldcrm_protocol::{
    ActionInvocation, EngineError, EngineResponse, GenerationRequest, ReasoningEngine,
};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Engine that answers every request with the same response and keeps the
/// requests it saw.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    response: EngineResponse,
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedEngine {
    pub fn new(response: EngineResponse) -> Self {
        Self {
            response,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Engine that invokes `name` with `args`.
    pub fn invoking(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self::new(EngineResponse::Invocation(ActionInvocation {
            name: name.into(),
            args,
        }))
    }

    /// Engine that answers with text only.
    pub fn refusing(text: impl Into<String>) -> Self {
        Self::new(EngineResponse::Refusal { text: text.into() })
    }

    pub fn empty() -> Self {
        Self::new(EngineResponse::Empty)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ReasoningEngine for ScriptedEngine {
    async fn generate(&self, request: &GenerationRequest) -> Result<EngineResponse, EngineError> {
        self.requests.lock().push(request.clone());
        Ok(self.response.clone())
    }
}

/// Engine whose transport always fails.
#[derive(Debug, Clone)]
pub struct FailingEngine {
    error: EngineError,
}

impl FailingEngine {
    pub fn new(error: EngineError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl ReasoningEngine for FailingEngine {
    async fn generate(&self, _request: &GenerationRequest) -> Result<EngineResponse, EngineError> {
        Err(self.error.clone())
    }
}
