use async_trait::async_trait;
use autoagents_llm::LLMProvider;
use autoagents_llm::chat::{ChatMessage, ChatRole, FunctionTool, MessageType, Tool};
use fieldcrm_protocol::{
    ActionInvocation, CallingMode, EngineError, EngineResponse, GenerationRequest,
    ReasoningEngine,
};
use log::debug;
use serde_json::{Map, Value};
use std::sync::Arc;

/// `ReasoningEngine` over any `autoagents_llm` chat provider.
///
/// Providers without a native forced-call switch receive only the allowed
/// actions as tools; anything else in the answer is classified by the caller.
#[derive(Clone)]
pub struct LlmProviderEngine {
    llm: Arc<dyn LLMProvider>,
}

impl LlmProviderEngine {
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self { llm }
    }
}

fn offered_tools(request: &GenerationRequest) -> Vec<Tool> {
    if request.policy.mode == CallingMode::None {
        return Vec::new();
    }
    request
        .actions
        .iter()
        .filter(|spec| request.policy.mode == CallingMode::Auto || request.policy.allows(&spec.name))
        .map(|spec| Tool {
            tool_type: "function".to_string(),
            function: FunctionTool {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            },
        })
        .collect()
}

fn decode_arguments(raw: &str) -> Result<Map<String, Value>, EngineError> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(EngineError::Response(format!(
            "tool arguments are not an object: {other}"
        ))),
        Err(err) => Err(EngineError::Response(format!(
            "tool arguments are not valid JSON: {err}"
        ))),
    }
}

#[async_trait]
impl ReasoningEngine for LlmProviderEngine {
    async fn generate(&self, request: &GenerationRequest) -> Result<EngineResponse, EngineError> {
        let messages = [ChatMessage {
            role: ChatRole::User,
            message_type: MessageType::Text,
            content: request.instruction.clone(),
        }];
        let tools = offered_tools(request);
        let tools_arg = if tools.is_empty() {
            None
        } else {
            Some(tools.as_slice())
        };

        let response = self
            .llm
            .chat_with_tools(&messages, tools_arg, None)
            .await
            .map_err(|err| EngineError::Transport(err.to_string()))?;

        if let Some(call) = response
            .tool_calls()
            .and_then(|calls| calls.into_iter().next())
        {
            debug!("provider invoked {}", call.function.name);
            return Ok(EngineResponse::Invocation(ActionInvocation {
                name: call.function.name,
                args: decode_arguments(&call.function.arguments)?,
            }));
        }

        match response.text() {
            Some(text) if !text.trim().is_empty() => Ok(EngineResponse::Refusal { text }),
            _ => Ok(EngineResponse::Empty),
        }
    }
}
