//! Gemini `generateContent` engine, for both the public API and Vertex AI.

use async_trait::async_trait;
use fieldcrm_protocol::{
    ActionInvocation, ActionPolicy, ActionSpec, EngineError, EngineResponse, GenerationRequest,
    ReasoningEngine,
};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Credentials and routing for the two Gemini surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeminiAuth {
    /// Public Gemini API keyed by `x-goog-api-key`.
    ApiKey(String),
    /// Vertex AI with an OAuth bearer token.
    Vertex {
        project: String,
        location: String,
        access_token: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiEngineConfig {
    pub model: String,
    pub auth: GeminiAuth,
    /// Base URL override, mainly for proxies and tests.
    pub endpoint: Option<String>,
    pub timeout: Duration,
    pub temperature: Option<f32>,
}

/// `ReasoningEngine` backed by the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiEngine {
    client: Client,
    config: GeminiEngineConfig,
}

impl GeminiEngine {
    pub fn new(config: GeminiEngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| EngineError::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client, config })
    }

    /// Full `generateContent` URL for the configured surface.
    pub fn url(&self) -> String {
        let model = &self.config.model;
        match &self.config.auth {
            GeminiAuth::ApiKey(_) => {
                let base = self.config.endpoint.as_deref().unwrap_or(GEMINI_API_BASE);
                format!("{}/models/{model}:generateContent", base.trim_end_matches('/'))
            }
            GeminiAuth::Vertex {
                project, location, ..
            } => {
                let base = self
                    .config
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| format!("https://{location}-aiplatform.googleapis.com/v1"));
                format!(
                    "{}/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent",
                    base.trim_end_matches('/')
                )
            }
        }
    }
}

#[async_trait]
impl ReasoningEngine for GeminiEngine {
    async fn generate(&self, request: &GenerationRequest) -> Result<EngineResponse, EngineError> {
        let body = GenerateContentRequest::from_request(request, self.config.temperature);
        let url = self.url();
        debug!("POST {} (model={})", url, self.config.model);

        let builder = self.client.post(&url).json(&body);
        let builder = match &self.config.auth {
            GeminiAuth::ApiKey(key) => builder.header("x-goog-api-key", key),
            GeminiAuth::Vertex { access_token, .. } => builder.bearer_auth(access_token),
        };
        let response = builder
            .send()
            .await
            .map_err(|err| EngineError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = classify_status(status, &text);
            warn!("gemini request failed: {}", err);
            return Err(err);
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| EngineError::Response(format!("failed to decode response: {err}")))?;
        Ok(parsed.first_part())
    }
}

fn classify_status(status: StatusCode, body: &str) -> EngineError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.trim().to_string());
    let detail = format!("HTTP {}: {}", status.as_u16(), message);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EngineError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => EngineError::Quota(detail),
        _ => EngineError::Response(detail),
    }
}

/// Gemini schemas spell JSON types in upper case.
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(kind)) => Value::String(kind.to_uppercase()),
                        _ => to_gemini_schema(value),
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<ToolDeclarations>,
    tool_config: ToolConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn from_request(request: &GenerationRequest, temperature: Option<f32>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.instruction.clone()),
                    function_call: None,
                }],
            }],
            tools: vec![ToolDeclarations {
                function_declarations: request.actions.iter().map(FunctionDeclaration::from).collect(),
            }],
            tool_config: ToolConfig::from(&request.policy),
            generation_config: temperature.map(|temperature| GenerationConfig { temperature }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDeclarations {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&ActionSpec> for FunctionDeclaration {
    fn from(spec: &ActionSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: to_gemini_schema(&spec.parameters),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    function_calling_config: FunctionCallingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionCallingConfig {
    mode: fieldcrm_protocol::CallingMode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    allowed_function_names: Vec<String>,
}

impl From<&ActionPolicy> for ToolConfig {
    fn from(policy: &ActionPolicy) -> Self {
        Self {
            function_calling_config: FunctionCallingConfig {
                mode: policy.mode,
                allowed_function_names: policy.allowed.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn first_part(self) -> EngineResponse {
        let Some(part) = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
        else {
            return EngineResponse::Empty;
        };
        match part.function_call {
            Some(call) => EngineResponse::Invocation(ActionInvocation {
                name: call.name,
                args: call.args,
            }),
            None => EngineResponse::Refusal {
                text: part.text.unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}
