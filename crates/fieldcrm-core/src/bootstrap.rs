//! Store and engine construction from config.

use crate::error::CoreError;
use autoagents_llm::LLMProvider;
use autoagents_llm::backends::openai::OpenAI;
use autoagents_llm::builder::LLMBuilder;
use fieldcrm_config::{EngineConfig, EngineProvider, StoreBackend, StoreConfig};
use fieldcrm_engine::{GeminiAuth, GeminiEngine, GeminiEngineConfig, LlmProviderEngine};
use fieldcrm_protocol::{CallRecord, ReasoningEngine, SheetConnector};
use fieldcrm_store::{JsonlSheetConnector, SqliteSheetConnector};
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// Table connector for the configured backend. Never touches the disk.
pub fn build_connector(config: &StoreConfig) -> Arc<dyn SheetConnector> {
    let path = config.resolved_path();
    info!(
        "using record store (backend={:?}, path={})",
        config.backend, path
    );
    match config.backend {
        StoreBackend::Sqlite => Arc::new(SqliteSheetConnector::new(
            path,
            config.table.clone(),
            &CallRecord::COLUMNS,
        )),
        StoreBackend::Jsonl => Arc::new(JsonlSheetConnector::new(path, &CallRecord::COLUMNS)),
    }
}

/// Engine for the configured provider, reading its credential from the
/// environment.
pub fn build_engine(config: &EngineConfig) -> Result<Arc<dyn ReasoningEngine>, CoreError> {
    let env = config.credential_env();
    let credential = std::env::var(env)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| CoreError::MissingCredential(env.to_string()))?;
    build_engine_with_credential(config, credential)
}

pub fn build_engine_with_credential(
    config: &EngineConfig,
    credential: String,
) -> Result<Arc<dyn ReasoningEngine>, CoreError> {
    info!(
        "building reasoning engine (provider={:?}, model={})",
        config.provider, config.model
    );
    let timeout = Duration::from_secs(config.timeout_secs);
    match config.provider {
        EngineProvider::Gemini => Ok(Arc::new(GeminiEngine::new(GeminiEngineConfig {
            model: config.model.clone(),
            auth: GeminiAuth::ApiKey(credential),
            endpoint: config.endpoint.clone(),
            timeout,
            temperature: config.temperature,
        })?)),
        EngineProvider::Vertex => {
            let (Some(project), Some(location)) = (&config.project, &config.location) else {
                return Err(CoreError::Config(
                    "vertex provider requires engine.project and engine.location".to_string(),
                ));
            };
            Ok(Arc::new(GeminiEngine::new(GeminiEngineConfig {
                model: config.model.clone(),
                auth: GeminiAuth::Vertex {
                    project: project.clone(),
                    location: location.clone(),
                    access_token: credential,
                },
                endpoint: config.endpoint.clone(),
                timeout,
                temperature: config.temperature,
            })?))
        }
        EngineProvider::Openai => {
            let mut builder = LLMBuilder::<OpenAI>::new()
                .api_key(credential)
                .model(config.model.clone());
            if let Some(temperature) = config.temperature {
                builder = builder.temperature(temperature);
            }
            let llm: Arc<dyn LLMProvider> = builder
                .build()
                .map_err(|err| CoreError::Provider(err.to_string()))?;
            Ok(Arc::new(LlmProviderEngine::new(llm)))
        }
    }
}
