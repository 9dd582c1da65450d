//! Configuration schema for fieldcrm.

use serde::{Deserialize, Serialize};

/// Root config for the call intake agent.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CrmConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub rep: RepProfile,
}

impl CrmConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> CrmConfigBuilder {
        CrmConfigBuilder::new()
    }
}

/// Builder for assembling a `CrmConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct CrmConfigBuilder {
    config: CrmConfig,
}

impl CrmConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: CrmConfig::default(),
        }
    }

    /// Replace the record store configuration.
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Replace the reasoning engine configuration.
    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.config.engine = engine;
        self
    }

    /// Replace the representative profile.
    pub fn rep(mut self, rep: RepProfile) -> Self {
        self.config.rep = rep;
        self
    }

    /// Finalize and return the built `CrmConfig`.
    pub fn build(self) -> CrmConfig {
        self.config
    }
}

/// Table backend used for call records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Jsonl,
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Location of the table file; defaults per backend.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    /// Rows shown by advisory "recent records" reads.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
            table: default_table(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl StoreConfig {
    /// Configured path, or the backend's default location.
    pub fn resolved_path(&self) -> String {
        if let Some(path) = &self.path {
            return path.clone();
        }
        match self.backend {
            StoreBackend::Sqlite => ".fieldcrm/crm.sqlite3".to_string(),
            StoreBackend::Jsonl => ".fieldcrm/crm.jsonl".to_string(),
        }
    }
}

fn default_table() -> String {
    "Pharma_CRM_Database".to_string()
}

fn default_recent_limit() -> usize {
    5
}

/// Hosted model provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineProvider {
    /// Gemini API with an API key.
    #[default]
    Gemini,
    /// Vertex AI with a bearer token, scoped to a project and location.
    Vertex,
    /// OpenAI chat completions through the generic LLM provider bridge.
    Openai,
}

/// Reasoning engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub provider: EngineProvider,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Override for the provider base URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Environment variable holding the credential; defaults per provider.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider: EngineProvider::default(),
            model: default_model(),
            project: None,
            location: None,
            endpoint: None,
            api_key_env: None,
            timeout_secs: default_timeout_secs(),
            temperature: None,
        }
    }
}

impl EngineConfig {
    /// Credential variable name, falling back to the provider default.
    pub fn credential_env(&self) -> &str {
        if let Some(name) = self.api_key_env.as_deref() {
            return name;
        }
        match self.provider {
            EngineProvider::Gemini => "GEMINI_API_KEY",
            EngineProvider::Vertex => "VERTEX_ACCESS_TOKEN",
            EngineProvider::Openai => "OPENAI_API_KEY",
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash-lite-001".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Field representative using this installation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepProfile {
    #[serde(default = "default_rep_name")]
    pub name: String,
    #[serde(default = "default_rep_id")]
    pub id: String,
    #[serde(default = "default_territory")]
    pub territory: String,
}

impl Default for RepProfile {
    fn default() -> Self {
        Self {
            name: default_rep_name(),
            id: default_rep_id(),
            territory: default_territory(),
        }
    }
}

fn default_rep_name() -> String {
    "Sarah Jenkins".to_string()
}

fn default_rep_id() -> String {
    "REP_048".to_string()
}

fn default_territory() -> String {
    "Northeast - Oncology".to_string()
}
