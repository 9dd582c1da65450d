//! Tests for layered configuration loading.

use super::*;
use crate::{StoreBackend, StoreConfig};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options isolated from the host's system and user layers.
fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    let mut options = LayeredConfigOptions::new(cwd);
    options.system_config_path = None;
    options.user_config_path = None;
    options
}

/// Verify that a minimal config parses with defaults.
#[test]
fn parse_minimal_config() {
    let config = CrmConfig::load_from_str("{}").expect("config");
    assert_eq!(config.store.backend, StoreBackend::Sqlite);
    assert_eq!(config.store.table, "Pharma_CRM_Database");
    assert_eq!(config.store.recent_limit, 5);
    assert_eq!(config.engine.provider, EngineProvider::Gemini);
    assert_eq!(config.engine.model, "gemini-2.0-flash-lite-001");
    assert_eq!(config.engine.credential_env(), "GEMINI_API_KEY");
    assert_eq!(config.rep.id, "REP_048");
}

/// Reject unexpected top-level config keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = CrmConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown key"));
    assert!(msg.contains("unexpected"));
}

/// Reject invalid nested values with their path.
#[test]
fn rejects_invalid_store_backend() {
    let err = CrmConfig::load_from_str(r#"{ store: { backend: "postgres" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("store.backend"));
}

/// Vertex needs a project and a location.
#[test]
fn vertex_requires_project_and_location() {
    let err = CrmConfig::load_from_str(r#"{ engine: { provider: "vertex" } }"#).unwrap_err();
    assert!(format!("{err}").contains("engine.project"));

    let config = CrmConfig::load_from_str(
        r#"{ engine: { provider: "vertex", project: "p", location: "us-central1" } }"#,
    )
    .expect("config");
    assert_eq!(config.engine.credential_env(), "VERTEX_ACCESS_TOKEN");
}

/// Table names end up in SQL, so only identifier characters pass.
#[test]
fn rejects_unsafe_table_name() {
    let err = CrmConfig::load_from_str(r#"{ store: { table: "crm; drop" } }"#).unwrap_err();
    assert!(format!("{err}").contains("store.table"));
}

/// Default store paths depend on the backend.
#[test]
fn store_path_defaults_per_backend() {
    let mut store = StoreConfig::default();
    assert_eq!(store.resolved_path(), ".fieldcrm/crm.sqlite3");
    store.backend = StoreBackend::Jsonl;
    assert_eq!(store.resolved_path(), ".fieldcrm/crm.jsonl");
    store.path = Some("/tmp/calls.jsonl".to_string());
    assert_eq!(store.resolved_path(), "/tmp/calls.jsonl");
}

/// Ensure repo config takes precedence over cwd config, and cwd over user.
#[test]
fn layered_config_prefers_repo_over_cwd_over_user() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    let user_config = root.join("user.json5");
    write_json5(
        &user_config,
        "{ rep: { name: \"user\", territory: \"West\" }, store: { recent_limit: 9 } }",
    );
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        "{ rep: { name: \"project\" } }",
    );
    write_json5(&cwd.join(DEFAULT_CONFIG_FILE), "{ rep: { name: \"cwd\" } }");
    write_json5(
        &project_root
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE),
        "{ store: { recent_limit: 3 } }",
    );

    let mut options = isolated_options(&cwd);
    options.user_config_path = Some(user_config);
    let layered = CrmConfig::load_layered_with_options(options).expect("layered");

    assert_eq!(layered.config.rep.name, "cwd");
    assert_eq!(layered.config.rep.territory, "West");
    assert_eq!(layered.config.store.recent_limit, 3);
    let sources = layered
        .layers
        .iter()
        .map(|layer| layer.source)
        .collect::<Vec<_>>();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
            ConfigLayerSource::Repo,
        ]
    );
}

/// Runtime overrides apply last.
#[test]
fn runtime_layer_overrides_local_layers() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("work");
    fs::create_dir_all(&cwd).expect("cwd");
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        "{ engine: { model: \"local-model\" } }",
    );
    let runtime = temp.path().join("override.json5");
    write_json5(&runtime, "{ engine: { model: \"runtime-model\", timeout_secs: 5 } }");

    let options = isolated_options(&cwd).with_runtime_path(&runtime);
    let layered = CrmConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.engine.model, "runtime-model");
    assert_eq!(layered.config.engine.timeout_secs, 5);
    assert_eq!(layered.layers.len(), 2);
}

/// A layer that fails schema validation names its origin.
#[test]
fn invalid_layer_reports_its_label() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().to_path_buf();
    write_json5(&cwd.join(DEFAULT_CONFIG_FILE), "{ rep: { id: 48 } }");
    let err = CrmConfig::load_layered_with_options(isolated_options(&cwd)).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("rep.id"));
}

/// Missing runtime override paths are an error, unlike optional layers.
#[test]
fn missing_runtime_layer_fails() {
    let temp = TempDir::new().expect("tmp");
    let options =
        isolated_options(temp.path()).with_runtime_path(temp.path().join("missing.json5"));
    let err = CrmConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}
