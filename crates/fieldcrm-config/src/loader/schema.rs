//! Schema validation helpers for fieldcrm JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "store", "engine", "rep"], layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("store") {
        validate_store(value, layer, "store")?;
    }
    if let Some(value) = map.get("engine") {
        validate_engine(value, layer, "engine")?;
    }
    if let Some(value) = map.get("rep") {
        validate_rep(value, layer, "rep")?;
    }
    Ok(())
}

/// Validate the "store" block.
fn validate_store(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["backend", "path", "table", "recent_limit"],
        layer,
        path,
    )?;
    if let Some(value) = map.get("backend") {
        expect_one_of(
            value,
            &["sqlite", "jsonl"],
            layer,
            &join_path(path, "backend"),
            "invalid store backend",
        )?;
    }
    if let Some(value) = map.get("path") {
        expect_string(value, layer, &join_path(path, "path"))?;
    }
    if let Some(value) = map.get("table") {
        expect_string(value, layer, &join_path(path, "table"))?;
    }
    if let Some(value) = map.get("recent_limit") {
        expect_u64(value, layer, &join_path(path, "recent_limit"))?;
    }
    Ok(())
}

/// Validate the "engine" block.
fn validate_engine(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "provider",
            "model",
            "project",
            "location",
            "endpoint",
            "api_key_env",
            "timeout_secs",
            "temperature",
        ],
        layer,
        path,
    )?;
    if let Some(value) = map.get("provider") {
        expect_one_of(
            value,
            &["gemini", "vertex", "openai"],
            layer,
            &join_path(path, "provider"),
            "invalid engine provider",
        )?;
    }
    for key in ["model", "project", "location", "endpoint", "api_key_env"] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("timeout_secs") {
        expect_u64(value, layer, &join_path(path, "timeout_secs"))?;
    }
    if let Some(value) = map.get("temperature") {
        expect_f64(value, layer, &join_path(path, "temperature"))?;
    }
    Ok(())
}

/// Validate the "rep" block.
fn validate_rep(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["name", "id", "territory"], layer, path)?;
    for (key, value) in map {
        expect_string(value, layer, &join_path(path, key))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON u64 or return a typed error.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Expect a JSON number or return a typed error.
fn expect_f64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected number"))
    }
}

/// Expect a string drawn from a fixed set.
fn expect_one_of(
    value: &Value,
    allowed: &[&str],
    layer: &str,
    path: &str,
    message: &str,
) -> Result<(), ConfigError> {
    let Some(raw) = value.as_str() else {
        return Err(invalid_field(layer, path, "expected string"));
    };
    if allowed.contains(&raw) {
        Ok(())
    } else {
        Err(invalid_field(layer, path, message))
    }
}

/// Reject keys outside the allowed set.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
