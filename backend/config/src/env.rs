//! `${VAR}` substitution and `TGUP_*` overrides.
//!
//! Only uppercase `[A-Z_][A-Z0-9_]*` names are substituted; `$${VAR}`
//! escapes to a literal `${VAR}`.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::schema::{DuplicatesConfig, LoggingConfig, TgupConfig, TransferConfig};

/// Matches `${VAR}` with an optional leading `$` marking an escape.
static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid regex"));

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in every string leaf of `value`.
///
/// A referenced variable that is unset or empty is an error.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute env vars from a provided map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, v) in map {
                let child = if path.is_empty() { key.clone() } else { format!("{path}.{key}") };
                out.insert(key.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let replaced = ENV_REF.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name).filter(|v| !v.is_empty()) {
            Some(value) => value.clone(),
            None => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(replaced.into_owned())
}

/// Apply `TGUP_*` overrides from the process environment.
pub fn apply_env_overrides(config: TgupConfig) -> Result<TgupConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply `TGUP_*` overrides from a provided map.
pub fn apply_env_overrides_with(
    mut config: TgupConfig,
    env: &HashMap<String, String>,
) -> Result<TgupConfig> {
    let get = |key: &str| env.get(key).filter(|v| !v.trim().is_empty()).cloned();

    if let Some(root) = get("TGUP_DEST_ROOT") {
        config.transfer.get_or_insert_with(TransferConfig::default).dest_root = Some(root);
    }
    if let Some(dir) = get("TGUP_DOWNLOAD_DIR") {
        config.transfer.get_or_insert_with(TransferConfig::default).download_dir = Some(dir);
    }
    if let Some(raw) = get("TGUP_QUEUE_CAPACITY") {
        let capacity = raw
            .trim()
            .parse::<usize>()
            .with_context(|| format!("TGUP_QUEUE_CAPACITY must be a number, got '{raw}'"))?;
        config.transfer.get_or_insert_with(TransferConfig::default).queue_capacity = Some(capacity);
    }
    if let Some(path) = get("TGUP_KNOWN_IDS") {
        config.duplicates.get_or_insert_with(DuplicatesConfig::default).known_ids_path = Some(path);
    }
    if let Some(level) = get("TGUP_LOG_LEVEL") {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level);
    }
    Ok(config)
}
