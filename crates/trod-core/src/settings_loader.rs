//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `TROD_DEBUG` | `debug` |
//! | `TROD_LOG_LEVEL` | `log_level` |
//! | `TROD_DEFAULT_CHARSET` | `default_charset` (empty string clears it) |
//! | `TROD_DEFAULT_ID_COLUMN` | `default_id.column` |
//! | `TROD_DEFAULT_ID_COMMENT` | `default_id.comment` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use trod_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/trod.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::TrodError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys absent from the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, TrodError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| TrodError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_into_defaults(toml_to_json(toml_value)).map_err(|e| {
        TrodError::ConfigurationError(format!("Failed to deserialize settings from TOML: {e}"))
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, TrodError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        TrodError::ConfigurationError(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, TrodError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, TrodError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| TrodError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_into_defaults(json_value).map_err(|e| {
        TrodError::ConfigurationError(format!("Failed to deserialize settings from JSON: {e}"))
    })
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, TrodError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        TrodError::ConfigurationError(format!(
            "Failed to read JSON file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `TROD_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |key| std::env::var(key).ok());
}

/// Applies overrides using an arbitrary variable lookup.
fn apply_overrides_from(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("TROD_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("TROD_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("TROD_DEFAULT_CHARSET") {
        let val = val.trim().to_string();
        settings.default_charset = if val.is_empty() { None } else { Some(val) };
    }

    if let Some(val) = lookup("TROD_DEFAULT_ID_COLUMN") {
        settings.default_id.column = val;
    }

    if let Some(val) = lookup("TROD_DEFAULT_ID_COMMENT") {
        settings.default_id.comment = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn merge_into_defaults(value: serde_json::Value) -> Result<Settings, serde_json::Error> {
    let default_json = serde_json::to_value(Settings::default())?;
    serde_json::from_value(merge_json(default_json, value))
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "trod_db=debug"
            default_charset = "utf8mb4"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "trod_db=debug");
        assert_eq!(settings.default_charset.as_deref(), Some("utf8mb4"));
        // Defaults preserved
        assert_eq!(settings.default_id.column, "id");
    }

    #[test]
    fn test_from_toml_str_default_id_table() {
        let toml = r#"
            [default_id]
            comment = "primary key"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.default_id.comment, "primary key");
        assert_eq!(settings.default_id.column, "id");
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(TrodError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"sometimes\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("trod-settings-{}.toml", std::process::id()));
        std::fs::write(&path, "log_level = \"warn\"\n").unwrap();
        let settings = from_toml_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/definitely/not/here/trod.toml");
        match result {
            Err(TrodError::ConfigurationError(msg)) => assert!(msg.contains("trod.toml")),
            other => panic!("Expected ConfigurationError, got {other:?}"),
        }
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "debug": false,
            "default_id": { "column": "pk" }
        }"#;

        let settings = from_json_str(json).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.default_id.column, "pk");
        assert_eq!(settings.default_id.comment, "主键");
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_json_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("trod-settings-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"default_charset": "utf8mb4"}"#).unwrap();
        let settings = from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(settings.default_charset.as_deref(), Some("utf8mb4"));
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_json_file_missing() {
        match from_json_file("/definitely/not/here/trod.json") {
            Err(TrodError::ConfigurationError(msg)) => assert!(msg.contains("trod.json")),
            other => panic!("Expected ConfigurationError, got {other:?}"),
        }
    }

    // ── Environment overrides ───────────────────────────────────────

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("TROD_DEBUG", "no"),
            ("TROD_LOG_LEVEL", "debug"),
            ("TROD_DEFAULT_CHARSET", "latin1"),
            ("TROD_DEFAULT_ID_COLUMN", "uid"),
            ("TROD_DEFAULT_ID_COMMENT", "row id"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        apply_overrides_from(&mut settings, |k| vars.get(k).map(ToString::to_string));
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.default_charset.as_deref(), Some("latin1"));
        assert_eq!(settings.default_id.column, "uid");
        assert_eq!(settings.default_id.comment, "row id");
    }

    #[test]
    fn test_overrides_empty_charset_clears() {
        let mut settings = Settings {
            default_charset: Some("utf8".to_string()),
            ..Settings::default()
        };
        apply_overrides_from(&mut settings, |k| {
            (k == "TROD_DEFAULT_CHARSET").then(String::new)
        });
        assert!(settings.default_charset.is_none());
    }

    // The only test that touches the process environment.
    #[test]
    fn test_process_env_overrides() {
        std::env::set_var("TROD_LOG_LEVEL", "trod_db=trace");
        std::env::set_var("TROD_DEFAULT_ID_COLUMN", "env_id");

        let from_env_only = from_env();
        let mut loaded = from_toml_str("debug = false").unwrap();
        apply_env_overrides(&mut loaded);

        std::env::remove_var("TROD_LOG_LEVEL");
        std::env::remove_var("TROD_DEFAULT_ID_COLUMN");

        assert_eq!(from_env_only.log_level, "trod_db=trace");
        assert_eq!(from_env_only.default_id.column, "env_id");
        assert!(from_env_only.debug);

        assert!(!loaded.debug);
        assert_eq!(loaded.log_level, "trod_db=trace");
        assert_eq!(loaded.default_id.column, "env_id");
        assert_eq!(loaded.default_id.comment, "主键");
    }

    #[test]
    fn test_overrides_absent_keep_values() {
        let mut settings = Settings::default();
        apply_overrides_from(&mut settings, |_| None);
        assert_eq!(settings, Settings::default());
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"a": {"b": 1, "c": 2}});
        let over = serde_json::json!({"a": {"c": 3}});
        let merged = merge_json(base, over);
        assert_eq!(merged, serde_json::json!({"a": {"b": 1, "c": 3}}));
    }
}
