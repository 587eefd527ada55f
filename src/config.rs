//! Configuration loading for cvtex.
//! Reads the CV description (YAML or JSON) into a generic value tree and
//! checks the little structure the rest of the pipeline depends on.

use crate::constants::{PUBLICATIONS_SECTION, SECTIONS_KEY, SECTION_TYPE_KEY};
use crate::error::{Error, Result};
use log::debug;
use serde_json::Value;
use std::path::Path;

/// Loads the configuration document at `path`.
///
/// # Returns
/// * `Result<Value>` - Parsed configuration, mapping key order preserved
///
/// # Errors
/// * `Error::ConfigError` if the file cannot be read, does not parse,
///   or has no valid `sections` list
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("cannot read '{}': {}", path.display(), e))
    })?;
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config = parse_config(&content, is_json)?;
    validate_sections(&config)?;
    Ok(config)
}

/// Parses raw configuration content.
///
/// JSON is tried first, then YAML unless `json_only` is set.
pub fn parse_config(content: &str, json_only: bool) -> Result<Value> {
    match serde_json::from_str::<Value>(content) {
        Ok(value) => Ok(value),
        Err(e) if json_only => {
            Err(Error::ConfigError(format!("Invalid configuration format: {e}")))
        }
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Returns the `sections` list, checking every section carries a string `type`.
fn validate_sections(config: &Value) -> Result<&Vec<Value>> {
    let root = config
        .as_object()
        .ok_or_else(|| Error::ConfigError("top level must be a mapping".to_string()))?;
    let sections = root
        .get(SECTIONS_KEY)
        .ok_or_else(|| Error::ConfigError(format!("missing '{SECTIONS_KEY}' list")))?
        .as_array()
        .ok_or_else(|| Error::ConfigError(format!("'{SECTIONS_KEY}' must be a list")))?;

    for (index, section) in sections.iter().enumerate() {
        let has_type = section
            .get(SECTION_TYPE_KEY)
            .is_some_and(|section_type| section_type.is_string());
        if !has_type {
            return Err(Error::ConfigError(format!(
                "section #{} has no '{SECTION_TYPE_KEY}' field",
                index + 1
            )));
        }
    }

    Ok(sections)
}

/// Whether any section is of type `publications`.
pub fn has_publications_section(config: &Value) -> Result<bool> {
    let sections = validate_sections(config)?;
    Ok(sections.iter().any(|section| {
        section.get(SECTION_TYPE_KEY).and_then(Value::as_str) == Some(PUBLICATIONS_SECTION)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_yaml() {
        let config = parse_config("name: Ada\nsections:\n  - type: summary\n", false).unwrap();
        assert_eq!(config["name"], "Ada");
        assert_eq!(config["sections"][0]["type"], "summary");
    }

    #[test]
    fn test_parse_json_only_rejects_yaml() {
        assert!(parse_config("name: Ada", true).is_err());
        assert!(parse_config(r#"{"name": "Ada"}"#, true).is_ok());
    }

    #[test]
    fn test_parse_keeps_key_order() {
        let config = parse_config("zeta: 1\nalpha: 2\nmid: 3\n", false).unwrap();
        let keys: Vec<_> = config.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_publications_detection() {
        let config = json!({"sections": [{"type": "summary"}, {"type": "publications"}]});
        assert!(has_publications_section(&config).unwrap());

        let config = json!({"sections": [{"type": "summary"}]});
        assert!(!has_publications_section(&config).unwrap());
    }

    #[test]
    fn test_sections_required() {
        assert!(matches!(
            has_publications_section(&json!({"name": "Ada"})),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            has_publications_section(&json!({"sections": {"type": "summary"}})),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_section_without_type() {
        let config = json!({"sections": [{"type": "summary"}, {"title": "Loose"}]});
        let err = has_publications_section(&config).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: section #2 has no 'type' field.");
    }
}
