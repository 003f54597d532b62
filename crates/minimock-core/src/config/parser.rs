//! Configuration file parsing (YAML/JSON).

use crate::config::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Config file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFileType {
    Yaml,
    Json,
    Unknown,
}

/// Get config file type from path extension
fn get_file_type(path: &str) -> ConfigFileType {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "yaml" | "yml" => ConfigFileType::Yaml,
        "json" => ConfigFileType::Json,
        _ => ConfigFileType::Unknown,
    }
}

/// Parse JSON content
fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(ConfigError::from)
}

/// Parse YAML content
fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(content).map_err(ConfigError::from)
}

/// Parse config content based on file type
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &str) -> Result<T, ConfigError> {
    match get_file_type(path) {
        ConfigFileType::Yaml => parse_yaml(content),
        ConfigFileType::Json => parse_json(content),
        ConfigFileType::Unknown => Err(ConfigError::UnknownFileType(path.to_string())),
    }
}

/// Read and parse a config file
pub fn load_config<T: DeserializeOwned>(path: &str) -> Result<T, ConfigError> {
    // Reject before touching the filesystem
    if get_file_type(path) == ConfigFileType::Unknown {
        return Err(ConfigError::UnknownFileType(path.to_string()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_config(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("controller.yaml", ConfigFileType::Yaml)]
    #[case("controller.YML", ConfigFileType::Yaml)]
    #[case("dir/controller.json", ConfigFileType::Json)]
    #[case("controller.jsonc", ConfigFileType::Unknown)]
    #[case("controller", ConfigFileType::Unknown)]
    fn test_get_file_type(#[case] path: &str, #[case] expected: ConfigFileType) {
        assert_eq!(get_file_type(path), expected);
    }

    #[rstest]
    fn test_parse_json_valid() {
        let value: serde_json::Value = parse_json(r#"{"wait_timeout_ms": 5}"#).unwrap();
        assert_eq!(value["wait_timeout_ms"], 5);
    }

    #[rstest]
    fn test_parse_yaml_invalid() {
        let result: Result<serde_json::Value, _> = parse_yaml("invalid: yaml: [");
        assert!(matches!(result.unwrap_err(), ConfigError::Yaml(_)));
    }

    #[rstest]
    #[case("controller.txt")]
    #[case("")]
    fn test_parse_config_unknown_file_type(#[case] path: &str) {
        let result: Result<serde_json::Value, _> = parse_config("{}", path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::UnknownFileType(_)
        ));
    }

    #[rstest]
    fn test_load_config_reads_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "name: controller").unwrap();
        let path = file.path().to_str().unwrap();

        let value: serde_json::Value = load_config(path).unwrap();
        assert_eq!(value["name"], "controller");
    }

    #[rstest]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let result: Result<serde_json::Value, _> = load_config(path.to_str().unwrap());
        assert!(matches!(result.unwrap_err(), ConfigError::Io { .. }));
    }
}
