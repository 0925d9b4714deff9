//! Gateway configuration loading: defaults, optional JSON file, CLI/env overrides.

use std::fs;
use std::path::Path;
use validator::Validate;
use wellspring_types::{ConfigError, GatewayConfig};

/// Load the gateway configuration.
///
/// Without a path the defaults are used. A path that does not exist is an error, since
/// it was asked for explicitly.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(GatewayConfig::default());
    };
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.display().to_string() });
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError { message: format!("read failed: {}", e) })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

/// Apply CLI/env overrides, then validate.
pub fn finalize(
    mut config: GatewayConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<GatewayConfig, ConfigError> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    validate(&config)?;
    Ok(config)
}

fn validate(config: &GatewayConfig) -> Result<(), ConfigError> {
    config.validate().map_err(|e| ConfigError::from_validation_errors(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = write_config(r#"{"port": 9100, "models": {"fast": "m-fast", "standard": "m-std",
            "deep": "m-deep", "image": "m-img", "video": "m-vid", "audio": "m-tts"}}"#);
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.models.deep, "m-deep");
        assert_eq!(config.default_voice, "Kore");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let file = write_config("{ port: nope");
        assert!(matches!(load_config(Some(file.path())), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_overrides_then_validation() {
        let config = finalize(GatewayConfig::default(), Some("0.0.0.0".into()), Some(9000)).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");

        let err = finalize(GatewayConfig::default(), None, Some(80)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "port"));
    }

    #[test]
    fn test_bad_provider_url_rejected() {
        let file = write_config(r#"{"provider_base_url": "not a url"}"#);
        let config = load_config(Some(file.path())).unwrap();
        let err = finalize(config, None, None).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { ref field, .. } if field == "provider_base_url")
        );
    }

    #[test]
    fn test_parse_error_names_position() {
        let file = write_config("{\"port\": }");
        match load_config(Some(file.path())) {
            Err(ConfigError::ParseError { message }) => assert!(message.contains("line 1")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
