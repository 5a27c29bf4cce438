use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Auth section exists (enforced by serde)
/// - Server port is not 0
/// - cat_api.api_key is non-empty when the section is present
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // An empty key would fail every upstream request anyway; catch it at startup
    if let Some(ref cat_api) = config.cat_api {
        if cat_api.api_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "cat_api.api_key cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
