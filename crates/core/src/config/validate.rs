use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Brickset API key is set
/// - Username and password are either both set or both absent
/// - Page size is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.brickset.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "brickset.api_key cannot be empty".to_string(),
        ));
    }

    let has_username = config
        .brickset
        .username
        .as_ref()
        .is_some_and(|u| !u.is_empty());
    let has_password = config
        .brickset
        .password
        .as_ref()
        .is_some_and(|p| !p.is_empty());
    if has_username != has_password {
        return Err(ConfigError::ValidationError(
            "brickset.username and brickset.password must be set together".to_string(),
        ));
    }

    if config.ingest.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "ingest.page_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BricksetConfig, DatabaseConfig, IngestConfig};

    fn valid_config() -> Config {
        Config {
            brickset: BricksetConfig {
                api_key: "key".to_string(),
                ..Default::default()
            },
            database: DatabaseConfig::default(),
            ingest: IngestConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_with_credentials() {
        let mut config = valid_config();
        config.brickset.username = Some("builder".to_string());
        config.brickset.password = Some("hunter2".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let mut config = valid_config();
        config.brickset.api_key = "  ".to_string();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_username_without_password_fails() {
        let mut config = valid_config();
        config.brickset.username = Some("builder".to_string());
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_page_size_zero_fails() {
        let mut config = valid_config();
        config.ingest.page_size = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
