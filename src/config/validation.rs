use crate::config::types::{ClientConfig, Config, EnrichmentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_client_config(&config.client)?;
    validate_enrichment_config(&config.enrichment)?;
    Ok(())
}

/// Validates HTTP transport configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if let Some(proxy) = &config.proxy {
        validate_http_url("proxy", proxy)?;
    }

    if config.user_agents.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user-agents cannot contain empty strings".to_string(),
        ));
    }

    Ok(())
}

/// Validates enrichment fan-out configuration
fn validate_enrichment_config(config: &EnrichmentConfig) -> Result<(), ConfigError> {
    if config.max_connections < 1 || config.max_connections > 1000 {
        return Err(ConfigError::Validation(format!(
            "max-connections must be between 1 and 1000, got {}",
            config.max_connections
        )));
    }

    if let Some(keepalive) = config.max_keepalive_connections {
        if keepalive > config.max_connections {
            return Err(ConfigError::Validation(format!(
                "max-keepalive-connections ({}) cannot exceed max-connections ({})",
                keepalive, config.max_connections
            )));
        }
    }

    Ok(())
}

/// Checks that a configured URL parses and uses http or https
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
