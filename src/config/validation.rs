use std::collections::HashSet;

use url::Url;

use crate::config::types::{Config, ExtractConfig, HttpConfig};
use crate::ConfigError;

/// Upper bound on pipelines per batch
const MAX_CONCURRENT_LIMIT: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_base_url(&config.base_url)?;
    validate_output_dir(config)?;
    validate_id_range(config)?;
    validate_kinds(config)?;
    validate_http_config(&config.http)?;
    validate_extract_config(&config.extract)?;
    Ok(())
}

/// Validates the forum base address
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    if base_url.trim().is_empty() {
        return Err(ConfigError::Validation("base_url cannot be empty".to_string()));
    }

    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            base_url
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' cannot carry a query or fragment",
            base_url
        )));
    }

    Ok(())
}

fn validate_output_dir(config: &Config) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates the ID range and batch size
fn validate_id_range(config: &Config) -> Result<(), ConfigError> {
    if config.start_id < 1 {
        return Err(ConfigError::Validation(format!(
            "start_id must be >= 1, got {}",
            config.start_id
        )));
    }

    if let Some(max_id) = config.max_id {
        if max_id < 1 {
            return Err(ConfigError::Validation(format!(
                "max_id must be >= 1, got {}",
                max_id
            )));
        }
    }

    if config.max_concurrent < 1 || config.max_concurrent > MAX_CONCURRENT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_concurrent must be between 1 and {}, got {}",
            MAX_CONCURRENT_LIMIT, config.max_concurrent
        )));
    }

    Ok(())
}

fn validate_kinds(config: &Config) -> Result<(), ConfigError> {
    if config.kinds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one record kind must be selected".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for kind in &config.kinds {
        if !seen.insert(kind) {
            return Err(ConfigError::Validation(format!(
                "record kind '{}' is listed more than once",
                kind
            )));
        }
    }

    Ok(())
}

fn validate_http_config(http: &HttpConfig) -> Result<(), ConfigError> {
    if http.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            http.timeout_secs
        )));
    }

    if http.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_extract_config(extract: &ExtractConfig) -> Result<(), ConfigError> {
    if extract.offset().is_none() {
        return Err(ConfigError::Validation(format!(
            "utc_offset must look like '+08:00', got '{}'",
            extract.utc_offset
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;

    fn valid_config() -> Config {
        Config::new("https://bbs.example.com", "./backup")
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("https://bbs.example.com").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
        assert!(validate_base_url("https://example.com/forum").is_ok());

        assert!(validate_base_url("").is_err());
        assert!(validate_base_url("not a url").is_err());
        assert!(validate_base_url("ftp://example.com").is_err());
        assert!(validate_base_url("https://example.com/?page=1").is_err());
    }

    #[test]
    fn test_zero_start_id_rejected() {
        let mut config = valid_config();
        config.start_id = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_max_id_rejected() {
        let mut config = valid_config();
        config.max_id = Some(0);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_start_after_max_is_allowed() {
        let mut config = valid_config();
        config.start_id = 10;
        config.max_id = Some(5);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_max_concurrent_bounds() {
        let mut config = valid_config();
        config.max_concurrent = 0;
        assert!(validate(&config).is_err());

        config.max_concurrent = MAX_CONCURRENT_LIMIT + 1;
        assert!(validate(&config).is_err());

        config.max_concurrent = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_kinds_validation() {
        let mut config = valid_config();
        config.kinds = vec![];
        assert!(validate(&config).is_err());

        config.kinds = vec![RecordKind::User, RecordKind::User];
        assert!(validate(&config).is_err());

        config.kinds = vec![RecordKind::Category];
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_bad_offset_rejected() {
        let mut config = valid_config();
        config.extract.utc_offset = "CST".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        config.http.timeout_secs = 0;
        assert!(validate(&config).is_err());
    }
}
