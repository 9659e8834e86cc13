use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads and parses a configuration file without validating it
///
/// Callers that layer command-line overrides on top of the file use this and
/// run [`validate`] once the final values are in place.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use bbs_archive::config::load_config;
///
/// let config = load_config(Path::new("archive.toml")).unwrap();
/// println!("Batch size: {}", config.max_concurrent);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so an archive can be traced back to the settings that
/// produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Serializer;
    use crate::record::RecordKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
base-url = "https://www.youbbs.org"
output-dir = "./backup"
serializer = "markdown"
kinds = ["user", "article"]
start-id = 10
max-id = 500
max-concurrent = 8

[http]
timeout-secs = 12
cookie = "SAESESSIONID=abc"

[extract]
utc-offset = "+09:00"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.base_url, "https://www.youbbs.org");
        assert_eq!(config.serializer, Serializer::Markdown);
        assert_eq!(config.kinds, vec![RecordKind::User, RecordKind::Article]);
        assert_eq!(config.start_id, 10);
        assert_eq!(config.max_id, Some(500));
        assert_eq!(config.max_concurrent, 8);
        assert_eq!(config.http.timeout_secs, 12);
        assert_eq!(config.http.cookie.as_deref(), Some("SAESESSIONID=abc"));
        assert_eq!(config.extract.utc_offset, "+09:00");
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config_content = r#"
base-url = "https://www.youbbs.org"
output-dir = "./backup"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.serializer, Serializer::Json);
        assert_eq!(config.kinds.len(), 3);
        assert_eq!(config.max_id, None);
        assert_eq!(config.max_concurrent, 20);
    }

    #[test]
    fn test_structured_text_alias() {
        let config_content = r#"
base-url = "https://www.youbbs.org"
output-dir = "./backup"
serializer = "structured-text"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.serializer, Serializer::Yaml);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/archive.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_unknown_kind() {
        let config_content = r#"
base-url = "https://www.youbbs.org"
output-dir = "./backup"
kinds = ["article", "topic"]
"#;
        let file = create_temp_config(config_content);
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
base-url = "https://www.youbbs.org"
output-dir = "./backup"
max-concurrent = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_read_config_skips_validation() {
        let config_content = r#"
base-url = "https://www.youbbs.org"
output-dir = "./backup"
max-concurrent = 0
"#;

        let file = create_temp_config(config_content);
        let config = read_config(file.path()).unwrap();
        assert_eq!(config.max_concurrent, 0);
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
