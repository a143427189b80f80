//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read a TOML file without validating it.
///
/// Command-line overrides are applied on top before [`validate_config`] runs.
pub fn read_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_valid_file() {
        let file = write_file(
            r#"
            [listener]
            port = 7443

            [target]
            spec = "a:1,b:2"
            refresh_interval_secs = 30
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.port, 7443);
        assert_eq!(config.target.spec, "a:1,b:2");
        assert_eq!(config.target.refresh_interval_secs, 30);
    }

    #[test]
    fn rejects_semantically_invalid_file() {
        let file = write_file("[listener]\nport = 7443\n");
        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors, vec![ValidationError::EmptyTarget]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn reports_parse_and_io_errors() {
        let file = write_file("[listener\nport = ");
        assert!(matches!(read_config(file.path()), Err(ConfigError::Parse(_))));

        let missing = Path::new("/definitely/not/here/relay.toml");
        assert!(matches!(read_config(missing), Err(ConfigError::Io(_))));
    }
}
