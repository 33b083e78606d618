//! Type checker configuration (lumen.toml)
//!
//! ```toml
//! [checker]
//! dynamic = false
//! max_errors = 200
//! warnings = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up by [`TypeckConfig::discover`]
pub const CONFIG_FILE: &str = "lumen.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeckConfig {
    /// Options for the checking pass
    #[serde(default)]
    pub checker: CheckerOptions,
}

/// Options for the checking pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerOptions {
    /// Treat every unit as if it were wrapped in a dynamic block
    pub dynamic: bool,

    /// Stop recording errors after this many; `None` records all of them
    pub max_errors: Option<usize>,

    /// Record warnings
    pub warnings: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            dynamic: false,
            max_errors: None,
            warnings: true,
        }
    }
}

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_errors must be at least 1")]
    ZeroErrorLimit,
}

impl TypeckConfig {
    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: TypeckConfig = toml::from_str(content)?;
        if config.checker.max_errors == Some(0) {
            return Err(ConfigError::ZeroErrorLimit);
        }
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load `lumen.toml` from `dir` or any of its ancestors, falling back to
    /// the defaults when no file exists
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let mut current = Some(dir);
        while let Some(d) = current {
            let candidate = d.join(CONFIG_FILE);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "loading checker configuration");
                return Self::load(&candidate);
            }
            current = d.parent();
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_when_table_missing() {
        let config = TypeckConfig::parse("").unwrap();
        assert_eq!(config, TypeckConfig::default());
        assert!(config.checker.warnings);
        assert!(!config.checker.dynamic);
    }

    #[test]
    fn test_parse_checker_options() {
        let config = TypeckConfig::parse(
            r#"
[checker]
dynamic = true
max_errors = 5
warnings = false
"#,
        )
        .unwrap();
        assert!(config.checker.dynamic);
        assert_eq!(config.checker.max_errors, Some(5));
        assert!(!config.checker.warnings);
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let config = TypeckConfig::parse("[checker]\nmax_errors = 3\n").unwrap();
        assert_eq!(config.checker.max_errors, Some(3));
        assert!(config.checker.warnings);
    }

    #[test]
    fn test_zero_error_limit_rejected() {
        let err = TypeckConfig::parse("[checker]\nmax_errors = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroErrorLimit));
    }

    #[test]
    fn test_invalid_toml() {
        let err = TypeckConfig::parse("[checker\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn test_load_and_discover() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src").join("app");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[checker]\ndynamic = true\n").unwrap();

        let loaded = TypeckConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert!(loaded.checker.dynamic);

        let discovered = TypeckConfig::discover(&nested).unwrap();
        assert_eq!(discovered, loaded);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TypeckConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
