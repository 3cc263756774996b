//! Generator configuration (nsg.toml)
//!
//! Optional file in the input project root:
//!
//! ```toml
//! [generate]
//! header-extensions = ["h", "hpp"]
//! source-extensions = ["cpp", "cc", "cxx"]
//! support-header = true
//! metadata-json = false
//! deny-collisions = false
//! exclude = ["third_party"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file name looked up in the input root
pub const CONFIG_FILE: &str = "nsg.toml";

/// Errors that can occur while reading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// The whole config file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// `[generate]` table
    #[serde(default)]
    pub generate: GenerateConfig,
}

/// Settings for `nsg generate`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GenerateConfig {
    /// Extensions scanned for annotations, without the dot
    #[serde(default = "default_header_extensions")]
    pub header_extensions: Vec<String>,

    /// Extensions copied with include rewriting
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,

    /// Write `ns.h` into the output root
    #[serde(default = "default_true")]
    pub support_header: bool,

    /// Write `scripts.metadata.json`
    #[serde(default)]
    pub metadata_json: bool,

    /// Fail when two exported symbols would collide
    #[serde(default)]
    pub deny_collisions: bool,

    /// Directory names skipped during the walk
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_header_extensions() -> Vec<String> {
    vec!["h".to_string(), "hpp".to_string()]
}

fn default_source_extensions() -> Vec<String> {
    vec!["cpp".to_string(), "cc".to_string(), "cxx".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            header_extensions: default_header_extensions(),
            source_extensions: default_source_extensions(),
            support_header: true,
            metadata_json: false,
            deny_collisions: false,
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Load from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse from a string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `nsg.toml` from `root` if it exists, defaults otherwise
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            log::info!("using {}", path.display());
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check extension lists
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generate = &self.generate;
        if generate.header_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "header-extensions must not be empty".to_string(),
            ));
        }
        for ext in generate.header_extensions.iter().chain(&generate.source_extensions) {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::ValidationError(format!(
                    "extension '{}' must be non-empty and without a leading dot",
                    ext
                )));
            }
        }
        if let Some(ext) = generate
            .header_extensions
            .iter()
            .find(|ext| generate.source_extensions.contains(ext))
        {
            return Err(ConfigError::ValidationError(format!(
                "extension '{}' is listed as both header and source",
                ext
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.generate.header_extensions, vec!["h", "hpp"]);
        assert_eq!(config.generate.source_extensions, vec!["cpp", "cc", "cxx"]);
        assert!(config.generate.support_header);
        assert!(!config.generate.metadata_json);
        assert!(!config.generate.deny_collisions);
    }

    #[test]
    fn test_parse_generate_table() {
        let config = Config::parse(
            r#"
[generate]
header-extensions = ["hh"]
support-header = false
metadata-json = true
deny-collisions = true
exclude = ["third_party", "build"]
"#,
        )
        .unwrap();
        assert_eq!(config.generate.header_extensions, vec!["hh"]);
        assert_eq!(config.generate.source_extensions, vec!["cpp", "cc", "cxx"]);
        assert!(!config.generate.support_header);
        assert!(config.generate.metadata_json);
        assert!(config.generate.deny_collisions);
        assert_eq!(config.generate.exclude, vec!["third_party", "build"]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = Config::parse("[generate]\nheaders = [\"h\"]\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            Config::parse("[generate]\nheader-extensions = []\n"),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            Config::parse("[generate]\nheader-extensions = [\".h\"]\n"),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            Config::parse("[generate]\nheader-extensions = [\"h\"]\nsource-extensions = [\"h\"]\n"),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover(dir.path()).unwrap(), Config::default());

        std::fs::write(dir.path().join(CONFIG_FILE), "[generate]\nmetadata-json = true\n").unwrap();
        assert!(Config::discover(dir.path()).unwrap().generate.metadata_json);
    }
}
