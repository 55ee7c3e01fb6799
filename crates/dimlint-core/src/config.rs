//! Configuration schema (dimlint.toml)

use serde::{Deserialize, Serialize};

/// Descriptor file looked up next to each SQL model
pub const DEFAULT_DESCRIPTOR_FILE: &str = "schema.yml";

/// Models analyzed when neither the CLI nor the config names any
pub const DEFAULT_MODELS: [&str; 5] = [
    "fct_sales",
    "dim_products",
    "dim_dates",
    "dim_geography",
    "stg_sales",
];

fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
}

fn default_descriptor_file() -> String {
    DEFAULT_DESCRIPTOR_FILE.to_string()
}

/// Allowlist rules for specific models or patterns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllowlistRules {
    /// Skip analysis for these models (glob patterns)
    #[serde(default)]
    pub skip_models: Vec<String>,
}

impl AllowlistRules {
    /// Check if a model matches any pattern in the list
    fn matches_pattern(model: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, model)
            } else {
                pattern == model
            }
        })
    }

    /// Check if a model should be skipped
    pub fn is_model_skipped(&self, model: &str) -> bool {
        Self::matches_pattern(model, &self.skip_models)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Model names to analyze
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// File name of the sibling descriptor (schema.yml)
    #[serde(default = "default_descriptor_file")]
    pub descriptor_file: String,

    /// Allowlist rules
    #[serde(default)]
    pub allowlist: AllowlistRules,

    /// Project root path (contains the `models` directory)
    #[serde(skip)]
    pub project_root: std::path::PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: default_models(),
            descriptor_file: default_descriptor_file(),
            allowlist: AllowlistRules::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        Ok(config)
    }

    /// Directory searched for SQL models
    pub fn models_dir(&self) -> std::path::PathBuf {
        self.project_root.join("models")
    }
}

/// Simple glob matching (supports a single *)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len()
            && text.starts_with(prefix)
            && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.descriptor_file, "schema.yml");
        assert_eq!(config.models.len(), 5);
        assert_eq!(config.models[0], "fct_sales");
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config = Config::from_toml("models = [\"dim_customers\"]").unwrap();
        assert_eq!(config.models, vec!["dim_customers".to_string()]);
        assert_eq!(config.descriptor_file, DEFAULT_DESCRIPTOR_FILE);
        assert!(config.allowlist.skip_models.is_empty());
    }

    #[test]
    fn allowlist_from_toml() {
        let config = Config::from_toml(
            r#"
descriptor_file = "models.yml"

[allowlist]
skip_models = ["stg_*"]
"#,
        )
        .unwrap();

        assert_eq!(config.descriptor_file, "models.yml");
        assert!(config.allowlist.is_model_skipped("stg_sales"));
        assert!(!config.allowlist.is_model_skipped("fct_sales"));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = Config::from_toml("models = [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn glob_matching() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("dim_*", "dim_dates"));
        assert!(glob_match("*_sales", "fct_sales"));
        assert!(!glob_match("dim_*", "fct_sales"));
        assert!(!glob_match("ab*ba", "aba"));
    }
}
