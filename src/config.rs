//! Configuration module for brickmap.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`brickmap.yaml`)
//! - Environment variables (via `${VAR}` expansion)
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # brickmap.yaml
//!
//! # Scanning options
//! scan:
//!   exclude_patterns:
//!     - "**/.terraform/**"
//!   continue_on_error: true
//!   max_depth: 100
//!
//! # Output options
//! output:
//!   dir: parsed_output
//!   pretty: true
//!   colored: true
//! ```

use crate::error::{BrickmapError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Scanning options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Patterns to exclude from scanning (glob patterns).
    pub exclude_patterns: Vec<String>,

    /// Continue scanning even if some files fail to parse.
    pub continue_on_error: bool,

    /// Maximum depth for recursive directory scanning.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude_patterns: vec!["**/.terraform/**".to_string()],
            continue_on_error: false,
            max_depth: default_max_depth(),
        }
    }
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory the per-file artifacts are written into.
    pub dir: PathBuf,

    /// Pretty-print the JSON summary (4-space indentation).
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Use colored terminal output.
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("parsed_output"),
            pretty: true,
            colored: true,
        }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scanning options
    pub scan: ScanOptions,

    /// Output options
    pub output: OutputOptions,
}

fn default_max_depth() -> usize {
    100
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        // First, expand environment variables
        let expanded = expand_env_vars(content);

        let config: Config =
            serde_yaml::from_str(&expanded).map_err(|e| crate::err!(ConfigParse {
                message: e.to_string(),
                source: None,
            }))?;

        tracing::debug!(
            exclude_patterns = config.scan.exclude_patterns.len(),
            continue_on_error = config.scan.continue_on_error,
            "Configuration loaded successfully"
        );

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for invalid values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigValue` error for out-of-range or unusable values.
    pub fn validate(&self) -> Result<()> {
        if self.scan.max_depth == 0 {
            return Err(crate::err!(ConfigValue {
                key: "scan.max_depth".to_string(),
                message: "must be at least 1".to_string(),
            }));
        }
        for pattern in &self.scan.exclude_patterns {
            glob::Pattern::new(pattern).map_err(|e| {
                BrickmapError::ConfigValue {
                    key: "scan.exclude_patterns".to_string(),
                    message: format!("invalid glob pattern '{pattern}': {e}"),
                    src_path: file!(),
                    src_line: line!(),
                }
            })?;
        }
        Ok(())
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# Brickmap Configuration File
# https://github.com/brickmap/brickmap

# Scanning options
scan:
  # Patterns to exclude from scanning (glob patterns)
  exclude_patterns:
    - "**/.terraform/**"

  # Continue scanning even if some files fail to parse
  continue_on_error: false

  # Maximum depth for recursive directory scanning
  max_depth: 100

# Output options
output:
  # Directory the per-file artifacts are written into
  dir: parsed_output

  # Pretty-print the JSON summary (4-space indentation)
  pretty: true

  # Use colored output in terminal
  colored: true
"#
        .to_string()
    }
}

/// Expand `${VAR}` references against the process environment.
///
/// Unset variables expand to an empty string, matching shell behavior.
fn expand_env_vars(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        match rest[start + 2..].find('}') {
            Some(end) => {
                let name = &rest[start + 2..start + 2 + end];
                result.push_str(&std::env::var(name).unwrap_or_default());
                rest = &rest[start + 2 + end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.scan.continue_on_error);
        assert_eq!(config.scan.max_depth, 100);
        assert_eq!(config.output.dir, PathBuf::from("parsed_output"));
        assert!(config.output.pretty);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
scan:
  exclude_patterns:
    - "**/vendor/**"
  continue_on_error: true
output:
  dir: out
  pretty: false
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.scan.continue_on_error);
        assert!(config
            .scan
            .exclude_patterns
            .contains(&"**/vendor/**".to_string()));
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_example_yaml_round_trips() {
        let config = Config::from_yaml(&Config::example_yaml()).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("parsed_output"));
    }

    #[test]
    fn test_invalid_max_depth_rejected() {
        let result = Config::from_yaml("scan:\n  max_depth: 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("BRICKMAP_TEST_DIR", "expanded");
        let expanded = expand_env_vars("output:\n  dir: ${BRICKMAP_TEST_DIR}\n");
        assert!(expanded.contains("dir: expanded"));
    }

    #[test]
    fn test_unset_env_var_expands_empty() {
        let expanded = expand_env_vars("value: ${BRICKMAP_DEFINITELY_UNSET_VAR}!");
        assert_eq!(expanded, "value: !");
    }
}
