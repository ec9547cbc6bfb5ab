//! Error types for brickmap.
//!
//! This module defines the error hierarchy using `thiserror`. All errors
//! include context and can be propagated with the `?` operator.
//!
//! # Error Categories
//!
//! - **Parse errors**: HCL parsing failures, malformed pre-parsed trees
//! - **IO errors**: File system operations
//! - **State errors**: extractor queried before a tree was loaded
//! - **Config errors**: Invalid configuration files
//! - **Report errors**: artifact serialization failures
//!
//! Missing optional attributes, missing line metadata, dangling task
//! references and unmatched position lookups are *not* errors anywhere in
//! this crate; they degrade to absent values or skipped edges.

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(NoData {}));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::BrickmapError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for brickmap operations.
pub type Result<T> = std::result::Result<T, BrickmapError>;

/// The main error type for brickmap.
#[derive(Error, Debug)]
pub enum BrickmapError {
    // =========================================================================
    // I/O and File System Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// File not found.
    #[error("File not found: {path} ({src_path}:{src_line})")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Directory not found.
    #[error("Directory not found: {path} ({src_path}:{src_line})")]
    DirectoryNotFound {
        /// The missing directory path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Input Boundary Errors
    // =========================================================================
    /// HCL parsing error, wrapped with the offending file path.
    #[error("Failed to parse HCL in '{file}' \n\t({src_path}:{src_line}): {message}")]
    HclParse {
        /// The file being parsed
        file: PathBuf,
        /// Error message
        message: String,
        /// Line number (if available)
        line: Option<usize>,
        /// Column number (if available)
        column: Option<usize>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A pre-parsed tree does not have the expected shape.
    #[error("Malformed configuration tree ({src_path}:{src_line}): {message}")]
    TreeShape {
        /// Description of the shape violation
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // State Errors
    // =========================================================================
    /// Extractor queried before a tree was loaded.
    #[error("No data parsed yet ({src_path}:{src_line}): load a tree first")]
    NoData {
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}' ({src_path}:{src_line}): {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Artifact Errors
    // =========================================================================
    /// Artifact generation error.
    #[error("Failed to generate artifact ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Generic Errors
    // =========================================================================
    /// Internal error (should not happen in normal operation).
    #[error("Internal error ({src_path}:{src_line}): {message}")]
    Internal {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Multiple errors occurred.
    #[error("Multiple errors occurred ({count} total)")]
    Multiple {
        /// Number of errors
        count: usize,
        /// The individual errors
        errors: Vec<BrickmapError>,
    },
}

impl BrickmapError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
            src_path,
            src_line,
        }
    }

    /// Determines if the error is recoverable (e.g., a batch scan should
    /// continue with the remaining files).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::HclParse { .. }
                | Self::TreeShape { .. }
                | Self::ConfigParse { .. }
                | Self::ConfigValue { .. }
        )
    }

    /// Returns the appropriate exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => 13,
            Self::FileNotFound { .. } => 14,
            Self::DirectoryNotFound { .. } => 15,
            Self::ConfigParse { .. } => 18,
            Self::ConfigValue { .. } => 19,
            Self::Multiple { .. } => 21,
            _ => 1, // Generic unhandled error
        }
    }

    /// Consolidates multiple errors into a single `BrickmapError::Multiple` if there's more
    /// than one. Otherwise, returns the single error or `Ok(())` if no errors.
    pub fn collect(errors: Vec<Self>) -> Result<()> {
        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors
                .into_iter()
                .next()
                .expect("length checked above"))
        } else {
            Err(Self::Multiple {
                count: errors.len(),
                errors,
            })
        }
    }
}

impl From<std::io::Error> for BrickmapError {
    fn from(source: std::io::Error) -> Self {
        // This conversion is used when a PathBuf is not readily available.
        // For errors where a path is known, prefer BrickmapError::io(path, source, file!(), line!())
        Self::Io {
            path: PathBuf::new(),
            source,
            src_path: file!(),
            src_line: line!(),
        }
    }
}

impl From<serde_json::Error> for BrickmapError {
    fn from(source: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON serialization/deserialization error: {}", source),
            src_path: file!(),
            src_line: line!(),
        }
    }
}

/// A utility for collecting multiple errors during a batch scan.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<BrickmapError>,
}

impl ErrorCollector {
    /// Create a new error collector.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn add(&mut self, error: BrickmapError) {
        self.errors.push(error);
    }

    /// Get the number of collected errors.
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.len()
    }

    /// Check if there are any errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert to a Result, returning Multiple error if there are any errors.
    pub fn into_result(self) -> Result<()> {
        BrickmapError::collect(self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        let parse = err!(HclParse {
            file: PathBuf::from("main.tf"),
            message: "unexpected token".to_string(),
            line: None,
            column: None,
        });
        assert!(parse.is_recoverable());

        let no_data = err!(NoData {});
        assert!(!no_data.is_recoverable());
    }

    #[test]
    fn test_collect_empty_is_ok() {
        assert!(BrickmapError::collect(Vec::new()).is_ok());
    }

    #[test]
    fn test_collect_many_aggregates() {
        let errors = vec![err!(NoData {}), err!(NoData {})];
        match BrickmapError::collect(errors) {
            Err(BrickmapError::Multiple { count, .. }) => assert_eq!(count, 2),
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn test_error_collector() {
        let mut collector = ErrorCollector::new();
        assert!(collector.is_empty());

        collector.add(err!(NoData {}));
        assert_eq!(collector.count(), 1);
        assert!(collector.into_result().is_err());
    }
}
