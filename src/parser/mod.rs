//! HCL parsing module for Terraform files.
//!
//! This module handles turning Terraform source text into the typed
//! [`ConfigNode`](crate::tree::ConfigNode) tree the extraction engine
//! consumes, and extracting line-position indexes from that tree.
//!
//! Parsing is span-aware: every HCL block's body mapping carries the
//! 1-based line range of the block, which is what makes the position
//! extraction possible downstream.
//!
//! # Example
//!
//! ```rust,ignore
//! use brickmap::parser::{extract_positions, HclParser, Parser};
//! use brickmap::Config;
//!
//! let config = Config::default();
//! let parser = HclParser::new(&config);
//!
//! let tree = parser.parse_content(content, std::path::Path::new("main.tf"))?;
//! let positions = extract_positions(&tree);
//! println!("{} task positions", positions.task_positions.len());
//! ```

mod hcl;
mod positions;

pub use hcl::HclParser;
pub use positions::{extract_positions, PositionIndex};

use crate::tree::ConfigNode;

/// File extensions to scan for Terraform files.
pub const TERRAFORM_EXTENSIONS: &[&str] = &[".tf"];

/// Files and directories to skip during scanning.
pub const SKIP_FILES: &[&str] = &[".terraform", ".terragrunt-cache", "terraform.tfstate"];

/// Trait for parsing HCL content.
///
/// This trait allows for different parsing implementations
/// (e.g., for testing with mock parsers).
pub trait Parser: Send + Sync {
    /// Parse a single file's contents into a configuration tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the HCL content is invalid.
    fn parse_content(&self, content: &str, file_path: &std::path::Path)
        -> crate::Result<ConfigNode>;
}
