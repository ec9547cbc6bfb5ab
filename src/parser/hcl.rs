//! HCL file parser implementation.
//!
//! This module provides the span-preserving HCL front-end built on the
//! `hcl-edit` crate. Parsed blocks are regrouped into the tree shape the
//! extraction engine expects: block identifiers map to sequences of bodies
//! (one element per repetition), block labels wrap the body in nested
//! single-entry mappings, and each body mapping carries the source line
//! span of its block.

use crate::config::Config;
use crate::error::{BrickmapError, Result};
use crate::parser::{Parser, SKIP_FILES, TERRAFORM_EXTENSIONS};
use crate::tree::{ConfigMapping, ConfigNode, LineSpan, Scalar, META_PREFIX};

use hcl_edit::expr::{Expression, ObjectKey};
use hcl_edit::structure::{Block, BlockLabel, Body, Structure};
use hcl_edit::Span;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// HCL parser for Terraform files.
///
/// The parser discovers `.tf` files under a directory and turns each file
/// into an annotated [`ConfigNode`] tree.
pub struct HclParser {
    /// Configuration for parsing behavior
    config: Config,
}

impl HclParser {
    /// Create a new HCL parser with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Discover all Terraform files under a path.
    ///
    /// A file path is returned as-is; a directory is walked recursively,
    /// honoring skip rules and configured exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if the path doesn't exist.
    pub fn discover(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(crate::err!(DirectoryNotFound {
                path: path.to_path_buf(),
            }));
        }

        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(path)
            .follow_links(true)
            .max_depth(self.config.scan.max_depth)
            .into_iter()
            .filter_entry(|e| !self.should_skip(e.path()))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let file_path = entry.path();

            // Skip directories
            if file_path.is_dir() {
                continue;
            }

            if !self.is_terraform_file(file_path) {
                continue;
            }

            files.push(file_path.to_path_buf());
        }

        tracing::debug!(
            path = %path.display(),
            files = files.len(),
            "Terraform file discovery complete"
        );

        Ok(files)
    }

    /// Parse a single Terraform file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn parse_file(&self, path: &Path) -> Result<ConfigNode> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BrickmapError::io(path, e, file!(), line!()))?;

        self.parse_content(&content, path)
    }

    /// Check if a path should be skipped.
    fn should_skip(&self, path: &Path) -> bool {
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            // Skip hidden files/directories
            if file_name.starts_with('.') {
                tracing::debug!(path = %path.display(), reason = "hidden file/directory", "Skipping path");
                return true;
            }

            // Skip known directories
            if SKIP_FILES.iter().any(|s| file_name == *s) {
                tracing::debug!(path = %path.display(), reason = "known skip file", "Skipping path");
                return true;
            }

            // Check config exclusions
            if self.config.scan.exclude_patterns.iter().any(|pattern| {
                glob::Pattern::new(pattern)
                    .map(|p| p.matches(file_name) || p.matches(&path.to_string_lossy()))
                    .unwrap_or(false)
            }) {
                tracing::debug!(path = %path.display(), reason = "matches exclude pattern", "Skipping path");
                return true;
            }
        }

        false
    }

    /// Check if a file is a Terraform file.
    fn is_terraform_file(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        TERRAFORM_EXTENSIONS
            .iter()
            .any(|ext| path_str.ends_with(ext))
    }
}

impl Parser for HclParser {
    fn parse_content(&self, content: &str, file_path: &Path) -> Result<ConfigNode> {
        let body = hcl_edit::parser::parse_body(content).map_err(|e| crate::err!(HclParse {
            file: file_path.to_path_buf(),
            message: e.to_string(),
            line: None,
            column: None,
        }))?;

        let lines = LineIndex::new(content);
        Ok(ConfigNode::Mapping(convert_body(&body, &lines)))
    }
}

/// Byte-offset to 1-based line number translation for one source file.
struct LineIndex {
    /// Byte offset of the first character of each line
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// 1-based line containing the given byte offset.
    fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }
}

/// Convert an HCL body into a mapping, grouping repeated blocks into
/// sequences under their identifier.
fn convert_body(body: &Body, lines: &LineIndex) -> ConfigMapping {
    let mut mapping = ConfigMapping::new();

    for structure in body.iter() {
        match structure {
            Structure::Attribute(attr) => {
                mapping.insert(attr.key.as_str(), convert_expression(&attr.value));
            }
            Structure::Block(block) => {
                let ident = block.ident.value().as_str().to_string();
                if ident.starts_with(META_PREFIX) {
                    // Reserved namespace; a real block can't use it without
                    // colliding with metadata keys of pre-parsed trees.
                    tracing::warn!(ident = %ident, "Skipping block in reserved namespace");
                    continue;
                }
                let node = convert_block(block, lines);
                match mapping.get_mut(&ident) {
                    Some(ConfigNode::Sequence(items)) => items.push(node),
                    _ => mapping.insert(ident, ConfigNode::Sequence(vec![node])),
                }
            }
        }
    }

    mapping
}

/// Convert one block: body mapping annotated with the block's line span,
/// wrapped in one single-entry mapping per label, outermost label first.
fn convert_block(block: &Block, lines: &LineIndex) -> ConfigNode {
    let mut body = convert_body(&block.body, lines);

    if let Some(range) = block.span() {
        let start = lines.line_of(range.start);
        let end = lines.line_of(range.end.saturating_sub(1).max(range.start));
        body.set_span(Some(LineSpan::new(start, end)));
    }

    let mut node = ConfigNode::Mapping(body);
    for label in block.labels.iter().rev() {
        let name = match label {
            BlockLabel::Ident(ident) => ident.value().as_str().to_string(),
            BlockLabel::String(literal) => literal.value().clone(),
        };
        let mut wrapper = ConfigMapping::new();
        wrapper.insert(name, node);
        node = ConfigNode::Mapping(wrapper);
    }
    node
}

/// Convert an HCL expression to a tree node.
///
/// Literals map to scalars, arrays to sequences, objects to mappings.
/// Unevaluated expressions (variables, traversals, templates, function
/// calls) are kept as their raw source text; no evaluation happens here.
fn convert_expression(expr: &Expression) -> ConfigNode {
    match expr {
        Expression::Null(_) => ConfigNode::Scalar(Scalar::Null),
        Expression::Bool(b) => ConfigNode::Scalar(Scalar::Bool(*b.value())),
        Expression::Number(n) => {
            let value = n.value();
            ConfigNode::Scalar(value.as_i64().map_or_else(
                || Scalar::Float(value.as_f64().unwrap_or_default()),
                Scalar::Int,
            ))
        }
        Expression::String(s) => ConfigNode::Scalar(Scalar::String(s.value().clone())),
        Expression::Array(items) => {
            ConfigNode::Sequence(items.iter().map(convert_expression).collect())
        }
        Expression::Object(object) => {
            let mut mapping = ConfigMapping::new();
            for (key, value) in object.iter() {
                mapping.insert(object_key_to_string(key), convert_expression(value.expr()));
            }
            ConfigNode::Mapping(mapping)
        }
        other => ConfigNode::Scalar(Scalar::String(other.to_string().trim().to_string())),
    }
}

/// Convert an object key to a string.
fn object_key_to_string(key: &ObjectKey) -> String {
    match key {
        ObjectKey::Ident(ident) => ident.value().as_str().to_string(),
        ObjectKey::Expression(expr) => expr.to_string().trim().to_string(),
    }
}
