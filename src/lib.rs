//! # Brickmap
//!
//! A Databricks Terraform job/cluster structure extractor and dependency
//! diagrammer.
//!
//! Brickmap parses Terraform files describing Databricks jobs and clusters,
//! correlates nested declarations with their source line ranges, and
//! renders two artifacts per file:
//!
//! - a **simplified JSON summary** of jobs (task key + dependency per task)
//!   and clusters (essential attributes)
//! - a **Mermaid dependency diagram** with one subgraph per job, intra-job
//!   task dependency edges, cluster nodes, and cluster→task usage edges
//!
//! ## Features
//!
//! - **Span-aware HCL parsing**: every block keeps its source line range
//! - **Position indexing**: path-keyed line positions for resources and
//!   tasks, extracted by a generic tree traversal
//! - **Graceful degradation**: missing attributes, missing line metadata
//!   and dangling task references never fail a render
//! - **Batch scanning**: per-file success/failure reporting with optional
//!   continue-on-error
//!
//! ## Example
//!
//! ```rust,no_run
//! use brickmap::{Config, Scanner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let scanner = Scanner::new(config);
//!
//!     // Scan a local directory
//!     let result = scanner.scan_path("./terraform").await?;
//!     println!("{} file(s) rendered", result.rendered());
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all, missing_docs, rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod parser;
pub mod render;
pub mod tree;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{BrickmapError, Result};
pub use tree::{ConfigNode, LineSpan};
pub use types::{ArtifactFormat, Artifacts, FileReport, ScanResult};

use crate::extract::ResourceExtractor;
use crate::graph::GraphBuilder;
use crate::parser::{extract_positions, HclParser};
use std::path::Path;

/// Main orchestrator that coordinates parsing, extraction and rendering.
///
/// The `Scanner` is the primary entry point for using brickmap as a
/// library. It handles:
/// - Discovering Terraform files under local paths
/// - Parsing each file into an annotated configuration tree
/// - Running the extraction engine and producing both artifacts per file
///
/// Files are independent: each one is parsed and rendered on its own, and
/// the per-file work runs concurrently.
pub struct Scanner {
    config: Config,
}

impl Scanner {
    /// Create a new scanner with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Produce both artifacts for an already-parsed configuration tree.
    ///
    /// This is the core contract: a tree in, a (summary, diagram) pair out.
    /// No filesystem access happens here.
    ///
    /// # Errors
    ///
    /// Returns an error only for internal serialization failures; missing
    /// attributes and positions degrade gracefully.
    pub fn render_tree(&self, tree: &ConfigNode) -> Result<Artifacts> {
        let positions = extract_positions(tree);

        let mut extractor = ResourceExtractor::new();
        extractor.load(tree);
        let jobs = extractor.jobs()?;
        let clusters = extractor.clusters()?;

        tracing::debug!(
            jobs = jobs.len(),
            clusters = clusters.len(),
            "Domain extraction complete"
        );

        let summary = render::json::simplify(&jobs, &clusters);
        let pipeline = GraphBuilder::new().build(&jobs, &clusters, &positions)?;
        let diagram = render::mermaid::render_diagram(&pipeline);

        Ok(Artifacts { summary, diagram })
    }

    /// Parse and render a single Terraform file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn scan_file(&self, path: &Path) -> Result<Artifacts> {
        let parser = HclParser::new(&self.config);
        let tree = parser.parse_file(path).await?;
        self.render_tree(&tree)
    }

    /// Scan a single local path for Terraform files.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path doesn't exist or isn't accessible
    /// - A file fails and `continue_on_error` is disabled
    pub async fn scan_path<P: AsRef<Path>>(&self, path: P) -> Result<ScanResult> {
        self.scan_paths(&[path.as_ref()]).await
    }

    /// Scan multiple local paths for Terraform files.
    ///
    /// Each discovered file is parsed and rendered independently and
    /// concurrently. With `continue_on_error` enabled, recoverable per-file
    /// failures are recorded in the result instead of aborting the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails, or if a file fails while
    /// `continue_on_error` is disabled.
    pub async fn scan_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ScanResult> {
        let parser = HclParser::new(&self.config);

        let mut files = Vec::new();
        for path in paths {
            let path = path.as_ref();
            tracing::info!(path = %path.display(), "Scanning path");
            files.extend(parser.discover(path)?);
        }

        tracing::info!(files = files.len(), "Discovered Terraform files");

        let reports = futures::future::join_all(files.into_iter().map(|path| async move {
            let outcome = self.scan_file(&path).await;
            FileReport { path, outcome }
        }))
        .await;

        let mut result = ScanResult::default();
        for report in reports {
            match report.outcome {
                Err(e) if !(self.config.scan.continue_on_error && e.is_recoverable()) => {
                    return Err(e);
                }
                outcome => {
                    if let Err(e) = &outcome {
                        tracing::warn!(
                            file = %report.path.display(),
                            "failed to process file, continuing: {}",
                            e
                        );
                    }
                    result.files.push(FileReport {
                        path: report.path,
                        outcome,
                    });
                }
            }
        }

        tracing::info!(
            rendered = result.rendered(),
            failed = result.failed(),
            "Scan complete"
        );

        Ok(result)
    }
}
