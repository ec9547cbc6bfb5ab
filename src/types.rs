//! Core data types used throughout brickmap.
//!
//! This module defines the fundamental data structures for representing:
//! - Databricks job and cluster declarations extracted from Terraform
//! - Per-file scan results and rendered artifacts
//! - Artifact formats

use crate::error::BrickmapError;
use crate::render::json::Summary;
use crate::tree::LineSpan;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resource kind name of Databricks job declarations.
pub const JOB_RESOURCE_KIND: &str = "databricks_job";

/// Resource kind name of Databricks cluster declarations.
pub const CLUSTER_RESOURCE_KIND: &str = "databricks_cluster";

/// A Databricks job declaration.
///
/// # Example HCL
///
/// ```hcl
/// resource "databricks_job" "etl" {
///   name = "nightly-etl"
///
///   task {
///     task_key = "extract"
///   }
///
///   task {
///     task_key        = "load"
///     depends_on_task = "extract"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// The block label of the job (e.g., "etl")
    pub name: String,

    /// Tasks in declaration order
    pub tasks: Vec<Task>,

    /// Index of the enclosing top-level `resource` block. Needed to rebuild
    /// the position lookup key when several resource blocks exist.
    pub resource_index: usize,

    /// Line span captured directly off the job's own block, independent of
    /// the position index
    pub span: Option<LineSpan>,
}

/// A single task inside a job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Task {
    /// The `task_key` attribute, if declared
    pub task_key: Option<String>,

    /// Soft reference to another task in the same job. Dangling references
    /// are tolerated and simply draw no edge.
    pub depends_on_task: Option<String>,

    /// Line span of the task's own block, used as a fallback when the
    /// position index has no entry for the task
    pub span: Option<LineSpan>,
}

impl Task {
    /// Display label for the task: its `task_key`, or `task_{index}` when
    /// the key is absent.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        self.task_key
            .clone()
            .unwrap_or_else(|| format!("task_{index}"))
    }
}

/// A Databricks cluster declaration.
///
/// All scalar attributes are optional; absent ones surface as `null` in the
/// simplified summary rather than being dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// The block label of the cluster
    pub name: String,

    /// The `cluster_name` attribute inside the block (distinct from the
    /// label; this is what the summary reports)
    pub cluster_name: Option<String>,

    /// The `spark_version` attribute
    pub spark_version: Option<String>,

    /// The `node_type_id` attribute
    pub node_type_id: Option<String>,

    /// The `autotermination_minutes` attribute
    pub autotermination_minutes: Option<i64>,

    /// The `num_workers` attribute
    pub num_workers: Option<i64>,

    /// Index of the enclosing top-level `resource` block
    pub resource_index: usize,

    /// Line span captured directly off the cluster's own block. Cluster
    /// diagram nodes use this span only; they never consult the generic
    /// position index.
    pub span: Option<LineSpan>,
}

/// Artifact formats the renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Simplified JSON summary
    Json,
    /// Mermaid dependency diagram
    Mermaid,
}

/// The pair of artifacts produced for one configuration tree.
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// The simplified structure (artifact 1, serialized on demand)
    pub summary: Summary,
    /// The Mermaid diagram document (artifact 2)
    pub diagram: String,
}

impl Artifacts {
    /// Total number of tasks across all jobs in the summary.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.summary.jobs.values().map(Vec::len).sum()
    }
}

/// The outcome of processing one Terraform file.
#[derive(Debug)]
pub struct FileReport {
    /// The source file
    pub path: PathBuf,
    /// Rendered artifacts, or the error that prevented them
    pub outcome: Result<Artifacts, BrickmapError>,
}

/// Result of scanning one or more paths.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Per-file reports in discovery order
    pub files: Vec<FileReport>,
}

impl ScanResult {
    /// Number of files that rendered successfully.
    #[must_use]
    pub fn rendered(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_ok()).count()
    }

    /// Number of files that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.files.len() - self.rendered()
    }

    /// True when at least one file failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_label_prefers_key() {
        let task = Task {
            task_key: Some("extract".to_string()),
            ..Task::default()
        };
        assert_eq!(task.label(0), "extract");
    }

    #[test]
    fn test_task_label_falls_back_to_index() {
        let task = Task::default();
        assert_eq!(task.label(2), "task_2");
    }

    #[test]
    fn test_scan_result_counts() {
        let result = ScanResult {
            files: vec![
                FileReport {
                    path: PathBuf::from("a/main.tf"),
                    outcome: Err(crate::err!(NoData {})),
                },
                FileReport {
                    path: PathBuf::from("b/main.tf"),
                    outcome: Ok(Artifacts {
                        summary: Summary::default(),
                        diagram: String::new(),
                    }),
                },
            ],
        };
        assert_eq!(result.rendered(), 1);
        assert_eq!(result.failed(), 1);
        assert!(result.has_failures());
    }
}
