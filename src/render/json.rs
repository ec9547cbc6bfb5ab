//! Simplified JSON summary generator.
//!
//! [`simplify`] projects full job/cluster records down to the minimal
//! attribute set of the summary schema. The projection is total: it cannot
//! fail, every input entity appears in the output, and absent attributes
//! serialize as explicit `null` so the schema stays identical across
//! records.

use crate::error::Result;
use crate::types::{Cluster, Job, Task};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The simplified structure: artifact 1 of a render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Task lists per job, in declaration order
    pub jobs: IndexMap<String, Vec<TaskSummary>>,
    /// Essential attributes per cluster, in declaration order
    pub clusters: IndexMap<String, ClusterSummary>,
}

/// Minimal task record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// The `task_key` attribute; `null` when absent
    pub task_key: Option<String>,
    /// The `depends_on_task` attribute; `null` when absent
    pub depends_on_task: Option<String>,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            task_key: task.task_key.clone(),
            depends_on_task: task.depends_on_task.clone(),
        }
    }
}

/// Minimal cluster record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// The `cluster_name` attribute (not the block label); `null` when absent
    pub cluster_name: Option<String>,
    /// Databricks runtime version
    pub spark_version: Option<String>,
    /// Worker node instance type
    pub node_type_id: Option<String>,
    /// Idle auto-termination timeout
    pub autotermination_minutes: Option<i64>,
    /// Fixed worker count
    pub num_workers: Option<i64>,
}

impl From<&Cluster> for ClusterSummary {
    fn from(cluster: &Cluster) -> Self {
        Self {
            cluster_name: cluster.cluster_name.clone(),
            spark_version: cluster.spark_version.clone(),
            node_type_id: cluster.node_type_id.clone(),
            autotermination_minutes: cluster.autotermination_minutes,
            num_workers: cluster.num_workers,
        }
    }
}

/// Project jobs and clusters down to the summary schema.
#[must_use]
pub fn simplify(
    jobs: &IndexMap<String, Job>,
    clusters: &IndexMap<String, Cluster>,
) -> Summary {
    Summary {
        jobs: jobs
            .iter()
            .map(|(name, job)| {
                (
                    name.clone(),
                    job.tasks.iter().map(TaskSummary::from).collect(),
                )
            })
            .collect(),
        clusters: clusters
            .iter()
            .map(|(name, cluster)| (name.clone(), ClusterSummary::from(cluster)))
            .collect(),
    }
}

/// Serialize a summary to JSON.
///
/// Pretty output uses 4-space indentation.
///
/// # Errors
///
/// Returns a `ReportGeneration` error if serialization fails.
pub fn to_json_string(summary: &Summary, pretty: bool) -> Result<String> {
    let serialize = || -> std::result::Result<String, serde_json::Error> {
        if pretty {
            let mut buf = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            summary.serialize(&mut serializer)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        } else {
            serde_json::to_string(summary)
        }
    };

    serialize().map_err(|e| crate::err!(ReportGeneration {
        message: format!("Failed to serialize summary: {e}"),
    }))
}
