//! Line-position extraction from the configuration tree.
//!
//! A pre-order traversal synthesizes a textual path key for every node and
//! records the line span of each annotated mapping into one of two buckets:
//! paths containing `task` (case-insensitive) and everything else.
//!
//! The bucket choice is a substring test on the whole synthesized path, not
//! a structural check. A mapping key like `tasking_config` therefore lands
//! in the task bucket; this matches the established output contract and is
//! kept as-is.

use crate::tree::{ConfigNode, LineSpan, META_PREFIX};
use crate::types::JOB_RESOURCE_KIND;
use indexmap::IndexMap;

/// Position indexes keyed by synthesized path.
///
/// Path keys are built by joining mapping keys with `_` and appending
/// sequence indices as `[i]` with no separator, e.g.
/// `resource[0]_databricks_job_etl_task[1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionIndex {
    /// Spans of annotated mappings whose path does not mention `task`
    pub resource_positions: IndexMap<String, LineSpan>,
    /// Spans of annotated mappings whose path mentions `task`
    pub task_positions: IndexMap<String, LineSpan>,
}

impl PositionIndex {
    /// Look up the span of a top-level resource entity.
    #[must_use]
    pub fn resource_position(
        &self,
        resource_type: &str,
        resource_name: &str,
        resource_index: usize,
    ) -> Option<LineSpan> {
        let key = format!("resource[{resource_index}]_{resource_type}_{resource_name}");
        self.resource_positions.get(&key).copied()
    }

    /// Look up the span of a job task by job name and task index.
    #[must_use]
    pub fn task_position(
        &self,
        job_name: &str,
        resource_index: usize,
        task_index: usize,
    ) -> Option<LineSpan> {
        let key = format!(
            "resource[{resource_index}]_{JOB_RESOURCE_KIND}_{job_name}_task[{task_index}]"
        );
        self.task_positions.get(&key).copied()
    }

    /// Total number of recorded positions across both buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resource_positions.len() + self.task_positions.len()
    }

    /// True when no positions were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resource_positions.is_empty() && self.task_positions.is_empty()
    }
}

/// Extract all line positions from a configuration tree.
///
/// The traversal is total: it never fails, and nodes without line metadata
/// are silently skipped. The root itself is never recorded (its path is
/// empty).
#[must_use]
pub fn extract_positions(root: &ConfigNode) -> PositionIndex {
    let mut index = PositionIndex::default();
    walk(root, "", &mut index);
    tracing::debug!(
        resources = index.resource_positions.len(),
        tasks = index.task_positions.len(),
        "Position extraction complete"
    );
    index
}

fn walk(node: &ConfigNode, path: &str, index: &mut PositionIndex) {
    match node {
        ConfigNode::Mapping(mapping) => {
            if !path.is_empty() {
                if let Some(span) = mapping.span() {
                    if path.to_ascii_lowercase().contains("task") {
                        index.task_positions.insert(path.to_string(), span);
                    } else {
                        index.resource_positions.insert(path.to_string(), span);
                    }
                }
            }

            for (key, value) in mapping.iter() {
                if key.starts_with(META_PREFIX) {
                    continue;
                }
                let child_path = if path.is_empty() {
                    key.to_string()
                } else {
                    format!("{path}_{key}")
                };
                walk(value, &child_path, index);
            }
        }
        ConfigNode::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                let child_path = format!("{path}[{i}]");
                walk(item, &child_path, index);
            }
        }
        ConfigNode::Scalar(_) => {}
    }
}
