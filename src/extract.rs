//! Domain extraction from the configuration tree.
//!
//! The [`ResourceExtractor`] locates the top-level `resource` sequence and
//! materializes `databricks_job` and `databricks_cluster` declarations as
//! typed records. Each record captures the index of its enclosing resource
//! block (needed to rebuild position lookup keys) and the line span of its
//! own block, which serves as an independent fallback source of position
//! data.
//!
//! The extractor is stateful: it must be loaded with a tree before either
//! query, and answers with a `NoData` error otherwise. Everything past that
//! precondition is tolerant: missing attributes become `None`, a missing
//! `resource` key yields empty results, and duplicate entity names are
//! last-write-wins.

use crate::error::Result;
use crate::tree::ConfigNode;
use crate::types::{Cluster, Job, Task, CLUSTER_RESOURCE_KIND, JOB_RESOURCE_KIND};
use indexmap::IndexMap;

/// Extracts job and cluster declarations from a loaded configuration tree.
#[derive(Debug, Default)]
pub struct ResourceExtractor<'a> {
    tree: Option<&'a ConfigNode>,
}

impl<'a> ResourceExtractor<'a> {
    /// Create an extractor with no tree loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a parsed tree. Replaces any previously loaded tree.
    pub fn load(&mut self, tree: &'a ConfigNode) {
        self.tree = Some(tree);
    }

    /// The top-level `resource` sequence of the loaded tree.
    ///
    /// A tree without a `resource` entry yields an empty slice.
    ///
    /// # Errors
    ///
    /// Returns `NoData` if no tree has been loaded yet.
    fn resources(&self) -> Result<&'a [ConfigNode]> {
        let tree = self.tree.ok_or_else(|| crate::err!(NoData {}))?;
        Ok(tree
            .as_mapping()
            .and_then(|root| root.get("resource"))
            .and_then(ConfigNode::as_sequence)
            .unwrap_or(&[]))
    }

    /// Extract all `databricks_job` declarations, keyed by job name.
    ///
    /// # Errors
    ///
    /// Returns `NoData` if no tree has been loaded yet.
    pub fn jobs(&self) -> Result<IndexMap<String, Job>> {
        let mut jobs = IndexMap::new();

        for (resource_index, resource) in self.resources()?.iter().enumerate() {
            let Some(entities) = resource
                .as_mapping()
                .and_then(|kinds| kinds.get(JOB_RESOURCE_KIND))
                .and_then(ConfigNode::as_mapping)
            else {
                continue;
            };

            for (name, data) in entities.iter() {
                let Some(body) = data.as_mapping() else {
                    continue;
                };

                let tasks = body
                    .get("task")
                    .and_then(ConfigNode::as_sequence)
                    .map(|items| items.iter().map(task_from_node).collect())
                    .unwrap_or_default();

                jobs.insert(
                    name.to_string(),
                    Job {
                        name: name.to_string(),
                        tasks,
                        resource_index,
                        span: body.span(),
                    },
                );
            }
        }

        tracing::debug!(jobs = jobs.len(), "Job extraction complete");
        Ok(jobs)
    }

    /// Extract all `databricks_cluster` declarations, keyed by cluster name.
    ///
    /// # Errors
    ///
    /// Returns `NoData` if no tree has been loaded yet.
    pub fn clusters(&self) -> Result<IndexMap<String, Cluster>> {
        let mut clusters = IndexMap::new();

        for (resource_index, resource) in self.resources()?.iter().enumerate() {
            let Some(entities) = resource
                .as_mapping()
                .and_then(|kinds| kinds.get(CLUSTER_RESOURCE_KIND))
                .and_then(ConfigNode::as_mapping)
            else {
                continue;
            };

            for (name, data) in entities.iter() {
                let Some(body) = data.as_mapping() else {
                    continue;
                };

                clusters.insert(
                    name.to_string(),
                    Cluster {
                        name: name.to_string(),
                        cluster_name: string_attr(body.get("cluster_name")),
                        spark_version: string_attr(body.get("spark_version")),
                        node_type_id: string_attr(body.get("node_type_id")),
                        autotermination_minutes: int_attr(body.get("autotermination_minutes")),
                        num_workers: int_attr(body.get("num_workers")),
                        resource_index,
                        span: body.span(),
                    },
                );
            }
        }

        tracing::debug!(clusters = clusters.len(), "Cluster extraction complete");
        Ok(clusters)
    }
}

fn task_from_node(node: &ConfigNode) -> Task {
    let Some(body) = node.as_mapping() else {
        return Task::default();
    };
    Task {
        task_key: string_attr(body.get("task_key")),
        depends_on_task: string_attr(body.get("depends_on_task")),
        span: body.span(),
    }
}

fn string_attr(node: Option<&ConfigNode>) -> Option<String> {
    node.and_then(ConfigNode::as_str).map(str::to_string)
}

fn int_attr(node: Option<&ConfigNode>) -> Option<i64> {
    node.and_then(ConfigNode::as_int)
}
