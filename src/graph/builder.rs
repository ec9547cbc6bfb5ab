//! Graph builder implementation.
//!
//! This module provides the `GraphBuilder` which constructs a
//! [`PipelineGraph`] from extracted jobs, clusters and position data.
//!
//! # Algorithm
//!
//! 1. **Job Phase**: one grouping per job; one node per task in declaration
//!    order, its span resolved from the task position index first, then the
//!    task's own span. After a job's nodes exist, one `DependsOn` edge per
//!    declared `depends_on_task`. Forward references within the job work;
//!    references to keys the job doesn't declare are dropped.
//! 2. **Cluster Phase**: one node per cluster. Cluster spans come from the
//!    extractor's directly-captured values only; the resource-position
//!    index is accepted as input but not consulted here.
//! 3. **Usage Phase**: one `Uses` edge from every cluster to every task
//!    across all jobs. The source schema has no cluster-assignment field,
//!    so usage is over-approximated by the full cross-product.

use crate::error::Result;
use crate::graph::types::{ClusterNode, EdgeType, PipelineGraph, TaskNode};
use crate::parser::PositionIndex;
use crate::types::{Cluster, Job};
use indexmap::IndexMap;

/// Builder for constructing pipeline graphs.
///
/// # Example
///
/// ```rust,no_run
/// use brickmap::graph::GraphBuilder;
/// use brickmap::parser::PositionIndex;
/// use indexmap::IndexMap;
///
/// let builder = GraphBuilder::new();
/// let graph = builder
///     .build(&IndexMap::new(), &IndexMap::new(), &PositionIndex::default())
///     .unwrap();
/// println!("Built graph with {} nodes", graph.node_count());
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    /// Create a new graph builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build a pipeline graph from jobs, clusters and position data.
    ///
    /// # Errors
    ///
    /// Returns an error if graph construction fails.
    pub fn build(
        self,
        jobs: &IndexMap<String, Job>,
        clusters: &IndexMap<String, Cluster>,
        positions: &PositionIndex,
    ) -> Result<PipelineGraph> {
        tracing::debug!(
            jobs = jobs.len(),
            clusters = clusters.len(),
            positions = positions.len(),
            "Starting graph construction"
        );
        let mut graph = PipelineGraph::new();

        // Phase 1: job groupings, task nodes, dependency edges
        for (job_name, job) in jobs {
            graph.begin_job(job_name);

            for (task_index, task) in job.tasks.iter().enumerate() {
                let label = task.label(task_index);
                let span = positions
                    .task_position(job_name, job.resource_index, task_index)
                    .or(task.span);
                graph.add_task(TaskNode {
                    id: format!("{job_name}_{label}"),
                    job: job_name.clone(),
                    label,
                    span,
                });
            }

            for (task_index, task) in job.tasks.iter().enumerate() {
                if let Some(dependency) = &task.depends_on_task {
                    let from = format!("{job_name}_{dependency}");
                    let to = format!("{job_name}_{}", task.label(task_index));
                    if !graph.add_edge(&from, &to, EdgeType::DependsOn) {
                        tracing::debug!(
                            job = %job_name,
                            dependency = %dependency,
                            "Dropping dependency edge with unknown endpoint"
                        );
                    }
                }
            }
        }

        // Phase 2: cluster nodes, extractor-captured spans only
        for (cluster_name, cluster) in clusters {
            graph.add_cluster(ClusterNode {
                id: format!("cluster_{cluster_name}"),
                name: cluster_name.clone(),
                span: cluster.span,
            });
        }

        // Phase 3: cluster -> task usage cross-product
        let cluster_ids: Vec<String> = graph.cluster_ids().to_vec();
        let task_ids: Vec<String> = graph
            .job_groups()
            .iter()
            .flat_map(|(_, ids)| ids.iter().cloned())
            .collect();
        for cluster_id in &cluster_ids {
            for task_id in &task_ids {
                graph.add_edge(cluster_id, task_id, EdgeType::Uses);
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph built"
        );

        Ok(graph)
    }
}
