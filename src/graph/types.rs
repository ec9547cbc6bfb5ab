//! Graph type definitions.
//!
//! This module defines the core types used in the pipeline graph:
//! - `PipelineGraph`: The main graph structure
//! - `PipelineNode`: Nodes in the graph (tasks or clusters)
//! - `EdgeType`: Relationships between nodes
//! - `NodeId`: Unique identifier for nodes

use crate::tree::LineSpan;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Unique identifier for a node in the graph.
///
/// Identifiers double as Mermaid node ids: `{job}_{task_label}` for tasks
/// and `cluster_{name}` for clusters.
pub type NodeId = String;

/// A task node inside a job grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNode {
    /// Node identifier (`{job}_{label}`)
    pub id: NodeId,
    /// Name of the owning job
    pub job: String,
    /// Display label (`task_key` or the `task_{index}` fallback)
    pub label: String,
    /// Resolved line span, if any source of position data had one
    pub span: Option<LineSpan>,
}

/// A cluster node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterNode {
    /// Node identifier (`cluster_{name}`)
    pub id: NodeId,
    /// The cluster's block label
    pub name: String,
    /// Line span captured by the domain extractor
    pub span: Option<LineSpan>,
}

/// Nodes in the pipeline graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineNode {
    /// A job task
    Task(TaskNode),
    /// A cluster
    Cluster(ClusterNode),
}

impl PipelineNode {
    /// The node's identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Task(t) => &t.id,
            Self::Cluster(c) => &c.id,
        }
    }

    /// The node's display label and resolved span.
    #[must_use]
    pub fn label_parts(&self) -> (&str, Option<LineSpan>) {
        match self {
            Self::Task(t) => (&t.label, t.span),
            Self::Cluster(c) => (&c.name, c.span),
        }
    }
}

/// Relationships between nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeType {
    /// The source task runs before the target task
    DependsOn,
    /// The source cluster is usable by the target task
    Uses,
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DependsOn => write!(f, "depends_on"),
            Self::Uses => write!(f, "uses"),
        }
    }
}

/// The pipeline graph structure.
///
/// Wraps a petgraph directed graph and keeps the ordering information the
/// renderer needs: job groupings (with their tasks in declaration order)
/// and cluster declaration order.
#[derive(Debug, Clone, Default)]
pub struct PipelineGraph {
    /// The underlying petgraph directed graph
    inner: DiGraph<PipelineNode, EdgeType>,

    /// Index from node ID to petgraph NodeIndex
    node_index: HashMap<NodeId, NodeIndex>,

    /// Per-job task node ids, in job then task declaration order
    job_groups: Vec<(String, Vec<NodeId>)>,

    /// Cluster node ids in declaration order
    cluster_order: Vec<NodeId>,
}

impl PipelineGraph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new (possibly empty) job grouping. Subsequent
    /// [`add_task`](Self::add_task) calls append to it.
    pub fn begin_job(&mut self, name: &str) {
        self.job_groups.push((name.to_string(), Vec::new()));
    }

    /// Add a task node to the current job grouping.
    ///
    /// The id is recorded in the grouping even when a node with the same id
    /// already exists (duplicate task keys render as repeated node lines,
    /// matching the declared structure).
    pub fn add_task(&mut self, task: TaskNode) -> NodeId {
        let node_id = task.id.clone();
        if !self.node_index.contains_key(&node_id) {
            let idx = self.inner.add_node(PipelineNode::Task(task));
            self.node_index.insert(node_id.clone(), idx);
        }
        if let Some((_, ids)) = self.job_groups.last_mut() {
            ids.push(node_id.clone());
        }
        node_id
    }

    /// Add a cluster node.
    pub fn add_cluster(&mut self, cluster: ClusterNode) -> NodeId {
        let node_id = cluster.id.clone();
        if !self.node_index.contains_key(&node_id) {
            let idx = self.inner.add_node(PipelineNode::Cluster(cluster));
            self.node_index.insert(node_id.clone(), idx);
        }
        self.cluster_order.push(node_id.clone());
        node_id
    }

    /// Add an edge between two nodes.
    ///
    /// Returns true if the edge was added, false if it already exists or if
    /// either node doesn't exist. The silent refusal on missing endpoints
    /// is what makes dangling `depends_on_task` references draw nothing.
    pub fn add_edge(&mut self, from: &str, to: &str, edge_type: EdgeType) -> bool {
        let Some(&from_idx) = self.node_index.get(from) else {
            return false;
        };
        let Some(&to_idx) = self.node_index.get(to) else {
            return false;
        };

        if self.inner.find_edge(from_idx, to_idx).is_some() {
            return false;
        }

        self.inner.add_edge(from_idx, to_idx, edge_type);
        true
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&PipelineNode> {
        self.node_index.get(id).map(|&idx| &self.inner[idx])
    }

    /// The source node of the incoming `DependsOn` edge of a task, if any.
    #[must_use]
    pub fn incoming_dependency(&self, id: &str) -> Option<&PipelineNode> {
        let &idx = self.node_index.get(id)?;
        self.inner
            .edges_directed(idx, Direction::Incoming)
            .find(|edge| *edge.weight() == EdgeType::DependsOn)
            .map(|edge| &self.inner[edge.source()])
    }

    /// Check whether an edge of the given type exists.
    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str, edge_type: EdgeType) -> bool {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_index.get(from), self.node_index.get(to))
        else {
            return false;
        };
        self.inner
            .find_edge(from_idx, to_idx)
            .is_some_and(|e| self.inner[e] == edge_type)
    }

    /// Job groupings in declaration order.
    #[must_use]
    pub fn job_groups(&self) -> &[(String, Vec<NodeId>)] {
        &self.job_groups
    }

    /// Cluster node ids in declaration order.
    #[must_use]
    pub fn cluster_ids(&self) -> &[NodeId] {
        &self.cluster_order
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Number of edges of one type.
    #[must_use]
    pub fn edge_count_of(&self, edge_type: EdgeType) -> usize {
        self.inner
            .edge_weights()
            .filter(|&&w| w == edge_type)
            .count()
    }
}
