//! Pipeline graph construction.
//!
//! This module turns extracted jobs, clusters and position data into a
//! directed graph: one node per task (grouped by job) and per cluster,
//! `depends-on` edges between tasks of the same job, and `uses` edges from
//! every cluster to every task.
//!
//! The graph is the intermediate representation behind the Mermaid diagram;
//! rendering lives in [`crate::render::mermaid`].

mod builder;
mod types;

pub use builder::GraphBuilder;
pub use types::{ClusterNode, EdgeType, NodeId, PipelineGraph, PipelineNode, TaskNode};
