//! Mermaid diagram generator.
//!
//! Renders a [`PipelineGraph`] as a fenced `graph TD` document. The section
//! order defines the visual grouping and is part of the output contract:
//! job subgraphs first (each task node line immediately followed by its
//! incoming dependency edge), then cluster nodes, then the cluster→task
//! usage edges.

use crate::graph::{EdgeType, PipelineGraph, PipelineNode};
use crate::tree::LineSpan;

/// Render the diagram document for a pipeline graph.
#[must_use]
pub fn render_diagram(graph: &PipelineGraph) -> String {
    let mut lines: Vec<String> = vec!["```mermaid".to_string(), "graph TD".to_string()];

    render_job_subgraphs(graph, &mut lines);
    render_cluster_nodes(graph, &mut lines);
    render_usage_edges(graph, &mut lines);

    lines.push("```".to_string());
    lines.join("\n")
}

/// One subgraph per job, task nodes in declaration order.
fn render_job_subgraphs(graph: &PipelineGraph, lines: &mut Vec<String>) {
    for (job_name, task_ids) in graph.job_groups() {
        lines.push(format!("    subgraph {job_name}"));

        for task_id in task_ids {
            if let Some(node) = graph.node(task_id) {
                let (label, span) = node.label_parts();
                lines.push(format!("        {task_id}[{}]", node_label(label, span)));
            }

            if let Some(dependency) = graph.incoming_dependency(task_id) {
                lines.push(format!("        {} --> {task_id}", dependency.id()));
            }
        }

        lines.push("    end".to_string());
    }
}

/// One node per cluster, labeled with its extractor-captured span.
fn render_cluster_nodes(graph: &PipelineGraph, lines: &mut Vec<String>) {
    for cluster_id in graph.cluster_ids() {
        if let Some(PipelineNode::Cluster(cluster)) = graph.node(cluster_id) {
            lines.push(format!(
                "    {cluster_id}[{}]",
                node_label(&cluster.name, cluster.span)
            ));
        }
    }
}

/// The cluster→task usage edges: clusters outer, jobs then tasks inner.
fn render_usage_edges(graph: &PipelineGraph, lines: &mut Vec<String>) {
    for cluster_id in graph.cluster_ids() {
        for (_, task_ids) in graph.job_groups() {
            for task_id in task_ids {
                if graph.has_edge(cluster_id, task_id, EdgeType::Uses) {
                    lines.push(format!("    {cluster_id} -->|uses| {task_id}"));
                }
            }
        }
    }
}

/// A node label: the name, followed by ` {start}-{end}` only when a span
/// resolved.
fn node_label(name: &str, span: Option<LineSpan>) -> String {
    match span {
        Some(span) => format!("{name} {span}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::parser::PositionIndex;
    use crate::types::{Cluster, Job, Task};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn build(
        jobs: IndexMap<String, Job>,
        clusters: IndexMap<String, Cluster>,
        positions: PositionIndex,
    ) -> String {
        let graph = GraphBuilder::new().build(&jobs, &clusters, &positions).unwrap();
        render_diagram(&graph)
    }

    fn etl_job() -> Job {
        Job {
            name: "etl".to_string(),
            tasks: vec![
                Task {
                    task_key: Some("extract".to_string()),
                    depends_on_task: None,
                    span: None,
                },
                Task {
                    task_key: Some("load".to_string()),
                    depends_on_task: Some("extract".to_string()),
                    span: None,
                },
            ],
            resource_index: 0,
            span: None,
        }
    }

    fn shared_cluster() -> Cluster {
        Cluster {
            name: "shared".to_string(),
            cluster_name: Some("shared".to_string()),
            spark_version: None,
            node_type_id: None,
            autotermination_minutes: None,
            num_workers: None,
            resource_index: 1,
            span: Some(crate::tree::LineSpan::new(10, 12)),
        }
    }

    #[test]
    fn test_full_document_layout() {
        let mut jobs = IndexMap::new();
        jobs.insert("etl".to_string(), etl_job());
        let mut clusters = IndexMap::new();
        clusters.insert("shared".to_string(), shared_cluster());

        let diagram = build(jobs, clusters, PositionIndex::default());

        let expected = "\
```mermaid
graph TD
    subgraph etl
        etl_extract[extract]
        etl_load[load]
        etl_extract --> etl_load
    end
    cluster_shared[shared 10-12]
    cluster_shared -->|uses| etl_extract
    cluster_shared -->|uses| etl_load
```";
        assert_eq!(diagram, expected);
    }

    #[test]
    fn test_keyless_task_renders_index_fallback() {
        let mut jobs = IndexMap::new();
        jobs.insert(
            "batch".to_string(),
            Job {
                name: "batch".to_string(),
                tasks: vec![Task::default(), Task::default(), Task::default()],
                resource_index: 0,
                span: None,
            },
        );

        let diagram = build(jobs, IndexMap::new(), PositionIndex::default());
        assert!(diagram.contains("        batch_task_2[task_2]"));
    }

    #[test]
    fn test_empty_job_renders_empty_subgraph() {
        let mut jobs = IndexMap::new();
        jobs.insert(
            "idle".to_string(),
            Job {
                name: "idle".to_string(),
                tasks: vec![],
                resource_index: 0,
                span: None,
            },
        );

        let diagram = build(jobs, IndexMap::new(), PositionIndex::default());
        assert!(diagram.contains("    subgraph idle\n    end"));
        assert!(!diagram.contains("-->"));
    }

    #[test]
    fn test_dangling_dependency_not_drawn() {
        let mut jobs = IndexMap::new();
        jobs.insert(
            "etl".to_string(),
            Job {
                name: "etl".to_string(),
                tasks: vec![Task {
                    task_key: Some("load".to_string()),
                    depends_on_task: Some("vanished".to_string()),
                    span: None,
                }],
                resource_index: 0,
                span: None,
            },
        );

        let diagram = build(jobs, IndexMap::new(), PositionIndex::default());
        assert!(!diagram.contains("--> etl_load\n"));
        assert!(diagram.contains("        etl_load[load]"));
    }

    #[test]
    fn test_task_label_includes_position_from_index() {
        let mut positions = PositionIndex::default();
        positions.task_positions.insert(
            "resource[0]_databricks_job_etl_task[0]".to_string(),
            crate::tree::LineSpan::new(4, 6),
        );

        let mut jobs = IndexMap::new();
        jobs.insert("etl".to_string(), etl_job());

        let diagram = build(jobs, IndexMap::new(), positions);
        assert!(diagram.contains("        etl_extract[extract 4-6]"));
        // second task had no position anywhere
        assert!(diagram.contains("        etl_load[load]"));
    }

    #[test]
    fn test_cluster_without_span_has_bare_label() {
        let mut clusters = IndexMap::new();
        let mut cluster = shared_cluster();
        cluster.span = None;
        clusters.insert("shared".to_string(), cluster);

        let diagram = build(IndexMap::new(), clusters, PositionIndex::default());
        assert!(diagram.contains("    cluster_shared[shared]\n"));
    }

    #[test]
    fn test_uses_edges_cover_all_jobs() {
        let mut jobs = IndexMap::new();
        jobs.insert("etl".to_string(), etl_job());
        jobs.insert(
            "report".to_string(),
            Job {
                name: "report".to_string(),
                tasks: vec![Task {
                    task_key: Some("publish".to_string()),
                    depends_on_task: None,
                    span: None,
                }],
                resource_index: 1,
                span: None,
            },
        );
        let mut clusters = IndexMap::new();
        clusters.insert("shared".to_string(), shared_cluster());

        let diagram = build(jobs, clusters, PositionIndex::default());
        let uses_lines: Vec<&str> = diagram
            .lines()
            .filter(|l| l.contains("-->|uses|"))
            .collect();
        assert_eq!(uses_lines.len(), 3);
        assert!(diagram.contains("    cluster_shared -->|uses| report_publish"));
    }
}
