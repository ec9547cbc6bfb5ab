//! Integration tests for brickmap.
//!
//! These tests verify the end-to-end functionality of the scanner,
//! parser, extraction engine and renderers over real `.tf` fixtures.

use brickmap::{Config, Scanner};
use std::path::PathBuf;

/// Get the path to the test fixtures directory.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

mod parser_tests {
    use super::*;
    use brickmap::parser::{extract_positions, HclParser};
    use brickmap::tree::ConfigNode;

    #[tokio::test]
    async fn test_parse_databricks_fixture() {
        let config = Config::default();
        let parser = HclParser::new(&config);

        let tree = parser
            .parse_file(&fixtures_path().join("databricks/main.tf"))
            .await
            .unwrap();

        let resources = tree
            .as_mapping()
            .and_then(|m| m.get("resource"))
            .and_then(ConfigNode::as_sequence)
            .unwrap();
        assert_eq!(resources.len(), 3);
    }

    #[tokio::test]
    async fn test_positions_cover_jobs_and_tasks() {
        let config = Config::default();
        let parser = HclParser::new(&config);

        let tree = parser
            .parse_file(&fixtures_path().join("databricks/main.tf"))
            .await
            .unwrap();

        let positions = extract_positions(&tree);

        // etl has three tasks at resource index 1
        assert!(positions.task_position("etl", 1, 0).is_some());
        assert!(positions.task_position("etl", 1, 2).is_some());
        assert!(positions.task_position("etl", 1, 3).is_none());

        // cluster and both jobs appear in the resource bucket
        assert!(positions
            .resource_position("databricks_cluster", "shared", 0)
            .is_some());
        assert!(positions
            .resource_position("databricks_job", "reporting", 2)
            .is_some());
    }

    #[test]
    fn test_discover_skips_non_terraform_files() {
        let config = Config::default();
        let parser = HclParser::new(&config);

        let files = parser.discover(&fixtures_path().join("databricks")).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.tf"));
    }

    #[test]
    fn test_discover_missing_directory_fails() {
        let config = Config::default();
        let parser = HclParser::new(&config);

        assert!(parser.discover(&fixtures_path().join("no_such_dir")).is_err());
    }
}

mod scanner_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_scan() {
        let config = Config::default();
        let scanner = Scanner::new(config);

        let result = scanner
            .scan_path(fixtures_path().join("databricks"))
            .await
            .unwrap();

        assert_eq!(result.files.len(), 1);
        assert_eq!(result.rendered(), 1);

        let artifacts = result.files[0].outcome.as_ref().unwrap();
        assert_eq!(artifacts.summary.jobs.len(), 2);
        assert_eq!(artifacts.summary.clusters.len(), 1);
        assert_eq!(artifacts.task_count(), 4);
    }

    #[tokio::test]
    async fn test_scan_aborts_on_broken_file_by_default() {
        let config = Config::default();
        let scanner = Scanner::new(config);

        let result = scanner.scan_path(fixtures_path().join("mixed")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_scan_continues_past_broken_file_when_configured() {
        let mut config = Config::default();
        config.scan.continue_on_error = true;
        let scanner = Scanner::new(config);

        let result = scanner
            .scan_path(fixtures_path().join("mixed"))
            .await
            .unwrap();

        assert_eq!(result.files.len(), 2);
        assert_eq!(result.rendered(), 1);
        assert_eq!(result.failed(), 1);
        assert!(result.has_failures());
    }
}

mod render_tests {
    use super::*;

    async fn fixture_artifacts() -> brickmap::Artifacts {
        let scanner = Scanner::new(Config::default());
        scanner
            .scan_file(&fixtures_path().join("databricks/main.tf"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_summary_schema() {
        let artifacts = fixture_artifacts().await;
        let json =
            brickmap::render::json::to_json_string(&artifacts.summary, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["clusters"]["shared"]["cluster_name"], "shared-autoscaling");
        assert_eq!(parsed["clusters"]["shared"]["num_workers"], 2);
        assert_eq!(parsed["jobs"]["etl"][0]["task_key"], "extract");
        assert!(parsed["jobs"]["etl"][0]["depends_on_task"].is_null());
        assert_eq!(parsed["jobs"]["etl"][2]["depends_on_task"], "transform");
        assert_eq!(parsed["jobs"]["reporting"][0]["task_key"], "publish");
    }

    #[tokio::test]
    async fn test_diagram_structure() {
        let artifacts = fixture_artifacts().await;
        let diagram = &artifacts.diagram;

        assert!(diagram.starts_with("```mermaid\ngraph TD\n"));
        assert!(diagram.ends_with("```"));
        assert!(diagram.contains("    subgraph etl\n"));
        assert!(diagram.contains("    subgraph reporting\n"));
        assert!(diagram.contains("        etl_extract --> etl_transform\n"));
        assert!(diagram.contains("        etl_transform --> etl_load\n"));

        // cluster node uses the extractor-captured block span
        assert!(diagram.contains("    cluster_shared[shared 1-7]\n"));

        // cluster x task cross-product: 1 cluster, 4 tasks
        let uses = diagram.matches("-->|uses|").count();
        assert_eq!(uses, 4);
        assert!(diagram.contains("    cluster_shared -->|uses| reporting_publish"));
    }

    #[tokio::test]
    async fn test_task_labels_carry_line_ranges() {
        let artifacts = fixture_artifacts().await;
        // task spans come from the position index built off block spans
        assert!(artifacts.diagram.contains("etl_extract[extract 12-14]"));
        assert!(artifacts.diagram.contains("reporting_publish[publish 30-32]"));
    }
}

mod cli_tests {
    use super::*;
    use assert_cmd::Command;
    use predicates::prelude::*;

    #[test]
    fn test_render_mermaid_to_stdout() {
        let mut cmd = Command::cargo_bin("brickmap").unwrap();
        cmd.arg("render")
            .arg(fixtures_path().join("databricks/main.tf"))
            .assert()
            .success()
            .stdout(predicate::str::contains("graph TD"))
            .stdout(predicate::str::contains("etl_extract --> etl_transform"));
    }

    #[test]
    fn test_render_json_to_stdout() {
        let mut cmd = Command::cargo_bin("brickmap").unwrap();
        cmd.arg("render")
            .arg(fixtures_path().join("databricks/main.tf"))
            .arg("--format")
            .arg("json")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"jobs\""))
            .stdout(predicate::str::contains("\"cluster_name\": \"shared-autoscaling\""));
    }

    #[test]
    fn test_scan_writes_artifacts() {
        let out_dir = tempfile::tempdir().unwrap();

        let mut cmd = Command::cargo_bin("brickmap").unwrap();
        cmd.arg("scan")
            .arg(fixtures_path().join("databricks"))
            .arg("--output-dir")
            .arg(out_dir.path())
            .assert()
            .success();

        assert!(out_dir.path().join("simplified_main.tf.json").exists());
        assert!(out_dir.path().join("diagram_main.tf.md").exists());

        let json =
            std::fs::read_to_string(out_dir.path().join("simplified_main.tf.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["jobs"]["etl"].is_array());
    }

    #[test]
    fn test_scan_reports_partial_failure() {
        let out_dir = tempfile::tempdir().unwrap();

        let mut cmd = Command::cargo_bin("brickmap").unwrap();
        cmd.arg("scan")
            .arg(fixtures_path().join("mixed"))
            .arg("--output-dir")
            .arg(out_dir.path())
            .arg("--continue-on-error")
            .assert()
            .code(2);

        // the good file still rendered
        assert!(out_dir.path().join("diagram_good.tf.md").exists());
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("brickmap.yaml");
        std::fs::write(&config_path, "scan:\n  max_depth: 0\n").unwrap();

        let mut cmd = Command::cargo_bin("brickmap").unwrap();
        cmd.arg("validate")
            .arg(&config_path)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Configuration error"));
    }
}
