//! Plain text scan summary for the terminal.

use crate::config::Config;
use crate::types::ScanResult;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

/// Text reporter for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
        }
    }

    /// Format a per-file summary of a scan.
    #[must_use]
    pub fn format(&self, result: &ScanResult) -> String {
        let mut output = String::new();

        let title = format!("Brickmap v{}", env!("CARGO_PKG_VERSION"));
        if self.use_colors {
            output.push_str(&format!("\n{}\n", title.bright_white().bold()));
        } else {
            output.push_str(&format!("\n{title}\n"));
        }

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["File", "Jobs", "Clusters", "Tasks", "Status"]);

        for report in &result.files {
            match &report.outcome {
                Ok(artifacts) => {
                    table.add_row(vec![
                        report.path.display().to_string(),
                        artifacts.summary.jobs.len().to_string(),
                        artifacts.summary.clusters.len().to_string(),
                        artifacts.task_count().to_string(),
                        self.status_ok(),
                    ]);
                }
                Err(e) => {
                    table.add_row(vec![
                        report.path.display().to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        "-".to_string(),
                        self.status_failed(e),
                    ]);
                }
            }
        }

        output.push_str(&table.to_string());
        output.push('\n');

        let footer = format!(
            "{} file(s) rendered, {} failed",
            result.rendered(),
            result.failed()
        );
        if self.use_colors && result.has_failures() {
            output.push_str(&format!("{}\n", footer.yellow()));
        } else {
            output.push_str(&format!("{footer}\n"));
        }

        output
    }

    fn status_ok(&self) -> String {
        if self.use_colors {
            "✓ rendered".green().to_string()
        } else {
            "✓ rendered".to_string()
        }
    }

    fn status_failed(&self, error: &crate::error::BrickmapError) -> String {
        let status = format!("✗ {error}");
        if self.use_colors {
            status.red().to_string()
        } else {
            status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::json::Summary;
    use crate::types::{Artifacts, FileReport};
    use std::path::PathBuf;

    #[test]
    fn test_format_lists_files_and_counts() {
        let mut config = Config::default();
        config.output.colored = false;
        let reporter = TextReporter::new(&config);

        let result = ScanResult {
            files: vec![
                FileReport {
                    path: PathBuf::from("a/main.tf"),
                    outcome: Ok(Artifacts {
                        summary: Summary::default(),
                        diagram: String::new(),
                    }),
                },
                FileReport {
                    path: PathBuf::from("b/main.tf"),
                    outcome: Err(crate::err!(NoData {})),
                },
            ],
        };

        let text = reporter.format(&result);
        assert!(text.contains("Brickmap"));
        assert!(text.contains("a/main.tf"));
        assert!(text.contains("✓ rendered"));
        assert!(text.contains("✗"));
        assert!(text.contains("1 file(s) rendered, 1 failed"));
    }
}
