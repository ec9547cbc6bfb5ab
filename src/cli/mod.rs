//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `scan`: Process Terraform files and write both artifacts per file
//! - `render`: Render a single file's summary or diagram to stdout
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Process all .tf files under a directory
//! brickmap scan ./terraform
//!
//! # Custom output directory, keep going past broken files
//! brickmap scan ./terraform --output-dir out --continue-on-error
//!
//! # Print one artifact for one file
//! brickmap render ./terraform/main.tf --format mermaid
//!
//! # Initialize configuration
//! brickmap init
//!
//! # Validate configuration
//! brickmap validate brickmap.yaml
//! ```

use crate::types::ArtifactFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Brickmap - Databricks Terraform job/cluster structure extractor.
#[derive(Parser, Debug)]
#[command(
    name = "brickmap",
    author,
    version,
    about = "Databricks Terraform job/cluster structure extractor and dependency diagrammer",
    long_about = "Brickmap parses Terraform files describing Databricks jobs and clusters, \
                  correlates declarations with their source line ranges, and renders a \
                  simplified JSON summary plus a Mermaid dependency diagram per file."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "BRICKMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process Terraform files and write summary + diagram artifacts
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    /// Render a single file's artifact to stdout
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the scan command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Paths to scan (directories or .tf files)
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Directory to write artifacts into (overrides config)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Continue scanning even if some files fail to parse
    #[arg(long)]
    pub continue_on_error: bool,

    /// Maximum depth for recursive directory scanning
    #[arg(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Patterns to exclude from scanning (glob patterns)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,
}

/// Arguments for the render command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Terraform file to render
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Which artifact to render
    #[arg(short, long, default_value = "mermaid", value_enum)]
    pub format: ArtifactFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "brickmap.yaml")]
    pub config: PathBuf,
}
