//! Brickmap CLI entry point.
//!
//! This binary provides the command-line interface for brickmap.

use brickmap::cli::{Cli, Commands};
use brickmap::render::{Renderer, TextReporter};
use brickmap::{Config, Scanner};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    // Run the appropriate command
    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            // Print error with full chain
            eprintln!("Error: {e}");

            // Print error chain (cause chain)
            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut i = 0;
                while let Some(cause) = source {
                    eprintln!("  {i}: {cause}");
                    source = cause.source();
                    i += 1;
                }
            }

            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // First try to use RUST_LOG from environment, otherwise use verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            // Filter string: brickmap at specified level, everything else at warn
            EnvFilter::new(format!("warn,brickmap={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // Load configuration
    tracing::debug!("Loading configuration");
    let mut config = load_config(&cli)?;
    tracing::debug!("Configuration loaded successfully");

    match cli.command {
        Commands::Scan(args) => {
            // CLI flags override config values
            if let Some(dir) = args.output_dir {
                config.output.dir = dir;
            }
            if args.continue_on_error {
                config.scan.continue_on_error = true;
            }
            if let Some(depth) = args.max_depth {
                config.scan.max_depth = depth;
            }
            config
                .scan
                .exclude_patterns
                .extend(args.exclude_patterns.iter().cloned());
            config.validate()?;

            let scanner = Scanner::new(config.clone());
            let result = scanner.scan_paths(&args.paths).await?;

            // Write artifacts for every rendered file
            let renderer = Renderer::new(&config);
            std::fs::create_dir_all(&config.output.dir)?;
            for report in &result.files {
                let Ok(artifacts) = &report.outcome else {
                    continue;
                };
                let file_name = report
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "unknown".to_string());

                let json_path = config.output.dir.join(format!("simplified_{file_name}.json"));
                let diagram_path = config.output.dir.join(format!("diagram_{file_name}.md"));

                let summary_json =
                    renderer.render(artifacts, brickmap::ArtifactFormat::Json)?;
                std::fs::write(&json_path, summary_json)?;
                std::fs::write(&diagram_path, &artifacts.diagram)?;

                if config.output.colored {
                    println!("{} {}", "✓".green(), json_path.display());
                    println!("{} {}", "✓".green(), diagram_path.display());
                } else {
                    println!("✓ {}", json_path.display());
                    println!("✓ {}", diagram_path.display());
                }
            }

            // Per-file summary table
            let reporter = TextReporter::new(&config);
            println!("{}", reporter.format(&result));

            let exit_code = if result.has_failures() { 2 } else { 0 };
            Ok(ExitCode::from(exit_code))
        }

        Commands::Render(args) => {
            let scanner = Scanner::new(config.clone());
            let artifacts = scanner.scan_file(&args.file).await?;

            let renderer = Renderer::new(&config);
            let rendered = renderer.render(&artifacts, args.format)?;

            if let Some(output_path) = args.output {
                std::fs::write(&output_path, &rendered)?;
                tracing::info!(path = %output_path.display(), "Artifact written");
            } else {
                println!("{rendered}");
            }

            Ok(ExitCode::from(0))
        }

        Commands::Init => {
            // Generate example configuration file
            let example_config = Config::example_yaml();
            let config_path = std::path::Path::new("brickmap.yaml");

            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, example_config)?;
            println!("Created example configuration: brickmap.yaml");
            Ok(ExitCode::from(0))
        }

        Commands::Validate(args) => {
            // Validate configuration file
            let config_content = std::fs::read_to_string(&args.config)?;
            match Config::from_yaml(&config_content) {
                Ok(_) => {
                    println!("Configuration is valid: {}", args.config.display());
                    Ok(ExitCode::from(0))
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    // Check for explicit config file
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        let content = std::fs::read_to_string(config_path)?;
        return Ok(Config::from_yaml(&content)?);
    }

    // Look for default config files
    let default_paths = ["brickmap.yaml", "brickmap.yml", ".brickmap.yaml"];
    tracing::debug!("Searching for default configuration files");
    for path in &default_paths {
        if std::path::Path::new(path).exists() {
            tracing::debug!(path = %path, "Found configuration file");
            let content = std::fs::read_to_string(path)?;
            return Ok(Config::from_yaml(&content)?);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}
