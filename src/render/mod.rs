//! Artifact rendering module.
//!
//! Two artifacts are produced per configuration tree:
//! - **JSON**: the simplified job/cluster summary
//! - **Mermaid**: the dependency diagram document
//!
//! # Example
//!
//! ```rust,no_run
//! use brickmap::render::Renderer;
//! use brickmap::types::ArtifactFormat;
//! use brickmap::Config;
//!
//! let config = Config::default();
//! let renderer = Renderer::new(&config);
//!
//! // let json = renderer.render(&artifacts, ArtifactFormat::Json)?;
//! // let diagram = renderer.render(&artifacts, ArtifactFormat::Mermaid)?;
//! ```

pub mod json;
pub mod mermaid;
mod text;

pub use text::TextReporter;

use crate::config::Config;
use crate::error::Result;
use crate::types::{ArtifactFormat, Artifacts};

/// Renders one of the two artifacts to a string.
pub struct Renderer {
    config: Config,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Render the requested artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render(&self, artifacts: &Artifacts, format: ArtifactFormat) -> Result<String> {
        match format {
            ArtifactFormat::Json => {
                json::to_json_string(&artifacts.summary, self.config.output.pretty)
            }
            ArtifactFormat::Mermaid => Ok(artifacts.diagram.clone()),
        }
    }
}
