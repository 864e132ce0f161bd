//! stackhut - container image builder for the StackHut platform
//!
//! This library builds the layered images StackHut services run on. A small
//! catalog of base operating systems and language stacks is combined through
//! a compatibility matrix, rendered into Dockerfiles and handed to the
//! container engine. Services then build on top of the matching stack image
//! from a `Hutfile.yaml` manifest.
//!
//! # Core Concepts
//!
//! - **Catalog**: the known base OSes, stacks and the total matrix saying
//!   which pairs are buildable and what each pair needs installed
//! - **Build pipeline**: stage, render, build and optionally push one image
//!   inside its own staging directory
//! - **Orchestrator**: the sweep over every base and every base/stack pair
//! - **Service build**: the per-project flow that stages the service
//!   Dockerfile, compiles its contract and vendors the runtime
//!
//! # Example Usage
//!
//! ```no_run
//! use stackhut::pipeline::{BuildOrchestrator, BuildPipeline};
//! use stackhut::template::TeraRenderer;
//! use stackhut::toolchain::ProcessToolchain;
//! use stackhut::{Catalog, StackhutConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = StackhutConfig::default();
//! let pipeline = BuildPipeline::new(
//!     Arc::new(TeraRenderer::embedded()?),
//!     Arc::new(ProcessToolchain::from_config(&config)),
//!     &config.namespace,
//! );
//! let report = BuildOrchestrator::new(Arc::new(Catalog::with_defaults()?), pipeline)
//!     .sweep(Path::new("stacks"), false)?;
//! println!("built {} images", report.built.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`catalog`]: base OS and stack definitions, compatibility matrix
//! - [`pipeline`]: image staging and the catalog sweep
//! - [`service`]: Hutfile manifests and the service image flow
//! - [`toolchain`]: external container, VCS and contract tools

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod service;
pub mod template;
pub mod toolchain;
pub mod util;

// Re-export key types for convenient access
pub use catalog::{BaseOs, BaseOsId, Catalog, Compatibility, CompatibilityMatrix, StackId, StackRuntime};
pub use config::{ConfigError, StackhutConfig};
pub use error::{BuildError, Result};
pub use service::{ImageTag, Manifest, ServiceBuild, ServiceDescriptor};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_stackhut() {
        assert_eq!(NAME, "stackhut");
    }
}
