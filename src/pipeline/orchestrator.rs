use super::images::{build_base, build_stack, stack_image_name, StackOutcome};
use super::stage::BuildPipeline;
use crate::catalog::Catalog;
use crate::error::{BuildError, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Image names per outcome of a completed sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub built: Vec<String>,
    pub skipped: Vec<String>,
}

/// Builds every base image, then every supported (base, stack) pair.
///
/// A failing unit is logged and the sweep moves on to its siblings; the
/// sweep then fails with the names of every failed image. Configuration
/// errors stop the sweep immediately.
pub struct BuildOrchestrator {
    catalog: Arc<Catalog>,
    pipeline: BuildPipeline,
}

impl BuildOrchestrator {
    pub fn new(catalog: Arc<Catalog>, pipeline: BuildPipeline) -> Self {
        Self { catalog, pipeline }
    }

    pub fn sweep(&self, outdir: &Path, push: bool) -> Result<SweepReport> {
        let start = Instant::now();
        fs::create_dir_all(outdir).map_err(|e| BuildError::filesystem(outdir, e))?;
        info!("Building catalog images into {}", outdir.display());

        let mut report = SweepReport::default();
        let mut failed = Vec::new();

        for base in self.catalog.bases() {
            match build_base(&self.pipeline, base, outdir, push) {
                Ok(image) => report.built.push(image.image_name),
                Err(e) if e.is_configuration() => return Err(e),
                Err(e) => {
                    error!("Base image {} failed: {}", base.name(), e);
                    failed.push(base.name().to_string());
                }
            }
        }

        for base in self.catalog.bases() {
            for stack in self.catalog.stacks() {
                let image_name = stack_image_name(base, stack);
                match build_stack(&self.pipeline, self.catalog.matrix(), base, stack, outdir, push) {
                    Ok(StackOutcome::Built(image)) => report.built.push(image.image_name),
                    Ok(StackOutcome::Skipped) => report.skipped.push(image_name),
                    Err(e) if e.is_configuration() => return Err(e),
                    Err(e) => {
                        error!("Stack image {} failed: {}", image_name, e);
                        failed.push(image_name);
                    }
                }
            }
        }

        debug!("Sweep finished in {:.2?}", start.elapsed());

        if !failed.is_empty() {
            return Err(BuildError::SweepFailed { failed });
        }

        info!(
            "All base OS and stack images built{} ({} built, {} skipped)",
            if push { " and pushed" } else { "" },
            report.built.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}
