use super::stage::{BuildPipeline, Buildable, StagedImage};
use crate::catalog::{BaseOs, Compatibility, CompatibilityMatrix, StackRuntime};
use crate::error::Result;
use crate::template::{BASE_TEMPLATE, STACK_TEMPLATE};
use serde::Serialize;
use std::path::Path;
use tera::Context;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct BaseParams {
    name: &'static str,
    description: String,
    packages: Vec<&'static str>,
    setup_cmds: Vec<String>,
}

impl BaseParams {
    fn new(base: &dyn BaseOs) -> Self {
        Self {
            name: base.name(),
            description: base.description(),
            packages: base.base_packages().to_vec(),
            setup_cmds: base.setup_commands(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StackParams {
    name: &'static str,
    description: String,
    entrypoint: &'static str,
}

impl StackParams {
    fn new(stack: &dyn StackRuntime) -> Self {
        Self {
            name: stack.name(),
            description: stack.description(),
            entrypoint: stack.entrypoint(),
        }
    }
}

/// Base OS image, staged under the OS name
pub struct BaseImage<'a> {
    base: &'a dyn BaseOs,
}

impl<'a> BaseImage<'a> {
    pub fn new(base: &'a dyn BaseOs) -> Self {
        Self { base }
    }
}

impl Buildable for BaseImage<'_> {
    fn template_name(&self) -> &str {
        BASE_TEMPLATE
    }

    fn template_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("base", &BaseParams::new(self.base));
        context
    }

    fn image_name(&self) -> String {
        self.base.name().to_string()
    }
}

/// Stack layered onto a base image, staged under `<base>-<stack>`
pub struct StackImage<'a> {
    base: &'a dyn BaseOs,
    stack: &'a dyn StackRuntime,
    setup_cmds: &'a [String],
}

impl<'a> StackImage<'a> {
    pub fn new(base: &'a dyn BaseOs, stack: &'a dyn StackRuntime, setup_cmds: &'a [String]) -> Self {
        Self {
            base,
            stack,
            setup_cmds,
        }
    }
}

impl Buildable for StackImage<'_> {
    fn template_name(&self) -> &str {
        STACK_TEMPLATE
    }

    fn template_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("base", &BaseParams::new(self.base));
        context.insert("stack", &StackParams::new(self.stack));
        context.insert("stack_install_cmds", self.setup_cmds);
        context
    }

    fn image_name(&self) -> String {
        stack_image_name(self.base, self.stack)
    }
}

pub fn stack_image_name(base: &dyn BaseOs, stack: &dyn StackRuntime) -> String {
    format!("{}-{}", base.name(), stack.name())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackOutcome {
    Built(StagedImage),
    /// Pair declared unsupported; nothing was staged
    Skipped,
}

pub fn build_base(
    pipeline: &BuildPipeline,
    base: &dyn BaseOs,
    outdir: &Path,
    push: bool,
) -> Result<StagedImage> {
    info!("Building image for base {}", base.name());
    pipeline.run(&BaseImage::new(base), outdir, push)
}

/// Builds a stack image unless the matrix marks the pair unsupported.
///
/// An undeclared pair is returned as an error, never treated as a skip.
pub fn build_stack(
    pipeline: &BuildPipeline,
    matrix: &CompatibilityMatrix,
    base: &dyn BaseOs,
    stack: &dyn StackRuntime,
    outdir: &Path,
    push: bool,
) -> Result<StackOutcome> {
    match matrix.resolve(base.id(), stack.id())? {
        Compatibility::Unsupported => {
            warn!(
                "Skipping stack {} on base {}: combination not supported",
                stack.name(),
                base.name()
            );
            Ok(StackOutcome::Skipped)
        }
        Compatibility::Commands(cmds) => {
            info!(
                "Building image for base {} with stack {}",
                base.name(),
                stack.name()
            );
            let image = StackImage::new(base, stack, cmds);
            pipeline.run(&image, outdir, push).map(StackOutcome::Built)
        }
    }
}
