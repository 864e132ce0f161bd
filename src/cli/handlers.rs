use super::commands::{BuildArgs, StackbuildArgs};
use crate::catalog::Catalog;
use crate::config::StackhutConfig;
use crate::pipeline::{BuildOrchestrator, BuildPipeline};
use crate::service::{ImageTag, Manifest, ServiceBuild, ServiceDescriptor};
use crate::template::TeraRenderer;
use crate::toolchain::{ProcessToolchain, Toolchain};
use anyhow::{Context, Result};
use std::env;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub fn handle_stackbuild(args: &StackbuildArgs, config: &StackhutConfig) -> i32 {
    let tools = Arc::new(ProcessToolchain::from_config(config));
    exit_code(run_stackbuild(args, config, tools))
}

pub fn handle_build(args: &BuildArgs, config: &StackhutConfig) -> i32 {
    let tools = Arc::new(ProcessToolchain::from_config(config));
    let result = env::current_dir()
        .context("resolving current directory")
        .and_then(|dir| run_build(&dir, args.push, config, tools))
        .map(|tag| info!("Built {}", tag));
    exit_code(result)
}

pub fn run_stackbuild(
    args: &StackbuildArgs,
    config: &StackhutConfig,
    tools: Arc<dyn Toolchain>,
) -> Result<()> {
    config.validate()?;
    let catalog = Catalog::with_defaults().context("loading image catalog")?;
    let renderer =
        TeraRenderer::load(config.template_dir.as_deref()).context("loading templates")?;
    let pipeline = BuildPipeline::new(Arc::new(renderer), tools, &config.namespace);

    BuildOrchestrator::new(Arc::new(catalog), pipeline)
        .sweep(&args.outdir, args.push)
        .with_context(|| format!("building catalog images into {}", args.outdir.display()))?;
    Ok(())
}

pub fn run_build(
    project_dir: &Path,
    push: bool,
    config: &StackhutConfig,
    tools: Arc<dyn Toolchain>,
) -> Result<ImageTag> {
    config.validate()?;
    let manifest = Manifest::load(project_dir)?;
    let catalog = Catalog::with_defaults().context("loading image catalog")?;
    let service = ServiceDescriptor::from_manifest(&manifest, &catalog)
        .with_context(|| format!("resolving service {}", manifest.name))?;
    let renderer =
        TeraRenderer::load(config.template_dir.as_deref()).context("loading templates")?;

    let tag = ServiceBuild::new(
        Arc::new(renderer),
        tools,
        &config.namespace,
        &config.app_repo,
    )
    .run(&service, project_dir, push)
    .with_context(|| format!("building service {}", service.name))?;
    Ok(tag)
}

fn exit_code(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}
