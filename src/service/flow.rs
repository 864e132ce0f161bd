//! Service image build
//!
//! Paths are all rooted at the service project directory; the process
//! working directory is never changed here.

use super::{ImageTag, ServiceDescriptor};
use crate::error::{BuildError, Result};
use crate::pipeline::DOCKERFILE;
use crate::template::{TemplateRenderer, SERVICE_TEMPLATE};
use crate::toolchain::{ImageBuild, Toolchain};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Holds the rendered build description
pub const STAGING_DIR: &str = ".stackhut";
/// Vendored support app copied into the image
pub const VENDOR_DIR: &str = "stackhut";
pub const IDL_FILE: &str = "service.idl";
pub const CONTRACT_FILE: &str = "service.json";

pub struct ServiceBuild {
    renderer: Arc<dyn TemplateRenderer>,
    tools: Arc<dyn Toolchain>,
    namespace: String,
    app_repo: String,
}

impl ServiceBuild {
    pub fn new(
        renderer: Arc<dyn TemplateRenderer>,
        tools: Arc<dyn Toolchain>,
        namespace: impl Into<String>,
        app_repo: impl Into<String>,
    ) -> Self {
        Self {
            renderer,
            tools,
            namespace: namespace.into(),
            app_repo: app_repo.into(),
        }
    }

    /// Renders, compiles the contract, vendors the app, builds and
    /// optionally pushes. Staging and vendor trees are removed afterwards
    /// on every path; a cleanup error never replaces the build error.
    pub fn run(
        &self,
        service: &ServiceDescriptor<'_>,
        project_dir: &Path,
        push: bool,
    ) -> Result<ImageTag> {
        let result = self.run_steps(service, project_dir, push);
        let cleanup = self.cleanup(project_dir);

        match (result, cleanup) {
            (Ok(tag), Ok(())) => {
                info!("{} build complete", service.name);
                Ok(tag)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup_err)) => {
                warn!("Cleanup after failed build also failed: {}", cleanup_err);
                Err(e)
            }
        }
    }

    fn run_steps(
        &self,
        service: &ServiceDescriptor<'_>,
        project_dir: &Path,
        push: bool,
    ) -> Result<ImageTag> {
        let staging = project_dir.join(STAGING_DIR);
        fs::create_dir_all(&staging).map_err(|e| BuildError::filesystem(&staging, e))?;

        let context = service.template_context(&self.namespace);
        let rendered = self.renderer.render(SERVICE_TEMPLATE, &context)?;
        debug!("Rendered {}:\n{}", SERVICE_TEMPLATE, rendered);
        let dockerfile = staging.join(DOCKERFILE);
        fs::write(&dockerfile, rendered).map_err(|e| BuildError::filesystem(&dockerfile, e))?;

        self.tools.compile_contract(
            &project_dir.join(CONTRACT_FILE),
            &project_dir.join(IDL_FILE),
        )?;

        self.vendor_app(project_dir)?;

        let tag = service.image_tag();
        let tag_str = tag.to_string();
        debug!("Running image build for {}", tag_str);
        self.tools.build(&ImageBuild {
            context_dir: project_dir.to_path_buf(),
            dockerfile: Some(dockerfile),
            tag: tag_str.clone(),
        })?;

        if push {
            info!("Pushing image {}", tag_str);
            self.tools.push(&tag_str)?;
        }

        Ok(tag)
    }

    /// Fresh clone of the support app without its git metadata.
    ///
    /// A stale tree from an earlier run is removed first, and a partial
    /// tree is removed when the clone or strip fails.
    fn vendor_app(&self, project_dir: &Path) -> Result<()> {
        let dest = project_dir.join(VENDOR_DIR);
        remove_dir_if_exists(&dest)?;

        debug!("Copying stackhut app from {}", self.app_repo);
        let fetched = self
            .tools
            .clone_repo(&self.app_repo, &dest)
            .and_then(|()| remove_dir_if_exists(&dest.join(".git")));

        if let Err(e) = fetched {
            if let Err(cleanup_err) = remove_dir_if_exists(&dest) {
                warn!("Failed to remove partial {}: {}", dest.display(), cleanup_err);
            }
            return Err(e);
        }
        Ok(())
    }

    fn cleanup(&self, project_dir: &Path) -> Result<()> {
        let vendor = remove_dir_if_exists(&project_dir.join(VENDOR_DIR));
        let staging = remove_dir_if_exists(&project_dir.join(STAGING_DIR));
        vendor.and(staging)
    }
}

fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::filesystem(path, e)),
    }
}
