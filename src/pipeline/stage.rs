use super::context::BuildContext;
use crate::error::{BuildError, Result};
use crate::template::TemplateRenderer;
use crate::toolchain::{ImageBuild, Toolchain};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tera::Context;
use tracing::{debug, info};

/// File name of the rendered build description in a staging directory
pub const DOCKERFILE: &str = "Dockerfile";

/// Anything the pipeline can stage and build
pub trait Buildable {
    fn template_name(&self) -> &str;

    /// Template parameters; the pipeline adds `namespace`
    fn template_context(&self) -> Context;

    /// Staging directory name and image repository name
    fn image_name(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    pub image_name: String,
    pub tag: String,
    pub staging_dir: PathBuf,
    pub pushed: bool,
}

/// Stage, render, build, optionally push, restore
pub struct BuildPipeline {
    renderer: Arc<dyn TemplateRenderer>,
    tools: Arc<dyn Toolchain>,
    namespace: String,
}

impl BuildPipeline {
    pub fn new(
        renderer: Arc<dyn TemplateRenderer>,
        tools: Arc<dyn Toolchain>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            renderer,
            tools,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn tag_for(&self, image_name: &str) -> String {
        format!("{}/{}:latest", self.namespace, image_name)
    }

    /// Creates `outdir/<image>` if needed and builds inside it.
    ///
    /// The working directory is restored whether or not rendering or the
    /// external tools fail. The staging directory is left in place.
    pub fn run(&self, item: &dyn Buildable, outdir: &Path, push: bool) -> Result<StagedImage> {
        let image_name = item.image_name();
        let staging_dir = outdir.join(&image_name);
        fs::create_dir_all(&staging_dir).map_err(|e| BuildError::filesystem(&staging_dir, e))?;
        let staging_dir = staging_dir
            .canonicalize()
            .map_err(|e| BuildError::filesystem(&staging_dir, e))?;

        let tag = self.tag_for(&image_name);
        let _ctx = BuildContext::enter(&staging_dir)?;

        let mut context = item.template_context();
        context.insert("namespace", &self.namespace);
        let rendered = self.renderer.render(item.template_name(), &context)?;
        debug!("Rendered {} for {}:\n{}", item.template_name(), image_name, rendered);
        fs::write(DOCKERFILE, rendered)
            .map_err(|e| BuildError::filesystem(staging_dir.join(DOCKERFILE), e))?;

        debug!("Running image build for {}", tag);
        self.tools.build(&ImageBuild {
            context_dir: PathBuf::from("."),
            dockerfile: None,
            tag: tag.clone(),
        })?;

        if push {
            info!("Pushing {}", tag);
            self.tools.push(&tag)?;
        }

        Ok(StagedImage {
            image_name,
            tag,
            staging_dir,
            pushed: push,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TeraRenderer;
    use crate::toolchain::{MockToolchain, ToolCall, ToolKind};
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    struct Plain;

    impl Buildable for Plain {
        fn template_name(&self) -> &str {
            "plain.txt"
        }

        fn template_context(&self) -> Context {
            let mut context = Context::new();
            context.insert("greeting", "hello");
            context
        }

        fn image_name(&self) -> String {
            "plain".to_string()
        }
    }

    fn pipeline(tools: Arc<MockToolchain>) -> (BuildPipeline, TempDir) {
        let templates = tempfile::Builder::new().prefix("templates").tempdir().unwrap();
        fs::write(
            templates.path().join("plain.txt"),
            "FROM {{ namespace }}/scratch\n# {{ greeting }}\n",
        )
        .unwrap();
        let renderer = TeraRenderer::from_dir(templates.path()).unwrap();
        (BuildPipeline::new(Arc::new(renderer), tools, "stackhut"), templates)
    }

    #[test]
    #[serial]
    fn test_run_stages_renders_and_builds() {
        let tools = Arc::new(MockToolchain::new());
        let (pipeline, _templates) = pipeline(tools.clone());
        let out = TempDir::new().unwrap();
        let before = env::current_dir().unwrap();

        let staged = pipeline.run(&Plain, out.path(), false).unwrap();

        assert_eq!(staged.tag, "stackhut/plain:latest");
        assert!(!staged.pushed);
        let dockerfile = fs::read_to_string(staged.staging_dir.join(DOCKERFILE)).unwrap();
        assert_eq!(dockerfile, "FROM stackhut/scratch\n# hello\n");

        match &tools.calls()[..] {
            [ToolCall::Build { request, cwd }] => {
                assert_eq!(request.tag, "stackhut/plain:latest");
                assert_eq!(request.context_dir, PathBuf::from("."));
                assert_eq!(cwd, &staged.staging_dir);
            }
            other => panic!("Expected a single build, got {:?}", other),
        }
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_push_follows_build() {
        let tools = Arc::new(MockToolchain::new());
        let (pipeline, _templates) = pipeline(tools.clone());
        let out = TempDir::new().unwrap();

        let staged = pipeline.run(&Plain, out.path(), true).unwrap();

        assert!(staged.pushed);
        assert_eq!(tools.kinds(), vec![ToolKind::Build, ToolKind::Push]);
    }

    #[test]
    #[serial]
    fn test_rerun_reuses_staging_dir() {
        let tools = Arc::new(MockToolchain::new());
        let (pipeline, _templates) = pipeline(tools.clone());
        let out = TempDir::new().unwrap();

        let first = pipeline.run(&Plain, out.path(), false).unwrap();
        let second = pipeline.run(&Plain, out.path(), false).unwrap();

        assert_eq!(first.staging_dir, second.staging_dir);
        assert_eq!(tools.built_tags().len(), 2);
    }

    #[test]
    #[serial]
    fn test_build_failure_restores_context_and_skips_push() {
        let tools = Arc::new(MockToolchain::new());
        tools.fail_on(ToolKind::Build);
        let (pipeline, _templates) = pipeline(tools.clone());
        let out = TempDir::new().unwrap();
        let before = env::current_dir().unwrap();

        let result = pipeline.run(&Plain, out.path(), true);

        assert!(matches!(result, Err(BuildError::ExternalProcess { .. })));
        assert_eq!(tools.kinds(), vec![ToolKind::Build]);
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_render_failure_restores_context() {
        struct Broken;

        impl Buildable for Broken {
            fn template_name(&self) -> &str {
                "plain.txt"
            }

            fn template_context(&self) -> Context {
                Context::new()
            }

            fn image_name(&self) -> String {
                "broken".to_string()
            }
        }

        let tools = Arc::new(MockToolchain::new());
        let (pipeline, _templates) = pipeline(tools.clone());
        let out = TempDir::new().unwrap();
        let before = env::current_dir().unwrap();

        let result = pipeline.run(&Broken, out.path(), false);

        assert!(matches!(result, Err(BuildError::Template { .. })));
        assert!(tools.calls().is_empty());
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
