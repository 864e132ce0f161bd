//! Service build integration tests
//!
//! Drives a project through manifest loading, descriptor resolution and
//! the service build flow with a recording toolchain.

use stackhut::service::{CONTRACT_FILE, HUTFILE, STAGING_DIR, VENDOR_DIR};
use stackhut::template::TeraRenderer;
use stackhut::toolchain::{MockToolchain, ToolCall, ToolKind};
use stackhut::{BuildError, Catalog, Manifest, ServiceBuild, ServiceDescriptor};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const APP_REPO: &str = "git@example.com:stackhut/app.git";

fn write_project(dir: &Path, baseos: &str, stack: &str, files: &[&str]) {
    let mut hutfile = format!(
        "name: WeatherService\nauthor: Alice\ncontact: alice@example.com\n\
         description: Reports the weather\nbaseos: {}\nstack: {}\n",
        baseos, stack
    );
    if !files.is_empty() {
        hutfile.push_str("files:\n");
        for file in files {
            hutfile.push_str(&format!("  - {}\n", file));
            fs::write(dir.join(file), "").unwrap();
        }
    }
    fs::write(dir.join(HUTFILE), hutfile).unwrap();
}

fn service_build(tools: Arc<MockToolchain>) -> ServiceBuild {
    ServiceBuild::new(
        Arc::new(TeraRenderer::embedded().unwrap()),
        tools,
        "stackhut",
        APP_REPO,
    )
}

#[test]
fn test_python_service_builds_and_pushes() {
    let project = TempDir::new().unwrap();
    write_project(project.path(), "fedora", "python", &["util.py", "requirements.txt"]);
    let tools = Arc::new(MockToolchain::new());
    let catalog = Catalog::with_defaults().unwrap();

    let manifest = Manifest::load(project.path()).unwrap();
    let service = ServiceDescriptor::from_manifest(&manifest, &catalog).unwrap();
    let tag = service_build(tools.clone())
        .run(&service, project.path(), true)
        .unwrap();

    assert_eq!(tag.to_string(), "alice/weatherservice:latest");
    assert_eq!(
        tools.kinds(),
        vec![ToolKind::Compile, ToolKind::Clone, ToolKind::Build, ToolKind::Push]
    );

    let calls = tools.calls();
    match &calls[2] {
        ToolCall::Build { request, .. } => {
            assert_eq!(request.context_dir, project.path());
            assert_eq!(
                request.dockerfile.as_deref(),
                Some(project.path().join(STAGING_DIR).join("Dockerfile").as_path())
            );
        }
        other => panic!("expected image build, got {:?}", other),
    }
    assert_eq!(
        calls[3],
        ToolCall::Push {
            tag: "alice/weatherservice:latest".to_string()
        }
    );

    assert!(project.path().join(CONTRACT_FILE).is_file());
    assert!(!project.path().join(STAGING_DIR).exists());
    assert!(!project.path().join(VENDOR_DIR).exists());
}

#[test]
fn test_nodejs_service_on_alpine() {
    let project = TempDir::new().unwrap();
    write_project(project.path(), "alpine", "node", &[]);
    let tools = Arc::new(MockToolchain::new());
    let catalog = Catalog::with_defaults().unwrap();

    let manifest = Manifest::load(project.path()).unwrap();
    let service = ServiceDescriptor::from_manifest(&manifest, &catalog).unwrap();

    assert_eq!(service.from_image(), "alpine-nodejs");
    assert_eq!(service.install_deps(), None);

    service_build(tools.clone())
        .run(&service, project.path(), false)
        .unwrap();
    assert_eq!(tools.built_tags(), vec!["alice/weatherservice:latest"]);
    assert!(!tools.kinds().contains(&ToolKind::Push));
}

#[test]
fn test_unsupported_service_pair_is_rejected() {
    let project = TempDir::new().unwrap();
    write_project(project.path(), "fedora", "nodejs", &[]);
    let catalog = Catalog::with_defaults().unwrap();

    let manifest = Manifest::load(project.path()).unwrap();
    let result = ServiceDescriptor::from_manifest(&manifest, &catalog);

    assert!(matches!(
        result,
        Err(BuildError::UnsupportedCombination { .. })
    ));
}

#[test]
fn test_failed_image_build_leaves_project_clean() {
    let project = TempDir::new().unwrap();
    write_project(project.path(), "alpine", "python", &[]);
    let tools = Arc::new(MockToolchain::new());
    tools.fail_on(ToolKind::Build);
    let catalog = Catalog::with_defaults().unwrap();

    let manifest = Manifest::load(project.path()).unwrap();
    let service = ServiceDescriptor::from_manifest(&manifest, &catalog).unwrap();
    let err = service_build(tools.clone())
        .run(&service, project.path(), true)
        .unwrap_err();

    assert!(matches!(err, BuildError::ExternalProcess { .. }));
    assert!(!tools.kinds().contains(&ToolKind::Push));
    assert!(!project.path().join(STAGING_DIR).exists());
    assert!(!project.path().join(VENDOR_DIR).exists());
    assert!(project.path().join(HUTFILE).exists());
}
