use super::base_os::capitalize;
use super::StackId;

/// Conventions of a language runtime stack
pub trait StackRuntime: Send + Sync {
    fn id(&self) -> StackId;

    /// File the service image runs on start
    fn entrypoint(&self) -> &'static str;

    /// Dependency list a service ships for `install_stack_deps`
    fn dependency_file(&self) -> &'static str;

    /// Stack-level dependency install run inside service images
    fn install_stack_deps(&self) -> Option<String>;

    fn name(&self) -> &'static str {
        self.id().name()
    }

    fn description(&self) -> String {
        format!("Support for language stack {}", capitalize(self.name()))
    }
}

pub struct PythonStack;

impl StackRuntime for PythonStack {
    fn id(&self) -> StackId {
        StackId::Python
    }

    fn entrypoint(&self) -> &'static str {
        "app.py"
    }

    fn dependency_file(&self) -> &'static str {
        "requirements.txt"
    }

    fn install_stack_deps(&self) -> Option<String> {
        Some("pip3 install --no-cache-dir --compile -r requirements.txt".to_string())
    }
}

pub struct NodeJsStack;

impl StackRuntime for NodeJsStack {
    fn id(&self) -> StackId {
        StackId::NodeJs
    }

    fn entrypoint(&self) -> &'static str {
        "app.js"
    }

    fn dependency_file(&self) -> &'static str {
        "package.json"
    }

    fn install_stack_deps(&self) -> Option<String> {
        Some("npm install --production".to_string())
    }
}
