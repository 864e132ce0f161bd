use super::{ImageBuild, Toolchain};
use crate::error::{BuildError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Build,
    Push,
    Clone,
    Compile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Build {
        request: ImageBuild,
        /// Working directory at the time of the call
        cwd: PathBuf,
    },
    Push {
        tag: String,
    },
    Clone {
        url: String,
        dest: PathBuf,
    },
    Compile {
        output: PathBuf,
        idl: PathBuf,
    },
}

impl ToolCall {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolCall::Build { .. } => ToolKind::Build,
            ToolCall::Push { .. } => ToolKind::Push,
            ToolCall::Clone { .. } => ToolKind::Clone,
            ToolCall::Compile { .. } => ToolKind::Compile,
        }
    }
}

/// Records invocations instead of running anything.
///
/// Clones create the destination with a `.git` directory and compiles
/// write the output file, so callers see the same filesystem effects as
/// with the real tools.
pub struct MockToolchain {
    calls: Mutex<Vec<ToolCall>>,
    failing: Mutex<HashSet<ToolKind>>,
}

impl MockToolchain {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Makes every later call of `kind` fail after being recorded
    pub fn fail_on(&self, kind: ToolKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<ToolKind> {
        self.calls.lock().unwrap().iter().map(|c| c.kind()).collect()
    }

    pub fn built_tags(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                ToolCall::Build { request, .. } => Some(request.tag.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ToolCall) -> Result<()> {
        let kind = call.kind();
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&kind) {
            return Err(BuildError::ExternalProcess {
                tool: format!("{:?}", kind).to_lowercase(),
                reason: "exited with exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolchain for MockToolchain {
    fn build(&self, request: &ImageBuild) -> Result<()> {
        let cwd = std::env::current_dir().map_err(|e| BuildError::filesystem(".", e))?;
        self.record(ToolCall::Build {
            request: request.clone(),
            cwd,
        })
    }

    fn push(&self, tag: &str) -> Result<()> {
        self.record(ToolCall::Push {
            tag: tag.to_string(),
        })
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let git_dir = dest.join(".git");
        fs::create_dir_all(&git_dir).map_err(|e| BuildError::filesystem(&git_dir, e))?;
        self.record(ToolCall::Clone {
            url: url.to_string(),
            dest: dest.to_path_buf(),
        })
    }

    fn compile_contract(&self, output: &Path, idl: &Path) -> Result<()> {
        self.record(ToolCall::Compile {
            output: output.to_path_buf(),
            idl: idl.to_path_buf(),
        })?;
        fs::write(output, "{}\n").map_err(|e| BuildError::filesystem(output, e))
    }
}
