//! External executables the builds delegate to
//!
//! Every call is synchronous and blocking. A tool that cannot be started
//! or exits non-zero surfaces as [`BuildError::ExternalProcess`].
//!
//! [`BuildError::ExternalProcess`]: crate::error::BuildError::ExternalProcess

mod mock;
mod process;

pub use mock::{MockToolchain, ToolCall, ToolKind};
pub use process::ProcessToolchain;

use crate::error::Result;
use std::path::{Path, PathBuf};

/// One image build request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuild {
    pub context_dir: PathBuf,
    /// Build-description file, when not `Dockerfile` inside the context
    pub dockerfile: Option<PathBuf>,
    pub tag: String,
}

pub trait Toolchain {
    fn build(&self, request: &ImageBuild) -> Result<()>;

    fn push(&self, tag: &str) -> Result<()>;

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// Compiles an interface definition into its JSON contract
    fn compile_contract(&self, output: &Path, idl: &Path) -> Result<()>;
}
