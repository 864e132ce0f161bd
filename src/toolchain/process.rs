use super::{ImageBuild, Toolchain};
use crate::config::StackhutConfig;
use crate::error::{BuildError, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Runs the real executables with inherited stdio
#[derive(Debug, Clone)]
pub struct ProcessToolchain {
    docker: String,
    git: String,
    contract_compiler: String,
}

impl ProcessToolchain {
    pub fn new(
        docker: impl Into<String>,
        git: impl Into<String>,
        contract_compiler: impl Into<String>,
    ) -> Self {
        Self {
            docker: docker.into(),
            git: git.into(),
            contract_compiler: contract_compiler.into(),
        }
    }

    pub fn from_config(config: &StackhutConfig) -> Self {
        Self::new(
            &config.docker_bin,
            &config.git_bin,
            &config.contract_compiler_bin,
        )
    }

    fn run(&self, mut cmd: Command) -> Result<()> {
        let tool = cmd.get_program().to_string_lossy().into_owned();
        debug!("Running {:?}", cmd);

        let status = cmd.status().map_err(|e| BuildError::ExternalProcess {
            tool: tool.clone(),
            reason: format!("failed to start: {}", e),
        })?;

        if !status.success() {
            return Err(BuildError::ExternalProcess {
                tool,
                reason: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}

impl Toolchain for ProcessToolchain {
    fn build(&self, request: &ImageBuild) -> Result<()> {
        let mut cmd = Command::new(&self.docker);
        cmd.arg("build");
        if let Some(dockerfile) = &request.dockerfile {
            cmd.arg("-f").arg(dockerfile);
        }
        cmd.args(["-t", request.tag.as_str(), "--rm"]).arg(&request.context_dir);
        self.run(cmd)
    }

    fn push(&self, tag: &str) -> Result<()> {
        let mut cmd = Command::new(&self.docker);
        cmd.args(["push", tag]);
        self.run(cmd)
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.git);
        cmd.args(["clone", url]).arg(dest);
        self.run(cmd)
    }

    fn compile_contract(&self, output: &Path, idl: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.contract_compiler);
        cmd.arg("-j").arg(output).arg(idl);
        self.run(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_external_process_error() {
        let tools = ProcessToolchain::new("stackhut-no-such-docker", "git", "barrister");
        match tools.push("stackhut/fedora:latest") {
            Err(BuildError::ExternalProcess { tool, reason }) => {
                assert_eq!(tool, "stackhut-no-such-docker");
                assert!(reason.starts_with("failed to start"));
            }
            other => panic!("Expected ExternalProcess error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_external_process_error() {
        let tools = ProcessToolchain::new("false", "false", "false");
        let result = tools.build(&ImageBuild {
            context_dir: ".".into(),
            dockerfile: None,
            tag: "stackhut/alpine:latest".to_string(),
        });
        match result {
            Err(BuildError::ExternalProcess { tool, reason }) => {
                assert_eq!(tool, "false");
                assert!(reason.starts_with("exited with"));
            }
            other => panic!("Expected ExternalProcess error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_exit() {
        let tools = ProcessToolchain::new("true", "true", "true");
        assert!(tools.push("stackhut/alpine:latest").is_ok());
        assert!(tools
            .compile_contract(Path::new("service.json"), Path::new("service.idl"))
            .is_ok());
    }
}
