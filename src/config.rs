//! Configuration management for stackhut
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `STACKHUT_NAMESPACE`: Registry namespace for base and stack images - default: "stackhut"
//! - `STACKHUT_DOCKER`: Image build/push executable - default: "docker"
//! - `STACKHUT_GIT`: Source fetch executable - default: "git"
//! - `STACKHUT_CONTRACT_COMPILER`: Interface-contract compiler - default: "barrister"
//! - `STACKHUT_APP_REPO`: Repository vendored into service images -
//!   default: "git@github.com:StackHut/stackhut-app.git"
//! - `STACKHUT_TEMPLATE_DIR`: Directory overriding the embedded templates - default: unset
//! - `STACKHUT_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use stackhut::StackhutConfig;
//!
//! let config = StackhutConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_NAMESPACE: &str = "stackhut";
const DEFAULT_DOCKER_BIN: &str = "docker";
const DEFAULT_GIT_BIN: &str = "git";
const DEFAULT_CONTRACT_COMPILER: &str = "barrister";
const DEFAULT_APP_REPO: &str = "git@github.com:StackHut/stackhut-app.git";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackhutConfig {
    /// Namespace prefixed to base and stack image tags
    pub namespace: String,

    pub docker_bin: String,

    pub git_bin: String,

    pub contract_compiler_bin: String,

    /// Support app cloned into every service image
    pub app_repo: String,

    pub template_dir: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for StackhutConfig {
    /// Loads from STACKHUT_* environment variables, falling back to defaults
    fn default() -> Self {
        let var_or = |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.to_string());

        Self {
            namespace: var_or("STACKHUT_NAMESPACE", DEFAULT_NAMESPACE),
            docker_bin: var_or("STACKHUT_DOCKER", DEFAULT_DOCKER_BIN),
            git_bin: var_or("STACKHUT_GIT", DEFAULT_GIT_BIN),
            contract_compiler_bin: var_or("STACKHUT_CONTRACT_COMPILER", DEFAULT_CONTRACT_COMPILER),
            app_repo: var_or("STACKHUT_APP_REPO", DEFAULT_APP_REPO),
            template_dir: env::var("STACKHUT_TEMPLATE_DIR").ok().map(PathBuf::from),
            log_level: var_or("STACKHUT_LOG_LEVEL", DEFAULT_LOG_LEVEL).to_lowercase(),
        }
    }
}

impl StackhutConfig {
    /// Checks that the namespace is a valid image path component, that
    /// no executable is blank and that the log level is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ns_ok = !self.namespace.is_empty()
            && self
                .namespace
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._-".contains(c));
        if !ns_ok {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid namespace '{}': use lowercase letters, digits, '.', '_' or '-'",
                self.namespace
            )));
        }

        for (field, value) in [
            ("docker executable", &self.docker_bin),
            ("git executable", &self.git_bin),
            ("contract compiler", &self.contract_compiler_bin),
            ("app repository", &self.app_repo),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

impl fmt::Display for StackhutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stackhut Configuration:")?;
        writeln!(f, "  Namespace: {}", self.namespace)?;
        writeln!(f, "  Docker: {}", self.docker_bin)?;
        writeln!(f, "  Git: {}", self.git_bin)?;
        writeln!(f, "  Contract Compiler: {}", self.contract_compiler_bin)?;
        writeln!(f, "  App Repository: {}", self.app_repo)?;
        if let Some(ref dir) = self.template_dir {
            writeln!(f, "  Template Dir: {}", dir.display())?;
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
