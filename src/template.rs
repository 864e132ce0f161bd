//! Build-description rendering
//!
//! The three Dockerfile templates ship inside the binary. A template
//! directory can replace them, in which case every `*.txt` file in it is
//! loaded under its file name.

use crate::error::{BuildError, Result};
use std::collections::HashMap;
use std::path::Path;
use tera::{Context, Tera, Value};
use tracing::debug;

pub const BASE_TEMPLATE: &str = "Dockerfile-base.txt";
pub const STACK_TEMPLATE: &str = "Dockerfile-stack.txt";
pub const SERVICE_TEMPLATE: &str = "Dockerfile-service.txt";

const EMBEDDED: &[(&str, &str)] = &[
    (BASE_TEMPLATE, include_str!("../templates/Dockerfile-base.txt")),
    (STACK_TEMPLATE, include_str!("../templates/Dockerfile-stack.txt")),
    (SERVICE_TEMPLATE, include_str!("../templates/Dockerfile-service.txt")),
];

pub trait TemplateRenderer {
    fn render(&self, name: &str, context: &Context) -> Result<String>;
}

pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    pub fn embedded() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(EMBEDDED.iter().copied())
            .map_err(|e| template_error("embedded templates", e))?;
        Ok(Self::with_filters(tera))
    }

    pub fn from_dir(dir: &Path) -> Result<Self> {
        let pattern = format!("{}/*.txt", dir.display());
        debug!("Loading templates from {}", pattern);
        let tera = Tera::new(&pattern).map_err(|e| template_error(&pattern, e))?;
        Ok(Self::with_filters(tera))
    }

    fn with_filters(mut tera: Tera) -> Self {
        tera.register_filter("dockerfile_quote", dockerfile_quote);
        Self { tera }
    }

    /// Embedded templates unless a directory override is given
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort();
        names
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(name, context)
            .map_err(|e| template_error(name, e))
    }
}

/// Escapes text for a double-quoted Dockerfile string. Line breaks become
/// spaces since a quoted value cannot span instruction lines.
fn dockerfile_quote(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("dockerfile_quote expects a string"))?;

    let mut quoted = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '"' | '$' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\r' | '\n' => quoted.push(' '),
            c => quoted.push(c),
        }
    }
    Ok(Value::String(quoted))
}

fn template_error(name: &str, err: tera::Error) -> BuildError {
    // tera keeps the useful detail in the source chain
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    BuildError::Template {
        name: name.to_string(),
        message,
    }
}
