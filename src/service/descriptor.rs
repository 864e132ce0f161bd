use super::Manifest;
use crate::catalog::{BaseOs, Catalog, Compatibility, StackRuntime};
use crate::error::{BuildError, Result};
use crate::pipeline::images::stack_image_name;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tera::Context;
use thiserror::Error;

pub const DEFAULT_VERSION: &str = "latest";

/// Final service image tag, `author/name:version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub author: String,
    pub name: String,
    pub version: String,
}

impl ImageTag {
    pub fn new(
        author: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.author, self.name, self.version)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid image tag '{0}', expected author/name:version")]
pub struct ParseImageTagError(String);

impl FromStr for ImageTag {
    type Err = ParseImageTagError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ParseImageTagError(s.to_string());
        let (author, rest) = s.split_once('/').ok_or_else(invalid)?;
        let (name, version) = rest.rsplit_once(':').ok_or_else(invalid)?;

        if [author, name, version].iter().any(|p| p.is_empty()) || name.contains('/') {
            return Err(invalid());
        }
        Ok(ImageTag::new(author, name, version))
    }
}

/// A service build request derived from its manifest
pub struct ServiceDescriptor<'a> {
    pub name: String,
    pub author: String,
    pub email: String,
    pub description: String,
    pub version: String,
    pub files: Vec<String>,
    pub base: &'a dyn BaseOs,
    pub stack: &'a dyn StackRuntime,
}

#[derive(Debug, Serialize)]
struct ServiceParams<'a> {
    name: &'a str,
    author: &'a str,
    contact: &'a str,
    description: &'a str,
    files: &'a [String],
    from_image: String,
    entrypoint: &'static str,
    install_deps: Option<String>,
}

impl<'a> ServiceDescriptor<'a> {
    /// Resolves the manifest's base and stack against the catalog.
    ///
    /// Unknown names fail without substituting a default, and a pair the
    /// matrix marks unsupported fails since there is no image to build on.
    pub fn from_manifest(manifest: &Manifest, catalog: &'a Catalog) -> Result<Self> {
        manifest.validate()?;
        let base = catalog.base(&manifest.baseos)?;
        let stack = catalog.stack(&manifest.stack)?;

        if let Compatibility::Unsupported = catalog.matrix().resolve(base.id(), stack.id())? {
            return Err(BuildError::UnsupportedCombination {
                base: base.id(),
                stack: stack.id(),
            });
        }

        Ok(Self {
            name: manifest.name.to_lowercase(),
            author: manifest.author.to_lowercase(),
            email: manifest.contact.clone(),
            description: manifest.description.clone(),
            version: DEFAULT_VERSION.to_string(),
            files: manifest.files.clone(),
            base,
            stack,
        })
    }

    pub fn from_image(&self) -> String {
        stack_image_name(self.base, self.stack)
    }

    pub fn image_tag(&self) -> ImageTag {
        ImageTag::new(&self.author, &self.name, &self.version)
    }

    /// Stack dependency install, when the service ships the dependency file
    pub fn install_deps(&self) -> Option<String> {
        let dep_file = self.stack.dependency_file();
        if self.files.iter().any(|f| f == dep_file) {
            self.stack.install_stack_deps()
        } else {
            None
        }
    }

    pub fn template_context(&self, namespace: &str) -> Context {
        let params = ServiceParams {
            name: &self.name,
            author: &self.author,
            contact: &self.email,
            description: &self.description,
            files: &self.files,
            from_image: self.from_image(),
            entrypoint: self.stack.entrypoint(),
            install_deps: self.install_deps(),
        };

        let mut context = Context::new();
        context.insert("namespace", namespace);
        context.insert("service", &params);
        context
    }
}
