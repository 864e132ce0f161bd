use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Manifest file read from the service project directory
pub const HUTFILE: &str = "Hutfile.yaml";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("No Hutfile.yaml found in {0}")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Invalid manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Manifest field '{0}' must not be empty")]
    EmptyField(&'static str),
    #[error("Manifest field '{field}' has invalid value '{value}': use letters, digits, '.', '_' or '-'")]
    InvalidImageComponent { field: &'static str, value: String },
    #[error("Invalid file entry '{0}': file names must not contain whitespace or quotes")]
    InvalidFile(String),
}

/// User-supplied service description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub author: String,
    pub contact: String,
    pub description: String,
    #[serde(default)]
    pub files: Vec<String>,
    pub baseos: String,
    pub stack: String,
}

impl Manifest {
    pub fn load(project_dir: &Path) -> Result<Self, ManifestError> {
        let path = project_dir.join(HUTFILE);
        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ManifestError::NotFound(project_dir.to_path_buf())
            } else {
                ManifestError::Read {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let manifest: Manifest =
            serde_yaml::from_str(&content).map_err(|source| ManifestError::Parse {
                path: path.clone(),
                source,
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        for (field, value) in [
            ("name", &self.name),
            ("author", &self.author),
            ("baseos", &self.baseos),
            ("stack", &self.stack),
        ] {
            if value.trim().is_empty() {
                return Err(ManifestError::EmptyField(field));
            }
        }

        // name and author become the image path `author/name`
        for (field, value) in [("name", &self.name), ("author", &self.author)] {
            if !is_image_component(&value.to_lowercase()) {
                return Err(ManifestError::InvalidImageComponent {
                    field,
                    value: value.clone(),
                });
            }
        }

        if let Some(file) = self
            .files
            .iter()
            .find(|f| f.is_empty() || f.chars().any(|c| c.is_whitespace() || c == '"'))
        {
            return Err(ManifestError::InvalidFile(file.clone()));
        }
        Ok(())
    }
}

fn is_image_component(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._-".contains(c))
}
