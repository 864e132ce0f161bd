use crate::catalog::{BaseOsId, StackId};
use crate::service::ManifestError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which catalog a lookup was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    BaseOs,
    Stack,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::BaseOs => write!(f, "base OS"),
            CatalogKind::Stack => write!(f, "stack"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BuildError {
    /// Pair explicitly declared unsupported in the compatibility matrix
    #[error("OS / stack combination {base}/{stack} is not supported")]
    UnsupportedCombination { base: BaseOsId, stack: StackId },

    /// Pair missing from the compatibility matrix (configuration error)
    #[error("OS / stack combination {base}/{stack} not implemented")]
    UndeclaredCombination { base: BaseOsId, stack: StackId },

    #[error("Compatibility matrix is incomplete, undeclared pairs: {}", format_pairs(.0))]
    IncompleteMatrix(Vec<(BaseOsId, StackId)>),

    #[error("Compatibility for {base}/{stack} declared more than once")]
    DuplicateDeclaration { base: BaseOsId, stack: StackId },

    #[error("{kind} '{name}' registered more than once")]
    DuplicateCatalogEntry { kind: CatalogKind, name: String },

    #[error("Compatibility declared for {base}/{stack}, which is outside the active catalog")]
    OutsideCatalog { base: BaseOsId, stack: StackId },

    #[error("Unknown {kind} '{name}'")]
    UnknownCatalogEntry { kind: CatalogKind, name: String },

    #[error("{tool} failed: {reason}")]
    ExternalProcess { tool: String, reason: String },

    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to render template {name}: {message}")]
    Template { name: String, message: String },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("{} image build(s) failed: {}", .failed.len(), .failed.join(", "))]
    SweepFailed { failed: Vec<String> },
}

impl BuildError {
    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Configuration errors abort a whole sweep instead of a single unit
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BuildError::UndeclaredCombination { .. }
                | BuildError::IncompleteMatrix(_)
                | BuildError::OutsideCatalog { .. }
                | BuildError::DuplicateDeclaration { .. }
                | BuildError::DuplicateCatalogEntry { .. }
                | BuildError::UnknownCatalogEntry { .. }
                | BuildError::Template { .. }
        )
    }
}

fn format_pairs(pairs: &[(BaseOsId, StackId)]) -> String {
    pairs
        .iter()
        .map(|(base, stack)| format!("{}/{}", base, stack))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, BuildError>;
