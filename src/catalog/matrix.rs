//! OS × stack compatibility matrix
//!
//! Every (base, stack) pair of the active catalog resolves to either the
//! setup commands a stack image needs on top of the base image, or an
//! explicit `Unsupported` marker. Completeness is checked when the matrix
//! is built, so an incomplete catalog never reaches the build stage.

use super::{BaseOs, BaseOsId, StackId};
use crate::error::{BuildError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    /// Extra setup commands for the stack image, possibly none
    Commands(Vec<String>),
    Unsupported,
}

impl Compatibility {
    pub fn commands(&self) -> Option<&[String]> {
        match self {
            Compatibility::Commands(cmds) => Some(cmds),
            Compatibility::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Compatibility::Commands(_))
    }
}

#[derive(Debug, Clone)]
pub struct CompatibilityMatrix {
    entries: BTreeMap<(BaseOsId, StackId), Compatibility>,
}

#[derive(Debug, Default)]
pub struct MatrixBuilder {
    entries: BTreeMap<(BaseOsId, StackId), Compatibility>,
    duplicates: Vec<(BaseOsId, StackId)>,
}

impl MatrixBuilder {
    /// Declares a pair. Declaring the same pair twice fails in `build`.
    pub fn declare(mut self, base: BaseOsId, stack: StackId, entry: Compatibility) -> Self {
        if self.entries.insert((base, stack), entry).is_some() {
            self.duplicates.push((base, stack));
        }
        self
    }

    /// Validates the declarations against the catalog cross-product.
    pub fn build(self, bases: &[BaseOsId], stacks: &[StackId]) -> Result<CompatibilityMatrix> {
        if let Some(&(base, stack)) = self.duplicates.first() {
            return Err(BuildError::DuplicateDeclaration { base, stack });
        }

        if let Some((base, stack)) = self
            .entries
            .keys()
            .find(|(b, s)| !bases.contains(b) || !stacks.contains(s))
        {
            return Err(BuildError::OutsideCatalog {
                base: *base,
                stack: *stack,
            });
        }

        let missing: Vec<_> = bases
            .iter()
            .flat_map(|base| stacks.iter().map(move |stack| (*base, *stack)))
            .filter(|pair| !self.entries.contains_key(pair))
            .collect();

        if !missing.is_empty() {
            return Err(BuildError::IncompleteMatrix(missing));
        }

        Ok(CompatibilityMatrix {
            entries: self.entries,
        })
    }
}

impl CompatibilityMatrix {
    pub fn builder() -> MatrixBuilder {
        MatrixBuilder::default()
    }

    /// Looks up a pair. Lookups never fall back to `Unsupported`.
    pub fn resolve(&self, base: BaseOsId, stack: StackId) -> Result<&Compatibility> {
        self.entries
            .get(&(base, stack))
            .ok_or(BuildError::UndeclaredCombination { base, stack })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shipped compatibility of a base with a stack.
///
/// The match is exhaustive, so adding a catalog variant fails to compile
/// until its pairs are declared here.
pub fn default_entry(base: &dyn BaseOs, stack: StackId) -> Compatibility {
    match (base.id(), stack) {
        // python3 ships with both base images
        (BaseOsId::Fedora, StackId::Python) => Compatibility::Commands(Vec::new()),
        (BaseOsId::Alpine, StackId::Python) => Compatibility::Commands(Vec::new()),
        (BaseOsId::Fedora, StackId::NodeJs) => Compatibility::Unsupported,
        (BaseOsId::Alpine, StackId::NodeJs) => {
            Compatibility::Commands(base.install_packages(&["iojs@testing"]))
        }
    }
}
