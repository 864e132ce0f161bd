use super::matrix::default_entry;
use super::{
    AlpineBase, BaseOs, BaseOsId, CompatibilityMatrix, FedoraBase, NodeJsStack, PythonStack,
    StackId, StackRuntime,
};
use crate::error::{BuildError, CatalogKind, Result};
use std::sync::Arc;

/// Active bases, stacks and their validated compatibility matrix
pub struct Catalog {
    bases: Vec<Arc<dyn BaseOs>>,
    stacks: Vec<Arc<dyn StackRuntime>>,
    matrix: CompatibilityMatrix,
}

impl Catalog {
    /// Builds a catalog from explicit entries and matrix declarations.
    pub fn new(
        bases: Vec<Arc<dyn BaseOs>>,
        stacks: Vec<Arc<dyn StackRuntime>>,
        matrix: CompatibilityMatrix,
    ) -> Result<Self> {
        let base_ids: Vec<BaseOsId> = bases.iter().map(|b| b.id()).collect();
        let stack_ids: Vec<StackId> = stacks.iter().map(|s| s.id()).collect();
        if let Some(id) = first_repeat(&base_ids) {
            return Err(BuildError::DuplicateCatalogEntry {
                kind: CatalogKind::BaseOs,
                name: id.to_string(),
            });
        }
        if let Some(id) = first_repeat(&stack_ids) {
            return Err(BuildError::DuplicateCatalogEntry {
                kind: CatalogKind::Stack,
                name: id.to_string(),
            });
        }

        for base in &base_ids {
            for stack in &stack_ids {
                matrix.resolve(*base, *stack)?;
            }
        }

        Ok(Self {
            bases,
            stacks,
            matrix,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        let mut bases: Vec<Arc<dyn BaseOs>> = Vec::new();
        for id in BaseOsId::all_variants() {
            let base: Arc<dyn BaseOs> = match id {
                BaseOsId::Fedora => Arc::new(FedoraBase),
                BaseOsId::Alpine => Arc::new(AlpineBase),
            };
            bases.push(base);
        }

        let mut stacks: Vec<Arc<dyn StackRuntime>> = Vec::new();
        for id in StackId::all_variants() {
            let stack: Arc<dyn StackRuntime> = match id {
                StackId::Python => Arc::new(PythonStack),
                StackId::NodeJs => Arc::new(NodeJsStack),
            };
            stacks.push(stack);
        }

        let mut builder = CompatibilityMatrix::builder();
        for base in &bases {
            for stack in &stacks {
                let entry = default_entry(base.as_ref(), stack.id());
                builder = builder.declare(base.id(), stack.id(), entry);
            }
        }
        let matrix = builder.build(BaseOsId::all_variants(), StackId::all_variants())?;

        Self::new(bases, stacks, matrix)
    }

    pub fn bases(&self) -> impl Iterator<Item = &dyn BaseOs> {
        self.bases.iter().map(|b| b.as_ref())
    }

    pub fn stacks(&self) -> impl Iterator<Item = &dyn StackRuntime> {
        self.stacks.iter().map(|s| s.as_ref())
    }

    pub fn matrix(&self) -> &CompatibilityMatrix {
        &self.matrix
    }

    /// Looks up a base by name or alias; no default is substituted.
    pub fn base(&self, name: &str) -> Result<&dyn BaseOs> {
        BaseOsId::from_name(name)
            .and_then(|id| self.bases.iter().find(|b| b.id() == id))
            .map(|b| b.as_ref())
            .ok_or_else(|| BuildError::UnknownCatalogEntry {
                kind: CatalogKind::BaseOs,
                name: name.to_string(),
            })
    }

    pub fn stack(&self, name: &str) -> Result<&dyn StackRuntime> {
        StackId::from_name(name)
            .and_then(|id| self.stacks.iter().find(|s| s.id() == id))
            .map(|s| s.as_ref())
            .ok_or_else(|| BuildError::UnknownCatalogEntry {
                kind: CatalogKind::Stack,
                name: name.to_string(),
            })
    }
}

fn first_repeat<T: PartialEq>(ids: &[T]) -> Option<&T> {
    ids.iter()
        .enumerate()
        .find(|(i, id)| ids[..*i].contains(*id))
        .map(|(_, id)| id)
}
