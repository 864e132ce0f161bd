//! Catalog of base operating systems and language stacks
//!
//! Bases and stacks are closed sets identified by [`BaseOsId`] and
//! [`StackId`]. The [`Catalog`] owns one descriptor per identifier and the
//! [`CompatibilityMatrix`] deciding how (or whether) each stack is layered
//! onto each base.

pub mod base_os;
mod id_enum_macro;
pub mod ids;
pub mod matrix;
pub mod registry;
pub mod stack;

pub use base_os::{AlpineBase, BaseOs, FedoraBase};
pub use ids::{BaseOsId, StackId};
pub use matrix::{Compatibility, CompatibilityMatrix, MatrixBuilder};
pub use registry::Catalog;
pub use stack::{NodeJsStack, PythonStack, StackRuntime};
