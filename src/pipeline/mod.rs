//! Catalog image builds
//!
//! [`BuildPipeline`] is the shared stage/render/build/push/restore
//! procedure. Base and stack images plug into it through [`Buildable`],
//! and [`BuildOrchestrator`] sweeps the whole catalog.

pub mod context;
pub mod images;
pub mod orchestrator;
pub mod stage;

pub use context::BuildContext;
pub use images::{build_base, build_stack, BaseImage, StackImage, StackOutcome};
pub use orchestrator::{BuildOrchestrator, SweepReport};
pub use stage::{BuildPipeline, Buildable, StagedImage, DOCKERFILE};
