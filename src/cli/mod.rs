pub mod commands;
pub mod handlers;

pub use commands::{BuildArgs, CliArgs, Commands, StackbuildArgs};
pub use handlers::{handle_build, handle_stackbuild};
