//! Utility modules for stackhut

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
