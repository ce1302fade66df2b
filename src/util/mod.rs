//! Utility modules for nwdi-sonar

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
