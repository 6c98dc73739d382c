//! Logging utilities.
//!
//! Engine code logs through the `log` facade. This module only wires the
//! `env_logger` backend once per process.

mod init;

pub use init::{init_logging, LoggingConfig};
