//! Logging setup.
//!
//! The engine only emits through the `log` facade; `init_logging` installs
//! `env_logger` for binaries that want it.

mod init;

pub use init::{LoggingConfig, init_logging};
