//! Shared utilities for the election client.

pub mod logging;

pub use logging::{init_logging, LogFormat};
