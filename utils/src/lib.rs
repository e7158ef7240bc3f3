//! Shared utilities for Tickity check-in.

pub mod logging;

pub use logging::{init_logging, LogFormat};
