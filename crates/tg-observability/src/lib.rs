//! # tg-observability
//!
//! Logging infrastructure for TrustGuard, built on `tracing` and
//! `tracing-subscriber`.

pub mod logging;

pub use logging::{init_logging, init_logging_with_config, LoggingConfig};
