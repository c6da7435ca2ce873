//! bbrest core - foundation types shared by the REST client crate.
//!
//! This crate provides:
//! - Client configuration (server address, password, logging settings)
//! - The unified error type for every stage of the request pipeline
//! - Structured logging with tracing
//! - Wire-level constants (API prefix, content types, auth parameter)

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

// Re-export commonly used items at the crate root
pub use config::{AppConfig, ServerConfig};
pub use error::{BbError, BbResult};
pub use logging::init_logging;
