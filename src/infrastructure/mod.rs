//! Infrastructure layer - Process-level concerns
//!
//! This layer contains:
//! - Configuration loading (config)
//!
//! The library operations never read the environment; only the binary does.

pub mod config;

pub use config::Config;
