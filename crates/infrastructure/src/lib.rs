//! Petstore Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the environment-backed
//! configuration loader.

pub mod adapters;
pub mod config;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::{ConfigError, EnvConfigLoader, EnvKey};
