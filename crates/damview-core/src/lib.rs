//! Damview Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! Asset Service seam shared by the viewer, the API client, the server and the CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use config::{ClientConfig, ServerConfig};
pub use error::{AppError, AppResult, ErrorKind, ErrorMetadata, LogLevel};
pub use service::AssetService;
