//! Local-network file sharing server.
//!
//! This crate lists files in one or more configured directories and serves
//! them for download over HTTP. It can be used as a standalone binary or
//! embedded in another application.

pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod routes;
pub mod views;

use std::sync::Arc;

pub use config::Config;
pub use error::ShareError;
pub use registry::Registry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Registered shared directories, immutable after startup
    pub registry: Arc<Registry>,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState with the given registry and default config.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(Config::default()),
        }
    }

    /// Create a new AppState with the given registry and config.
    pub fn with_config(registry: Registry, config: Config) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }
}
