//! Run settings for the provisioning pipeline.
//!
//! All configuration is threaded explicitly through the pipeline instead of
//! being read ambiently, so every phase (and every test) can run against an
//! isolated cache root and stub executables. Resolution order for each value
//! is CLI flag, then environment variable, then built-in default.
//!
//! # Environment Variables
//!
//! - `SPROUT_CACHE_HOME`: cache root directory (default `~/.sprout`)
//! - `SPROUT_CATALOG_URL`: template catalog endpoint
//! - `SPROUT_NPM_REGISTRY`: npm registry mirror for acquisition and installs
//! - `SPROUT_NPM`: npm program name (stubbed in tests)
//! - `SPROUT_NODE`: node program name used for custom generators

use anyhow::Result;
use std::path::PathBuf;

use crate::constants::{DEFAULT_CATALOG_URL, DEFAULT_NPM_REGISTRY};
use crate::core::SproutError;

/// Resolved settings for a single pipeline run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root directory of the template package cache.
    pub cache_home: PathBuf,
    /// Catalog endpoint returning the template list.
    pub catalog_url: String,
    /// npm registry mirror passed to every npm invocation.
    pub npm_registry: String,
    /// npm program name or path.
    pub npm_program: String,
    /// node program name or path, used to run custom generators.
    pub node_program: String,
}

impl Settings {
    /// Resolve settings from optional flag overrides, the environment, and
    /// defaults.
    ///
    /// Fails with a configuration error when no cache home can be
    /// determined (no override, no env var, no detectable home directory).
    pub fn load(
        cache_home: Option<PathBuf>,
        catalog_url: Option<String>,
        npm_registry: Option<String>,
    ) -> Result<Self> {
        let cache_home = match cache_home {
            Some(path) => path,
            None => match std::env::var_os("SPROUT_CACHE_HOME") {
                Some(path) => PathBuf::from(path),
                None => dirs::home_dir()
                    .ok_or_else(|| SproutError::ConfigError {
                        message: "could not determine home directory for the template cache"
                            .to_string(),
                    })?
                    .join(".sprout"),
            },
        };

        let catalog_url = catalog_url
            .or_else(|| std::env::var("SPROUT_CATALOG_URL").ok())
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());

        let npm_registry = npm_registry
            .or_else(|| std::env::var("SPROUT_NPM_REGISTRY").ok())
            .unwrap_or_else(|| DEFAULT_NPM_REGISTRY.to_string());

        let npm_program = std::env::var("SPROUT_NPM").unwrap_or_else(|_| "npm".to_string());
        let node_program = std::env::var("SPROUT_NODE").unwrap_or_else(|_| "node".to_string());

        Ok(Self {
            cache_home,
            catalog_url,
            npm_registry,
            npm_program,
            node_program,
        })
    }
}
