//! Command implementations

pub mod config;
pub mod run;
pub mod schedule;

use anyhow::{Context, Result};
use camino::Utf8Path;
use rebound_core::{ConfigLoader, RetryConfig};

/// Load the retry configuration from an explicit file or the default location
pub(crate) fn load_config(path: Option<&Utf8Path>) -> Result<RetryConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::with_file(path),
        None => ConfigLoader::new()?,
    };

    loader
        .load()
        .with_context(|| format!("Failed to load retry configuration from {}", loader.config_file()))
}
