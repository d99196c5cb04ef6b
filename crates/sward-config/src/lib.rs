//! Configuration system for the Sward foliage demo and tools.
//!
//! Provides settings that persist to disk as RON files, with CLI overrides
//! via clap, hot-reload detection, and forward/backward compatible
//! serialization.

mod cli;
mod error;
mod settings;

pub use cli::CliArgs;
pub use error::ConfigError;
pub use settings::{DebugSettings, DemoSettings, FieldSettings, Settings, TerrainSettings};

use std::path::PathBuf;

/// Default configuration directory: the platform config dir plus `sward`,
/// falling back to the working directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("sward"))
        .unwrap_or_else(|| PathBuf::from("."))
}
