//! Configuration file loading for copilot-recipes
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `COPILOT_RECIPES_*` environment variables (`__` separates sections)
//! 2. Project root: `./recipes.toml` or `./.recipes.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/copilot-recipes/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileClientConfig, FileConfig, FileFilesConfig, FileLoggingConfig,
    FileSessionConfig,
};
pub use loader::ConfigLoader;
