//! # Configuration System
//!
//! TOML configuration for winsnap.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `<config_dir>/winsnap/config.toml`
//! 3. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! [storage]
//! sessions_dir = "/home/me/.config/winsnap/sessions"
//!
//! [restore]
//! poll_interval_ms = 200
//! window_timeout_ms = 10000
//! restore_geometry = false
//!
//! [hyprland]
//! workspace_limit = 10
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use winsnap_core::config::WinsnapConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WinsnapConfig::load_hierarchy()?;
//!     let timeout = config.restore.window_timeout();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{HyprlandConfig, RestoreConfig, StorageConfig, WinsnapConfig};
pub use validation::validate_config;

impl WinsnapConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Load configuration from an explicit file, merged over the defaults.
    pub fn load_from(path: &std::path::Path) -> Result<Self, crate::errors::ConfigError> {
        loading::load_from_path(path)
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
