//! Wellpath Configuration Module
//!
//! Per-project configuration loaded from TOML: alarm limits, VS azimuth,
//! bit projection settings and engine constants.
//!
//! ## Loading Order
//!
//! 1. `WELLPATH_CONFIG` environment variable (path to TOML file)
//! 2. `wellpath.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The library itself never reads the global; callers pass a config (or
//! the `AnalysisInputs` built from it) explicitly. Binaries call
//! `config::init()` once at startup, then `config::get()`:
//!
//! ```ignore
//! config::init(WellpathConfig::load());
//! let limits = config::get().limits;
//! ```

mod well_config;
pub mod defaults;
pub mod validation;

pub use well_config::*;

use std::sync::OnceLock;

/// Global configuration, initialized once at startup.
static WELLPATH_CONFIG: OnceLock<WellpathConfig> = OnceLock::new();

/// Initialize the global configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: WellpathConfig) {
    if WELLPATH_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global configuration.
///
/// Falls back to built-in defaults if `init()` was never called.
pub fn get() -> &'static WellpathConfig {
    WELLPATH_CONFIG.get_or_init(WellpathConfig::default)
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    WELLPATH_CONFIG.get().is_some()
}
