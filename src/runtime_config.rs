//! # Runtime Configuration Module
//!
//! Environment variable based settings for hosts that embed the router.
//!
//! ## Environment Variables
//!
//! ### `PATTERNROUTER_ROUTES`
//!
//! Path of the routes file (YAML, JSON or TOML, chosen by extension). Unset means
//! the router starts with no routes.
//!
//! ### `PATTERNROUTER_HOT_RELOAD`
//!
//! `true` / `1` to watch the routes file and rebuild routes when it changes.
//! Default: `false`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use patternrouter::{config::load_router, registry::RoutingContext, runtime_config::RouterSettings};
//!
//! let settings = RouterSettings::from_env();
//! let router = load_router(&settings, RoutingContext::default())?;
//! ```

use std::env;
use std::path::PathBuf;

/// Router settings loaded from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterSettings {
    pub routes_file: Option<PathBuf>,
    pub hot_reload: bool,
}

impl RouterSettings {
    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let routes_file = lookup("PATTERNROUTER_ROUTES")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let hot_reload = match lookup("PATTERNROUTER_HOT_RELOAD") {
            Some(val) => matches!(val.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            None => false,
        };
        RouterSettings {
            routes_file,
            hot_reload,
        }
    }
}
