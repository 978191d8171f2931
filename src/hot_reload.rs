//! # Hot Reload Module
//!
//! Watches a routes file and installs the new configuration in a running
//! [`Router`] when the file changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use patternrouter::hot_reload::watch_routes;
//! use std::sync::Arc;
//!
//! let router = Arc::new(load_router(&settings, context)?);
//! let watcher = watch_routes("Routes.yaml", Arc::clone(&router), |routes| {
//!     routes.dump_routes();
//! })?;
//! // Dropping the watcher stops watching.
//! ```
//!
//! ## Error Handling
//!
//! If the changed file cannot be read, parsed or built into routes, the error is
//! logged and the previous routes stay active.

use crate::config::load_routes_configuration;
use crate::router::{RouteSet, Router};
use crate::runtime_config::RouterSettings;
use anyhow::Context;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Watch `routes_path` and replace the routes of `router` whenever it changes.
///
/// `on_reload` receives every successfully installed route set. Keep the
/// returned watcher alive for as long as reloading should happen.
pub fn watch_routes<P, F>(
    routes_path: P,
    router: Arc<Router>,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&RouteSet) + Send + 'static,
{
    let path: PathBuf = routes_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                match reload(&watch_path, &router) {
                    Ok(route_set) => {
                        info!(
                            file = %watch_path.display(),
                            routes_count = route_set.len(),
                            generation = route_set.generation(),
                            "hot-reload: routes replaced"
                        );
                        on_reload(&route_set);
                    }
                    Err(e) => error!(
                        file = %watch_path.display(),
                        error = format!("{e:#}"),
                        "hot-reload: keeping previous routes"
                    ),
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Start [`watch_routes`] on the configured routes file when `settings` ask for hot reload.
///
/// Returns `Ok(None)` when hot reload is off or no routes file is configured.
pub fn watch_configured_routes<F>(
    settings: &RouterSettings,
    router: Arc<Router>,
    on_reload: F,
) -> notify::Result<Option<RecommendedWatcher>>
where
    F: FnMut(&RouteSet) + Send + 'static,
{
    match (&settings.routes_file, settings.hot_reload) {
        (Some(path), true) => watch_routes(path, router, on_reload).map(Some),
        _ => Ok(None),
    }
}

/// Load `path` and install it in `router`; leaves the router untouched on error.
pub fn reload(path: &Path, router: &Router) -> anyhow::Result<Arc<RouteSet>> {
    let routes = load_routes_configuration(path)?;
    router
        .replace_routes_configuration(routes)
        .with_context(|| format!("routes in {} are invalid", path.display()))
}
