use super::types::{RouteConfiguration, RoutesDocument};
use crate::registry::RoutingContext;
use crate::router::Router;
use crate::runtime_config::RouterSettings;
use anyhow::{bail, Context};
use std::path::Path;
use tracing::info;

/// Serialization format of a routes file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutesFormat {
    Yaml,
    Json,
    Toml,
}

impl RoutesFormat {
    /// Picks the format from the file extension; anything unknown is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => RoutesFormat::Json,
            Some("toml") => RoutesFormat::Toml,
            _ => RoutesFormat::Yaml,
        }
    }
}

/// Read a routes file.
///
/// The document is either a bare list of route entries, or a map whose `routes`
/// key holds that list (the only shape TOML allows).
pub fn load_routes_configuration<P: AsRef<Path>>(
    file_path: P,
) -> anyhow::Result<Vec<RouteConfiguration>> {
    let path = file_path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read routes file {}", path.display()))?;
    let routes = parse_routes_configuration(&content, RoutesFormat::from_path(path))
        .with_context(|| format!("failed to parse routes file {}", path.display()))?;
    info!(
        file = %path.display(),
        routes_count = routes.len(),
        "Routes configuration loaded"
    );
    Ok(routes)
}

/// Parse routes from an in-memory document.
pub fn parse_routes_configuration(
    content: &str,
    format: RoutesFormat,
) -> anyhow::Result<Vec<RouteConfiguration>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: serde_json::Value = match format {
        RoutesFormat::Yaml => serde_yaml::from_str(content)?,
        RoutesFormat::Json => serde_json::from_str(content)?,
        RoutesFormat::Toml => toml::from_str(content)?,
    };

    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Array(_) => Ok(serde_json::from_value(value)?),
        serde_json::Value::Object(ref map) if map.contains_key("routes") => {
            let document: RoutesDocument = serde_json::from_value(value)?;
            Ok(document.routes)
        }
        _ => bail!("expected a list of routes or a map with a \"routes\" list"),
    }
}

/// Build a [`Router`] from [`RouterSettings`], loading the routes file if one is configured.
///
/// The route set is built before returning so configuration errors surface here.
pub fn load_router(settings: &RouterSettings, context: RoutingContext) -> anyhow::Result<Router> {
    let routes = match &settings.routes_file {
        Some(path) => load_routes_configuration(path)?,
        None => Vec::new(),
    };
    let router = Router::with_context(routes, context);
    router
        .routes()
        .context("routes configuration is invalid")?;
    Ok(router)
}
