#![allow(dead_code)]

pub mod temp_files {
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    /// Writes `content` to a fresh temporary file ending in `.{ext}`.
    ///
    /// The file is kept on disk; remove it with [`cleanup_temp_files`].
    pub fn create_temp_routes(content: &str, ext: &str) -> PathBuf {
        let mut file = tempfile::Builder::new()
            .prefix("patternrouter_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        keep(file)
    }

    pub fn create_temp_yaml(content: &str) -> PathBuf {
        create_temp_routes(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> PathBuf {
        create_temp_routes(content, "json")
    }

    pub fn create_temp_toml(content: &str) -> PathBuf {
        create_temp_routes(content, "toml")
    }

    fn keep(file: NamedTempFile) -> PathBuf {
        let (_, path) = file.keep().unwrap();
        path
    }

    /// Cleanup temporary files (best effort)
    pub fn cleanup_temp_files(paths: &[PathBuf]) {
        for path in paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

pub mod routes {
    use patternrouter::config::RouteConfiguration;
    use patternrouter::values::RouteValues;
    use serde_json::Value;

    /// Object literal as route values.
    pub fn values(value: Value) -> RouteValues {
        value.as_object().cloned().unwrap_or_default()
    }

    /// Named configuration entry with the given defaults.
    pub fn entry(name: &str, pattern: &str, defaults: Value) -> RouteConfiguration {
        RouteConfiguration {
            name: Some(name.to_string()),
            defaults: values(defaults),
            ..RouteConfiguration::new(pattern)
        }
    }
}
