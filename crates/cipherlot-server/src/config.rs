use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variables consulted for the data root, highest priority first.
pub const DATA_ROOT_ENV: &[&str] = &["DATA_ROOT", "DATA_DIR"];

/// Node configuration.
///
/// Loaded from an optional TOML file, then overridden by environment, then by
/// command-line flags. Missing file keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding `blobs/`, `manifests/` and `feeds/`.
    pub data_root: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            data_root: PathBuf::from("./data"),
            max_body_bytes: cipherlot_protocol::MAX_BODY_SIZE,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Load a TOML config file.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// `DATA_ROOT` wins over `DATA_DIR`; empty values are ignored.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let root = DATA_ROOT_ENV
            .iter()
            .filter_map(|key| lookup(key))
            .find(|value| !value.is_empty());
        if let Some(root) = root {
            self.data_root = PathBuf::from(root);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(c.data_root, PathBuf::from("./data"));
        assert_eq!(c.max_body_bytes, 64 * 1024 * 1024);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml(r#"data_root = "/var/lib/cipherlot""#).unwrap();
        assert_eq!(c.data_root, PathBuf::from("/var/lib/cipherlot"));
        assert_eq!(c.bind_addr, ServerConfig::default().bind_addr);
    }

    #[test]
    fn full_toml() {
        let c = ServerConfig::from_toml(
            r#"
            bind_addr = "127.0.0.1:9000"
            data_root = "/tmp/node"
            max_body_bytes = 1024
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
        assert_eq!(c.max_body_bytes, 1024);
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(
            ServerConfig::from_toml("bind_addr = 12"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ServerConfig::from_file(Path::new("/nonexistent/cipherlot.toml")).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn env_precedence() {
        let base = ServerConfig::default();
        let c = base
            .clone()
            .with_env_from(env(&[("DATA_ROOT", "/a"), ("DATA_DIR", "/b")]));
        assert_eq!(c.data_root, PathBuf::from("/a"));

        let c = base.clone().with_env_from(env(&[("DATA_DIR", "/b")]));
        assert_eq!(c.data_root, PathBuf::from("/b"));

        let c = base.clone().with_env_from(env(&[("DATA_ROOT", ""), ("DATA_DIR", "/b")]));
        assert_eq!(c.data_root, PathBuf::from("/b"));

        let c = base.with_env_from(env(&[]));
        assert_eq!(c.data_root, PathBuf::from("./data"));
    }
}
