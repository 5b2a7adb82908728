//! onboard.toml configuration parser.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below, and command-line flags override whatever the file says.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use onboard_state::StateStore;

/// File name used for the redb backend inside the data directory.
const REDB_FILE: &str = "catalog.redb";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OnboardConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON document per collection.
    Files,
    /// All collections in a single redb database.
    Redb,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Files,
            data_dir: PathBuf::from("./data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Environments written by `onboardd init` when the infrastructure
    /// collection does not exist yet.
    pub environments: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            environments: ["development", "staging", "production"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl OnboardConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: OnboardConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Read `path` if given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Open the configured store.
    pub fn open_store(&self) -> anyhow::Result<StateStore> {
        let dir = &self.storage.data_dir;
        let store = match self.storage.backend {
            Backend::Files => StateStore::open_dir(dir)?,
            Backend::Redb => {
                std::fs::create_dir_all(dir)?;
                StateStore::open_redb(&dir.join(REDB_FILE))?
            }
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_state::{ApplicationDocument, InfrastructureDocument};

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config: OnboardConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.storage.backend, Backend::Files);
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(
            config.catalog.environments,
            vec!["development", "staging", "production"]
        );
    }

    #[test]
    fn test_parse_full() {
        let toml_str = r#"
[server]
bind = "127.0.0.1"
port = 9100

[storage]
backend = "redb"
data_dir = "/var/lib/onboard"

[catalog]
environments = ["dev", "prod"]
"#;
        let config: OnboardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.storage.backend, Backend::Redb);
        assert_eq!(config.catalog.environments, vec!["dev", "prod"]);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result: Result<OnboardConfig, _> = toml::from_str("[storage]\nbackend = \"s3\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_open_store_for_each_backend() {
        for backend in [Backend::Files, Backend::Redb] {
            let dir = tempfile::tempdir().unwrap();
            let mut config = OnboardConfig::default();
            config.storage.backend = backend;
            config.storage.data_dir = dir.path().join("data");

            let store = config.open_store().unwrap();
            store.seed(&config.catalog.environments).unwrap();
            assert!(store.load::<ApplicationDocument>().unwrap().applications.is_empty());
            assert_eq!(
                store.load::<InfrastructureDocument>().unwrap().environment_names(),
                config.catalog.environments
            );
        }
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("onboard.toml");
        std::fs::write(&path, "[server]\nport = 8123\n").unwrap();

        let config = OnboardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8123);
        assert!(OnboardConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
