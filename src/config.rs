// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{MirrorError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub landing_url: String,
    pub list_page_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Object store target, e.g. `file:///var/lib/release-mirror` or `s3://bucket/prefix`.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub repositories: Vec<RepositorySource>,
    pub releases_page_size: usize,
    pub poll_interval_secs: u64,
    pub artifact_extension: String,
    #[serde(default)]
    pub excluded_prefixes: Vec<String>,
    pub mirror_checksums: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositorySource {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub secret: Option<String>,
}

impl RepositorySource {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RELEASE_MIRROR")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| MirrorError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| MirrorError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "0.0.0.0:8080".to_string(),
                landing_url: "https://downloads.example.com".to_string(),
                list_page_limit: 500,
            },
            storage: StorageConfig {
                url: "file:///var/lib/release-mirror".to_string(),
            },
            mirror: MirrorConfig {
                repositories: vec![],
                releases_page_size: 100,
                poll_interval_secs: 3600,
                artifact_extension: "jar".to_string(),
                excluded_prefixes: vec!["pro-api".to_string()],
                mirror_checksums: true,
            },
            webhook: WebhookConfig { secret: None },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.bind_address.is_empty() {
            return Err(MirrorError::Config(
                "bind_address must not be empty".to_string(),
            ));
        }

        if self.server.list_page_limit == 0 || self.server.list_page_limit > 500 {
            return Err(MirrorError::Config(
                "list_page_limit must be between 1 and 500".to_string(),
            ));
        }

        if self.mirror.releases_page_size == 0 || self.mirror.releases_page_size > 100 {
            return Err(MirrorError::Config(
                "releases_page_size must be between 1 and 100".to_string(),
            ));
        }

        if self.mirror.artifact_extension.trim_start_matches('.').is_empty() {
            return Err(MirrorError::Config(
                "artifact_extension must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_page_size_bounds() {
        let mut config = Config::default_config();
        config.mirror.releases_page_size = 0;
        assert!(config.validate().is_err());

        config.mirror.releases_page_size = 101;
        assert!(config.validate().is_err());

        config.mirror.releases_page_size = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_list_limit_bounds() {
        let mut config = Config::default_config();
        config.server.list_page_limit = 501;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_repository_full_name() {
        let source = RepositorySource {
            owner: "acme".to_string(),
            repo: "widget".to_string(),
            token: None,
        };
        assert_eq!(source.full_name(), "acme/widget");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[server]
bind_address = "127.0.0.1:9090"
landing_url = "https://example.org"
list_page_limit = 100

[storage]
url = "memory:///"

[mirror]
releases_page_size = 10
poll_interval_secs = 0
artifact_extension = "jar"
mirror_checksums = false

[[mirror.repositories]]
owner = "acme"
repo = "widget"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:9090");
        assert_eq!(config.mirror.repositories.len(), 1);
        assert_eq!(config.mirror.repositories[0].full_name(), "acme/widget");
        assert!(config.webhook.secret.is_none());
        assert!(!config.mirror.mirror_checksums);
    }
}
