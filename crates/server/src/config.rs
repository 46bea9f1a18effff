use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
type Result<T> = anyhow::Result<T>;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default)]
    pub admin_site: AdminSiteConfig,
}

impl ServerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize server config")
    }

    /// Loads `path` when it exists, otherwise starts from defaults. A
    /// `DATABASE_URL` in the environment wins over the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::from_str("")?
        };

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }

        Ok(config)
    }
}

/// Labels shown by the administration front end.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AdminSiteConfig {
    #[serde(default = "default_site_header")]
    pub site_header: String,
    #[serde(default = "default_site_title")]
    pub site_title: String,
    #[serde(default = "default_index_title")]
    pub index_title: String,
}

impl Default for AdminSiteConfig {
    fn default() -> Self {
        Self {
            site_header: default_site_header(),
            site_title: default_site_title(),
            index_title: default_index_title(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_database_url() -> String {
    "sqlite://feedback.db?mode=rwc".to_string()
}

fn default_site_header() -> String {
    "Teacher Feedback System - Administration".to_string()
}

fn default_site_title() -> String {
    "Feedback Admin".to_string()
}

fn default_index_title() -> String {
    "Welcome to Feedback System Administration".to_string()
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;

    #[test]
    fn test_parse_config() {
        let raw = r#"
bind_addr = "0.0.0.0:9000"
database_url = "postgres://feedback@localhost/feedback"

[admin_site]
site_header = "Faculty Feedback"
"#;

        let config = ServerConfig::from_str(raw).expect("config should parse");
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.database_url, "postgres://feedback@localhost/feedback");
        assert_eq!(config.admin_site.site_header, "Faculty Feedback");
        assert_eq!(config.admin_site.site_title, "Feedback Admin");
        assert_eq!(
            config.admin_site.index_title,
            "Welcome to Feedback System Administration"
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = ServerConfig::from_str("").expect("empty config should parse");

        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert!(config.database_url.starts_with("sqlite://"));
        assert_eq!(
            config.admin_site.site_header,
            "Teacher Feedback System - Administration"
        );
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(ServerConfig::from_str("bind_addr = [").is_err());
    }
}
