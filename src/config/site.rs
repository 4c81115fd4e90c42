//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    /// Public site origin, also used by the admin access gate
    pub url: String,

    /// Deployment environment, gates development-only operations
    pub environment: Environment,

    // Directory
    pub content_dir: String,
    pub pages_dir: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub firestore: FirestoreConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            url: "http://example.com".to_string(),
            environment: Environment::Development,
            content_dir: "content".to_string(),
            pages_dir: "pages".to_string(),
            server: ServerConfig::default(),
            firestore: FirestoreConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Shared secret expected in the Authorization header on admin routes
    pub bearer_token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
            bearer_token: String::new(),
        }
    }
}

/// Document store configuration
///
/// An empty `project_id` means no remote store is configured; the server
/// falls back to an in-memory store so content listing keeps working.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    /// Override for the REST endpoint, used with emulators
    pub base_url: Option<String>,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: "(default)".to_string(),
            base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.server.port, 4000);
        assert!(config.environment.is_development());
        assert!(config.firestore.project_id.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Portfolio
author: Jane
url: https://jane.dev
environment: production
server:
  port: 8080
  bearer_token: secret
firestore:
  project_id: jane-portfolio
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.url, "https://jane.dev");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bearer_token, "secret");
        assert_eq!(config.firestore.project_id, "jane-portfolio");
        assert_eq!(config.firestore.database, "(default)");
    }
}
