//! folio-rs: a personal portfolio and blog server
//!
//! Serves a unified view of blog content from two origins - on-disk MDX
//! files and a Firestore document store - together with per-slug
//! engagement counters, a visitor guestbook, and an admin CRUD surface.

pub mod commands;
pub mod config;
pub mod content;
pub mod engagement;
pub mod error;
pub mod guestbook;
pub mod server;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use store::{DocumentStore, FirestoreStore, MemoryStore};

/// The main application: configuration plus directory layout
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// MDX content directory
    pub content_dir: std::path::PathBuf,
    /// Static page content directory
    pub pages_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let pages_dir = base_dir.join(&config.pages_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            pages_dir,
        })
    }

    /// Build the document store handle from configuration.
    ///
    /// Without a configured project id the server runs on an in-memory
    /// store: engagement and guestbook data will not survive a restart,
    /// but content listing works unchanged.
    pub fn document_store(&self) -> Arc<dyn DocumentStore> {
        if self.config.firestore.project_id.is_empty() {
            tracing::warn!("No Firestore project configured, using in-memory store");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(FirestoreStore::new(&self.config.firestore))
        }
    }
}
