//! Guestbook entries
//!
//! Visitor-submitted messages stored in the document store. Entries are
//! created with validation, never updated, and deletable only in the
//! development environment.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::Environment;
use crate::error::{Error, Result};
use crate::store::{DocumentStore, OrderBy, GUESTBOOK_COLLECTION};

pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_MESSAGE_LEN: usize = 500;

/// One guestbook entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestbookEntry {
    /// Store-assigned document id
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub message: String,
    /// Server-assigned RFC 3339 timestamp
    pub created_at: String,
}

/// Guestbook operations over the document store
#[derive(Clone)]
pub struct Guestbook {
    store: Arc<dyn DocumentStore>,
    environment: Environment,
}

impl Guestbook {
    pub fn new(store: Arc<dyn DocumentStore>, environment: Environment) -> Self {
        Self { store, environment }
    }

    /// All entries, newest first. Degrades to an empty list when the
    /// store is unreachable so the page still renders.
    pub async fn entries(&self) -> Vec<GuestbookEntry> {
        let docs = match self
            .store
            .query(GUESTBOOK_COLLECTION, None, Some(OrderBy::desc("createdAt")))
            .await
        {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!("Failed to read guestbook, returning empty: {e}");
                return Vec::new();
            }
        };

        docs.into_iter()
            .filter_map(|doc| {
                let id = doc.id.clone();
                serde_json::from_value::<GuestbookEntry>(doc.fields)
                    .map(|mut entry| {
                        entry.id = id;
                        entry
                    })
                    .ok()
            })
            .collect()
    }

    /// Validate and create a new entry.
    pub async fn create(&self, username: &str, message: &str) -> Result<GuestbookEntry> {
        let username = username.trim();
        let message = message.trim();

        if username.is_empty() || message.is_empty() {
            return Err(Error::Validation(
                "Username and message are required".to_string(),
            ));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(Error::Validation(format!(
                "Username too long (max {MAX_USERNAME_LEN} characters)"
            )));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(Error::Validation(format!(
                "Message too long (max {MAX_MESSAGE_LEN} characters)"
            )));
        }

        let mut entry = GuestbookEntry {
            id: String::new(),
            username: username.to_string(),
            display_name: username.to_string(),
            message: message.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let fields = serde_json::json!({
            "username": entry.username,
            "displayName": entry.display_name,
            "message": entry.message,
            "createdAt": entry.created_at,
        });
        entry.id = self.store.add(GUESTBOOK_COLLECTION, fields).await?;

        Ok(entry)
    }

    /// Delete an entry. Development-only tooling, disabled in production.
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.environment.is_development() {
            return Err(Error::Unsupported(
                "guestbook deletion is disabled in production".to_string(),
            ));
        }
        self.store.delete(GUESTBOOK_COLLECTION, id).await?;
        Ok(())
    }
}
