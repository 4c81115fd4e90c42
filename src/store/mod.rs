//! Document store abstraction
//!
//! The remote store is Firestore in production, but everything above this
//! module only sees the [`DocumentStore`] trait. The handle is constructed
//! once by the host process and passed in by parameter; there is no global
//! connection state.

mod firestore;
mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Collection holding per-slug engagement counters
pub const CONTENTS_COLLECTION: &str = "contents";
/// Collection holding remote-origin blog posts
pub const BLOGS_COLLECTION: &str = "blogs";
/// Collection holding guestbook entries
pub const GUESTBOOK_COLLECTION: &str = "guestbook";

/// A stored document: id plus a JSON object of fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn u64_field(&self, name: &str) -> Option<u64> {
        self.fields.get(name).and_then(Value::as_u64)
    }

    pub fn string_list_field(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Equality filter on a single field
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Single-field ordering
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }
}

/// Errors from a document store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend cannot be reached or answered with a server error
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The target document does not exist
    #[error("document not found: {0}")]
    NotFound(String),

    /// The backend answered with something we cannot interpret
    #[error("invalid store response: {0}")]
    Invalid(String),
}

impl From<StoreError> for crate::error::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => crate::error::Error::NotFound(id),
            other => crate::error::Error::StoreUnavailable(other.to_string()),
        }
    }
}

/// Firestore-like document store operations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Query a collection with an optional equality filter and ordering
    async fn query(
        &self,
        collection: &str,
        filter: Option<Filter>,
        order: Option<OrderBy>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Fetch a single document, `Ok(None)` when absent
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create or replace a document with a known id
    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError>;

    /// Merge fields into an existing document
    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError>;

    /// Create a document with a generated id, returning the id
    async fn add(&self, collection: &str, fields: Value) -> Result<String, StoreError>;

    /// Delete a document
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}
