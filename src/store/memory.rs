//! In-memory document store
//!
//! Backs development runs without a configured Firestore project and the
//! test suite. Honors the same filter/order semantics as the remote store.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Document, DocumentStore, Filter, OrderBy, StoreError};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Process-local document store
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(
        &self,
        collection: &str,
        filter: Option<Filter>,
        order: Option<OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(filter) = filter {
            docs.retain(|doc| doc.fields.get(&filter.field) == Some(&filter.value));
        }

        if let Some(order) = order {
            docs.sort_by(|a, b| {
                let ordering = cmp_values(a.fields.get(&order.field), b.fields.get(&order.field));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(docs)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn set(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;

        if let (Some(target), Some(updates)) = (existing.as_object_mut(), fields.as_object()) {
            for (key, value) in updates {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Value) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.set(collection, &id, fields).await?;
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));
        if removed.is_none() {
            return Err(StoreError::NotFound(format!("{collection}/{id}")));
        }
        Ok(())
    }
}

fn cmp_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .set("contents", "hello", json!({"views": 3}))
            .await
            .unwrap();

        let doc = store.get("contents", "hello").await.unwrap().unwrap();
        assert_eq!(doc.u64_field("views"), Some(3));
        assert!(store.get("contents", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_query_filter_and_order() {
        let store = MemoryStore::new();
        store
            .set("contents", "a", json!({"type": "blog", "views": 1}))
            .await
            .unwrap();
        store
            .set("contents", "b", json!({"type": "projects", "views": 2}))
            .await
            .unwrap();
        store
            .set("guestbook", "g1", json!({"createdAt": "2024-01-01T00:00:00Z"}))
            .await
            .unwrap();
        store
            .set("guestbook", "g2", json!({"createdAt": "2024-02-01T00:00:00Z"}))
            .await
            .unwrap();

        let blogs = store
            .query("contents", Some(Filter::eq("type", "blog")), None)
            .await
            .unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].id, "a");

        let newest_first = store
            .query("guestbook", None, Some(OrderBy::desc("createdAt")))
            .await
            .unwrap();
        assert_eq!(newest_first[0].id, "g2");
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        store
            .set("contents", "a", json!({"views": 1, "likes": 0}))
            .await
            .unwrap();
        store
            .update("contents", "a", json!({"views": 2}))
            .await
            .unwrap();

        let doc = store.get("contents", "a").await.unwrap().unwrap();
        assert_eq!(doc.u64_field("views"), Some(2));
        assert_eq!(doc.u64_field("likes"), Some(0));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update("contents", "ghost", json!({"views": 1}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_generates_ids() {
        let store = MemoryStore::new();
        let id1 = store.add("guestbook", json!({"n": 1})).await.unwrap();
        let id2 = store.add("guestbook", json!({"n": 2})).await.unwrap();
        assert_ne!(id1, id2);
        assert_eq!(store.query("guestbook", None, None).await.unwrap().len(), 2);
    }
}
