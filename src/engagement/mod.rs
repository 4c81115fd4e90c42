//! Per-slug engagement counters
//!
//! Counters (views, likes, who-liked) live in the document store's
//! `contents` collection, decoupled from the content records themselves.
//! Counter records are created lazily, never deleted automatically, and
//! engagement reads always degrade to zero instead of failing a listing.

pub mod stats;

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::content::{ContentType, Post};
use crate::error::Result;
use crate::store::{DocumentStore, CONTENTS_COLLECTION};

/// One counter record, keyed by slug in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentMeta {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    /// Viewer ids that currently hold a like, prevents double counting
    #[serde(rename = "likesBy", default)]
    pub likes_by: HashMap<String, bool>,
}

impl ContentMeta {
    fn initial(content_type: ContentType) -> Self {
        Self {
            content_type,
            views: 0,
            likes: 0,
            likes_by: HashMap::new(),
        }
    }
}

/// A post with its view counter attached at read time
#[derive(Debug, Clone, Serialize)]
pub struct PostWithViews {
    #[serde(flatten)]
    pub post: Post,
    pub views: u64,
}

/// Like state returned to the caller after a toggle
#[derive(Debug, Clone, Serialize)]
pub struct LikeState {
    pub likes: u64,
    pub liked: bool,
}

/// Engagement counter operations over the document store
#[derive(Clone)]
pub struct EngagementStore {
    store: Arc<dyn DocumentStore>,
}

impl EngagementStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create the counter record for a slug if it does not exist yet.
    ///
    /// The read-check-then-write race is tolerated: a concurrent caller
    /// at worst rewrites the identical initial value.
    pub async fn ensure_initialized(&self, slug: &str, content_type: ContentType) -> Result<()> {
        let existing = self.store.get(CONTENTS_COLLECTION, slug).await?;
        if existing.is_some() {
            return Ok(());
        }
        let initial = serde_json::to_value(ContentMeta::initial(content_type))
            .unwrap_or_else(|_| serde_json::json!({}));
        self.store.set(CONTENTS_COLLECTION, slug, initial).await?;
        Ok(())
    }

    /// Current counter snapshot for a slug, `None` when never initialized
    pub async fn content_meta(&self, slug: &str) -> Result<Option<ContentMeta>> {
        let Some(doc) = self.store.get(CONTENTS_COLLECTION, slug).await? else {
            return Ok(None);
        };
        Ok(serde_json::from_value(doc.fields).ok())
    }

    /// Attach view counts to posts.
    ///
    /// Lookups fan out concurrently; any failure degrades that one slug to
    /// zero views. This method never fails: availability of the content
    /// listing takes priority over engagement accuracy.
    pub async fn attach_views(&self, posts: Vec<Post>) -> Vec<PostWithViews> {
        let lookups = posts.into_iter().map(|post| async {
            let views = match self.store.get(CONTENTS_COLLECTION, &post.slug).await {
                Ok(Some(doc)) => doc.u64_field("views").unwrap_or(0),
                Ok(None) => 0,
                Err(e) => {
                    tracing::warn!("Failed to read views for {}: {}", post.slug, e);
                    0
                }
            };
            PostWithViews { post, views }
        });

        join_all(lookups).await
    }

    /// Increment the view counter for a slug, initializing it on first view
    pub async fn increment_view(&self, slug: &str, content_type: ContentType) -> Result<u64> {
        let mut meta = self
            .content_meta(slug)
            .await?
            .unwrap_or_else(|| ContentMeta::initial(content_type));
        meta.views += 1;
        self.write(slug, &meta).await?;
        Ok(meta.views)
    }

    /// Toggle a viewer's like for a slug.
    ///
    /// Idempotent per viewer: a second toggle by the same viewer removes
    /// their like instead of incrementing again.
    pub async fn toggle_like(
        &self,
        slug: &str,
        content_type: ContentType,
        viewer: &str,
    ) -> Result<LikeState> {
        let mut meta = self
            .content_meta(slug)
            .await?
            .unwrap_or_else(|| ContentMeta::initial(content_type));

        let liked = if meta.likes_by.remove(viewer).is_some() {
            meta.likes = meta.likes.saturating_sub(1);
            false
        } else {
            meta.likes_by.insert(viewer.to_string(), true);
            meta.likes += 1;
            true
        };

        self.write(slug, &meta).await?;
        Ok(LikeState {
            likes: meta.likes,
            liked,
        })
    }

    async fn write(&self, slug: &str, meta: &ContentMeta) -> Result<()> {
        let fields = serde_json::to_value(meta).unwrap_or_else(|_| serde_json::json!({}));
        self.store.set(CONTENTS_COLLECTION, slug, fields).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Origin;
    use crate::store::{Document, Filter, MemoryStore, OrderBy, StoreError};
    use async_trait::async_trait;
    use serde_json::Value;

    /// Store double whose every operation fails
    struct UnreachableStore;

    #[async_trait]
    impl DocumentStore for UnreachableStore {
        async fn query(
            &self,
            _: &str,
            _: Option<Filter>,
            _: Option<OrderBy>,
        ) -> std::result::Result<Vec<Document>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn get(
            &self,
            _: &str,
            _: &str,
        ) -> std::result::Result<Option<Document>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn set(
            &self,
            _: &str,
            _: &str,
            _: Value,
        ) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn update(
            &self,
            _: &str,
            _: &str,
            _: Value,
        ) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn add(&self, _: &str, _: Value) -> std::result::Result<String, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn delete(&self, _: &str, _: &str) -> std::result::Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn engagement() -> EngagementStore {
        EngagementStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_ensure_initialized_creates_once() {
        let store = Arc::new(MemoryStore::new());
        let engagement = EngagementStore::new(store.clone());

        engagement
            .ensure_initialized("hello", ContentType::Blog)
            .await
            .unwrap();
        let meta = engagement.content_meta("hello").await.unwrap().unwrap();
        assert_eq!(meta.views, 0);
        assert_eq!(meta.likes, 0);
        assert_eq!(meta.content_type, ContentType::Blog);

        // Second call is a no-op even after mutation
        engagement
            .increment_view("hello", ContentType::Blog)
            .await
            .unwrap();
        engagement
            .ensure_initialized("hello", ContentType::Blog)
            .await
            .unwrap();
        let meta = engagement.content_meta("hello").await.unwrap().unwrap();
        assert_eq!(meta.views, 1);
    }

    #[tokio::test]
    async fn test_concurrent_initialization_is_harmless() {
        let store = Arc::new(MemoryStore::new());
        let engagement = EngagementStore::new(store.clone());

        let (a, b) = tokio::join!(
            engagement.ensure_initialized("same-slug", ContentType::Blog),
            engagement.ensure_initialized("same-slug", ContentType::Blog),
        );
        a.unwrap();
        b.unwrap();

        let meta = engagement.content_meta("same-slug").await.unwrap().unwrap();
        assert_eq!((meta.views, meta.likes), (0, 0));
    }

    #[tokio::test]
    async fn test_attach_views_with_unreachable_store() {
        let engagement = EngagementStore::new(Arc::new(UnreachableStore));
        let posts = vec![Post::new("a", Origin::Mdx), Post::new("b", Origin::Firestore)];

        let with_views = engagement.attach_views(posts).await;
        assert_eq!(with_views.len(), 2);
        assert!(with_views.iter().all(|p| p.views == 0));
    }

    #[tokio::test]
    async fn test_attach_views_reads_counters() {
        let store = Arc::new(MemoryStore::new());
        let engagement = EngagementStore::new(store.clone());
        engagement
            .ensure_initialized("a", ContentType::Blog)
            .await
            .unwrap();
        for _ in 0..3 {
            engagement
                .increment_view("a", ContentType::Blog)
                .await
                .unwrap();
        }

        let posts = vec![Post::new("a", Origin::Mdx), Post::new("uncounted", Origin::Mdx)];
        let with_views = engagement.attach_views(posts).await;
        assert_eq!(with_views[0].views, 3);
        assert_eq!(with_views[1].views, 0);
    }

    #[tokio::test]
    async fn test_toggle_like_is_a_toggle() {
        let engagement = engagement();

        let state = engagement
            .toggle_like("post", ContentType::Blog, "viewer-1")
            .await
            .unwrap();
        assert!(state.liked);
        assert_eq!(state.likes, 1);

        let state = engagement
            .toggle_like("post", ContentType::Blog, "viewer-1")
            .await
            .unwrap();
        assert!(!state.liked);
        assert_eq!(state.likes, 0);
    }

    #[tokio::test]
    async fn test_toggle_like_counts_distinct_viewers() {
        let engagement = engagement();

        engagement
            .toggle_like("post", ContentType::Blog, "viewer-1")
            .await
            .unwrap();
        let state = engagement
            .toggle_like("post", ContentType::Blog, "viewer-2")
            .await
            .unwrap();
        assert_eq!(state.likes, 2);
    }

    #[tokio::test]
    async fn test_increment_view_initializes_lazily() {
        let engagement = engagement();
        let views = engagement
            .increment_view("fresh", ContentType::Projects)
            .await
            .unwrap();
        assert_eq!(views, 1);

        let meta = engagement.content_meta("fresh").await.unwrap().unwrap();
        assert_eq!(meta.content_type, ContentType::Projects);
    }
}
