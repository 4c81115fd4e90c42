//! Content aggregation
//!
//! Produces the unified view of all posts regardless of origin: on-disk
//! MDX files and remote documents are fetched fan-out/fan-in, merged,
//! sorted, and enriched with engagement counters at read time.

use std::sync::Arc;

use crate::content::{merge, remote, ContentType, MdxLoader, Post};
use crate::engagement::{EngagementStore, PostWithViews};
use crate::error::{Error, Result};
use crate::store::{DocumentStore, BLOGS_COLLECTION};

/// Aggregates both content origins behind one interface
#[derive(Clone)]
pub struct ContentAggregator {
    loader: Arc<MdxLoader>,
    store: Arc<dyn DocumentStore>,
    engagement: EngagementStore,
}

impl ContentAggregator {
    pub fn new(loader: MdxLoader, store: Arc<dyn DocumentStore>) -> Self {
        let engagement = EngagementStore::new(store.clone());
        Self {
            loader: Arc::new(loader),
            store,
            engagement,
        }
    }

    pub fn loader(&self) -> &MdxLoader {
        &self.loader
    }

    pub fn engagement(&self) -> &EngagementStore {
        &self.engagement
    }

    /// All blog posts from both origins, merged and sorted.
    ///
    /// The remote origin degrades to an empty list when the store is
    /// unreachable; the file origin alone still produces a usable result.
    pub async fn all_blog_posts(&self) -> Result<Vec<Post>> {
        let (mdx, remote) = tokio::join!(
            async { self.loader.load_all(ContentType::Blog) },
            remote::fetch_posts(self.store.as_ref()),
        );

        let mdx = mdx?;
        let remote = match remote {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!("Remote store unavailable, listing file content only: {e}");
                Vec::new()
            }
        };

        Ok(merge(mdx, remote))
    }

    /// Merged blog posts with view counters attached.
    pub async fn all_blog_with_views(&self) -> Result<Vec<PostWithViews>> {
        let posts = self.all_blog_posts().await?;
        Ok(self.engagement.attach_views(posts).await)
    }

    /// A single post and its raw body, whichever origin owns the slug.
    pub async fn blog_post(&self, slug: &str) -> Result<(Post, String)> {
        match self.loader.load(ContentType::Blog, slug) {
            Ok(post) => {
                let body = self.loader.body(ContentType::Blog, slug)?;
                return Ok((post, body));
            }
            Err(Error::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        match remote::fetch_post(self.store.as_ref(), slug).await? {
            Some((post, body)) => Ok((post, body)),
            None => Err(Error::NotFound(format!("blog/{slug}"))),
        }
    }

    /// Whether any origin already owns this slug. Used by the admin write
    /// paths to reject collisions before they reach the merged view.
    pub async fn slug_taken(&self, slug: &str) -> Result<bool> {
        if self
            .loader
            .file_path(ContentType::Blog, slug)
            .exists()
        {
            return Ok(true);
        }
        Ok(self.store.get(BLOGS_COLLECTION, slug).await?.is_some())
    }

    /// Ensure a counter record exists for every on-disk slug.
    ///
    /// Per-slug failures are logged and skipped so one bad record never
    /// aborts initialization of the rest.
    pub async fn init_counters(&self) -> Result<usize> {
        let mut initialized = 0;
        for content_type in ContentType::ALL {
            for slug in self.loader.list_slugs(content_type)? {
                match self.engagement.ensure_initialized(&slug, content_type).await {
                    Ok(()) => initialized += 1,
                    Err(e) => {
                        tracing::warn!("Failed to initialize counter for {slug}: {e}");
                    }
                }
            }
        }
        Ok(initialized)
    }

    /// All project posts (file origin only; projects have no remote form).
    pub fn all_projects(&self) -> Result<Vec<Post>> {
        let projects = self.loader.load_all(ContentType::Projects)?;
        Ok(merge(projects, Vec::new()))
    }
}
