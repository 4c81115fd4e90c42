//! Firestore blog adapter
//!
//! Maps remote `blogs` documents into the canonical [`Post`] shape. The
//! remote schema already stores tags as an array, so there is no legacy
//! string form to handle on this path.

use crate::content::post::{read_time, Banner, ContentType, Origin, Post};
use crate::store::{Document, DocumentStore, OrderBy, StoreError, BLOGS_COLLECTION};

/// Map one remote document into a post.
///
/// Returns `None` when the document is missing its title, which marks
/// records created outside the admin flow; the caller skips them.
pub fn post_from_document(doc: &Document) -> Option<Post> {
    let title = doc.str_field("title")?.to_string();
    let slug = doc
        .str_field("slug")
        .unwrap_or(doc.id.as_str())
        .to_string();

    let banner_link = doc.str_field("bannerLink").unwrap_or_default();
    let banner = if banner_link.is_empty() {
        Banner::placeholder(ContentType::Blog, &slug)
    } else {
        Banner::from_link(banner_link)
    };

    let content = doc.str_field("content").unwrap_or_default();

    Some(Post {
        slug,
        title,
        description: doc.str_field("description").unwrap_or_default().to_string(),
        tags: doc.string_list_field("tags"),
        published_at: doc.str_field("publishedAt").unwrap_or_default().to_string(),
        banner,
        banner_alt: doc
            .str_field("bannerAlt")
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        banner_link: doc
            .str_field("bannerLink")
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        read_time: read_time(content),
        origin: Origin::Firestore,
        last_updated_at: doc.str_field("updatedAt").map(str::to_string),
    })
}

/// Fetch all remote posts, newest creation first.
pub async fn fetch_posts(store: &dyn DocumentStore) -> Result<Vec<Post>, StoreError> {
    let docs = store
        .query(BLOGS_COLLECTION, None, Some(OrderBy::desc("createdAt")))
        .await?;

    Ok(docs
        .iter()
        .filter_map(|doc| {
            let post = post_from_document(doc);
            if post.is_none() {
                tracing::warn!("Skipping remote document {} without a title", doc.id);
            }
            post
        })
        .collect())
}

/// Fetch a single remote post with its raw content body.
pub async fn fetch_post(
    store: &dyn DocumentStore,
    slug: &str,
) -> Result<Option<(Post, String)>, StoreError> {
    let Some(doc) = store.get(BLOGS_COLLECTION, slug).await? else {
        return Ok(None);
    };
    let content = doc.str_field("content").unwrap_or_default().to_string();
    Ok(post_from_document(&doc).map(|post| (post, content)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_maps_full_document() {
        let doc = Document::new(
            "remote-post",
            json!({
                "title": "Remote Post",
                "description": "from the store",
                "tags": ["c"],
                "publishedAt": "2024-02-01",
                "slug": "remote-post",
                "content": "Some body text",
                "bannerAlt": "skyline",
                "bannerLink": "",
                "updatedAt": "2024-02-02T10:00:00Z"
            }),
        );

        let post = post_from_document(&doc).unwrap();
        assert_eq!(post.origin, Origin::Firestore);
        assert_eq!(post.tags, vec!["c"]);
        assert_eq!(post.banner.src, "/assets/blog/remote-post/banner.jpg");
        assert_eq!(post.banner_alt.as_deref(), Some("skyline"));
        assert_eq!(post.banner_link, None);
        assert_eq!(post.last_updated_at.as_deref(), Some("2024-02-02T10:00:00Z"));
    }

    #[test]
    fn test_banner_synthesized_from_link() {
        let doc = Document::new(
            "x",
            json!({ "title": "X", "bannerLink": "https://cdn.example.com/x.png" }),
        );
        let post = post_from_document(&doc).unwrap();
        assert_eq!(post.banner.src, "https://cdn.example.com/x.png");
        assert_eq!(
            post.banner_link.as_deref(),
            Some("https://cdn.example.com/x.png")
        );
    }

    #[test]
    fn test_document_without_title_is_skipped() {
        let doc = Document::new("x", json!({ "description": "no title" }));
        assert!(post_from_document(&doc).is_none());
    }

    #[test]
    fn test_slug_falls_back_to_document_id() {
        let doc = Document::new("doc-id", json!({ "title": "T" }));
        assert_eq!(post_from_document(&doc).unwrap().slug, "doc-id");
    }
}
