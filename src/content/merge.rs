//! Content merger
//!
//! Produces the unified post collection regardless of origin. Sorting is
//! stable so equal-date posts keep their concatenation order across calls,
//! and the result never depends on I/O completion order.

use crate::content::Post;

/// Concatenate both origins and sort by publish date descending.
///
/// Posts with an empty or unparsable date sort after all dated posts.
/// Slugs are not deduplicated here; collisions are rejected at write time.
pub fn merge(mdx: Vec<Post>, firestore: Vec<Post>) -> Vec<Post> {
    let mut posts = mdx;
    posts.extend(firestore);
    posts.sort_by(|a, b| b.published_date().cmp(&a.published_date()));
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Origin, Post};

    fn post(slug: &str, published_at: &str, origin: Origin) -> Post {
        let mut post = Post::new(slug, origin);
        post.published_at = published_at.to_string();
        post
    }

    #[test]
    fn test_sorted_descending() {
        let mdx = vec![post("hello-world", "2024-01-01", Origin::Mdx)];
        let remote = vec![post("remote-post", "2024-02-01", Origin::Firestore)];

        let merged = merge(mdx, remote);
        let slugs: Vec<_> = merged.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["remote-post", "hello-world"]);
    }

    #[test]
    fn test_stable_on_equal_dates() {
        let mdx = vec![
            post("first", "2024-01-01", Origin::Mdx),
            post("second", "2024-01-01", Origin::Mdx),
        ];
        let remote = vec![post("third", "2024-01-01", Origin::Firestore)];

        let merged = merge(mdx.clone(), remote.clone());
        let slugs: Vec<_> = merged.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second", "third"]);

        // Referential transparency: same inputs, same order, every time
        let again = merge(mdx, remote);
        let slugs_again: Vec<_> = again.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, slugs_again);
    }

    #[test]
    fn test_undated_posts_sort_last() {
        let mdx = vec![post("undated", "", Origin::Mdx)];
        let remote = vec![post("dated", "2020-05-05", Origin::Firestore)];

        let merged = merge(mdx, remote);
        assert_eq!(merged[0].slug, "dated");
        assert_eq!(merged[1].slug, "undated");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge(Vec::new(), Vec::new()).is_empty());
    }
}
