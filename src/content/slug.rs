//! Slug normalization and small content helpers

use crate::content::Post;

/// Derive a canonical slug from a free-text title.
///
/// Lowercases, collapses any run of non-alphanumeric characters into a
/// single hyphen, and trims leading/trailing hyphens. Idempotent:
/// `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(title: &str) -> String {
    slug::slugify(title)
}

/// Returns the content filename without the `.mdx` extension.
pub fn strip_extension(filename: &str) -> &str {
    filename.strip_suffix(".mdx").unwrap_or(filename)
}

/// Returns the unique, non-empty tags across posts in first-seen order.
pub fn collect_tags(posts: &[Post]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut tags = Vec::new();
    for post in posts {
        for tag in &post.tags {
            let tag = tag.trim();
            if !tag.is_empty() && seen.insert(tag.to_string()) {
                tags.push(tag.to_string());
            }
        }
    }
    tags
}

/// Case- and punctuation-insensitive containment check, used for search.
pub fn text_includes(target: &str, filter: &str) -> bool {
    let fold = |text: &str| {
        text.chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect::<String>()
    };
    fold(target).contains(&fold(filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Origin, Post};

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Hello World"), "hello-world");
        assert_eq!(normalize("  Rust & Tokio!  "), "rust-tokio");
        assert_eq!(normalize("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn test_normalize_idempotent() {
        for title in ["Hello World", "A -- B", "C++ in 2024", "--x--"] {
            let once = normalize(title);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("hello-world.mdx"), "hello-world");
        assert_eq!(strip_extension("no-extension"), "no-extension");
    }

    #[test]
    fn test_collect_tags_unique_in_order() {
        let mut a = Post::new("a", Origin::Mdx);
        a.tags = vec!["rust".to_string(), "web".to_string()];
        let mut b = Post::new("b", Origin::Firestore);
        b.tags = vec!["web".to_string(), " tokio ".to_string(), String::new()];

        assert_eq!(collect_tags(&[a, b]), vec!["rust", "web", "tokio"]);
    }

    #[test]
    fn test_text_includes() {
        assert!(text_includes("Hello, World!", "hello world"));
        assert!(text_includes("Rust & Tokio", "RUSTTOKIO"));
        assert!(!text_includes("Hello", "world"));
    }
}
