//! MDX front-matter extraction
//!
//! Content files export a metadata object near the top of the file:
//!
//! ```text
//! export const meta = {
//!   title: 'Hello World',
//!   publishedAt: '2024-01-01',
//!   description: '...',
//!   tags: ['rust', 'web']
//! };
//! ```
//!
//! This is pattern-based extraction over a constrained grammar, not a
//! JavaScript parser. Missing fields fall back to empty defaults; only a
//! missing metadata block fails the file.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    static ref META_BLOCK: Regex = Regex::new(r"(?s)export const meta = \{(.*?)\};").unwrap();
    static ref TITLE: Regex = Regex::new(r#"title:\s*['"`](.*?)['"`]"#).unwrap();
    static ref PUBLISHED_AT: Regex = Regex::new(r#"publishedAt:\s*['"`](.*?)['"`]"#).unwrap();
    static ref DESCRIPTION: Regex = Regex::new(r#"(?s)description:\s*['"`](.*?)['"`]"#).unwrap();
    static ref TAGS: Regex = Regex::new(r"tags:\s*\[(.*?)\]").unwrap();
    static ref BANNER_ALT: Regex = Regex::new(r#"bannerAlt:\s*['"`](.*?)['"`]"#).unwrap();
    static ref BANNER_LINK: Regex = Regex::new(r#"bannerLink:\s*['"`](.*?)['"`]"#).unwrap();
}

/// Front-matter fields recovered from an MDX file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub published_at: String,
    pub description: String,
    pub tags: Vec<String>,
    pub banner_alt: String,
    pub banner_link: String,
}

impl FrontMatter {
    /// Extract front-matter from raw file text.
    ///
    /// `path` is only used to label the error when the metadata block
    /// cannot be located.
    pub fn extract(path: &str, raw: &str) -> Result<Self> {
        let block = META_BLOCK
            .captures(raw)
            .and_then(|c| c.get(1))
            .ok_or_else(|| Error::MalformedContent {
                path: path.to_string(),
                reason: "metadata block not found".to_string(),
            })?
            .as_str();

        Ok(Self {
            title: capture(&TITLE, block),
            published_at: capture(&PUBLISHED_AT, block),
            description: capture(&DESCRIPTION, block),
            tags: TAGS
                .captures(block)
                .and_then(|c| c.get(1))
                .map(|m| parse_tags(m.as_str()))
                .unwrap_or_default(),
            banner_alt: capture(&BANNER_ALT, block),
            banner_link: capture(&BANNER_LINK, block),
        })
    }
}

fn capture(re: &Regex, block: &str) -> String {
    re.captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Parse the inside of a tags literal.
///
/// Two legacy encodings exist: a JSON-like array (`"a", "b"`) and a
/// comma-separated string with arbitrary quoting (`'a', 'b'` or `a, b`).
/// The strict form is tried first, the comma split is the fallback.
fn parse_tags(inner: &str) -> Vec<String> {
    if let Ok(tags) = serde_json::from_str::<Vec<String>>(&format!("[{inner}]")) {
        return tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }

    inner
        .replace(['\'', '"', '`'], "")
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
import { ContentLayout } from '@components/layout/content-layout';

export const meta = {
  title: 'Hello World',
  publishedAt: '2024-01-01',
  description: 'A first post',
  bannerAlt: 'sunrise over mountains',
  bannerLink: '',
  tags: ['rust', 'web']
};

export default ({ children }) => <ContentLayout meta={meta}>{children}</ContentLayout>;

Body text starts here.
"#;

    #[test]
    fn test_extract_all_fields() {
        let fm = FrontMatter::extract("hello-world.mdx", SAMPLE).unwrap();
        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.published_at, "2024-01-01");
        assert_eq!(fm.description, "A first post");
        assert_eq!(fm.banner_alt, "sunrise over mountains");
        assert_eq!(fm.tags, vec!["rust", "web"]);
    }

    #[test]
    fn test_tags_json_array_form() {
        let raw = r#"export const meta = { tags: ["a", "b"] };"#;
        let fm = FrontMatter::extract("t.mdx", raw).unwrap();
        assert_eq!(fm.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_tags_single_quoted_falls_back_to_split() {
        let raw = "export const meta = { tags: ['a', 'b'] };";
        let fm = FrontMatter::extract("t.mdx", raw).unwrap();
        assert_eq!(fm.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_tags_comma_string_form() {
        let raw = "export const meta = { tags: [a, b] };";
        let fm = FrontMatter::extract("t.mdx", raw).unwrap();
        assert_eq!(fm.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let raw = "export const meta = { title: 'Only Title' };";
        let fm = FrontMatter::extract("t.mdx", raw).unwrap();
        assert_eq!(fm.title, "Only Title");
        assert_eq!(fm.published_at, "");
        assert_eq!(fm.description, "");
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn test_missing_block_is_malformed() {
        let err = FrontMatter::extract("plain.mdx", "# Just markdown\n").unwrap_err();
        match err {
            Error::MalformedContent { path, .. } => assert_eq!(path, "plain.mdx"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_multiline_description() {
        let raw = "export const meta = {\n  description: 'line one\nline two',\n};";
        let fm = FrontMatter::extract("t.mdx", raw).unwrap();
        assert_eq!(fm.description, "line one\nline two");
    }
}
