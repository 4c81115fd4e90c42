//! Post model shared by both content origins

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which backing store is authoritative for a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Mdx,
    Firestore,
}

/// Content type, keys the engagement counters and the on-disk layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Projects,
}

impl ContentType {
    pub const ALL: [ContentType; 2] = [ContentType::Blog, ContentType::Projects];

    /// Directory name under the content root
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Blog => "blog",
            ContentType::Projects => "projects",
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" | "blogs" => Ok(ContentType::Blog),
            "projects" | "project" => Ok(ContentType::Projects),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured banner reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

impl Banner {
    /// Default banner location for content without an explicit banner link
    pub fn placeholder(content_type: ContentType, slug: &str) -> Self {
        Self {
            src: format!("/assets/{content_type}/{slug}/banner.jpg"),
            width: 800,
            height: 400,
        }
    }

    /// Banner synthesized from a single outbound link field
    pub fn from_link(link: &str) -> Self {
        Self {
            src: link.to_string(),
            width: 800,
            height: 400,
        }
    }
}

/// A blog or project post, independent of where it is stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Canonical identifier, unique within the merged collection
    pub slug: String,

    pub title: String,
    pub description: String,

    /// Always a normalized list past the ingestion boundary
    pub tags: Vec<String>,

    /// ISO-8601 date string, drives sort order
    pub published_at: String,

    pub banner: Banner,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_alt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_link: Option<String>,

    /// Derived display string, not authoritative
    pub read_time: String,

    pub origin: Origin,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<String>,
}

impl Post {
    /// Create a post with minimal required fields
    pub fn new(slug: &str, origin: Origin) -> Self {
        Self {
            slug: slug.to_string(),
            title: String::new(),
            description: String::new(),
            tags: Vec::new(),
            published_at: String::new(),
            banner: Banner::placeholder(ContentType::Blog, slug),
            banner_alt: None,
            banner_link: None,
            read_time: String::new(),
            origin,
            last_updated_at: None,
        }
    }

    /// Parsed publish date, `None` when empty or unparsable
    pub fn published_date(&self) -> Option<NaiveDate> {
        parse_date(&self.published_at)
    }
}

/// Parse an ISO-8601 date, tolerating a full RFC 3339 timestamp
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Reading time estimate from the body word count (roughly 200 wpm)
pub fn read_time(body: &str) -> String {
    let words = body.split_whitespace().count();
    let minutes = (words / 200).max(1);
    format!("{minutes} min read")
}
