//! Statistics aggregation over the counter records
//!
//! Point-in-time snapshots only: no windows, no time series.

use futures_util::future::join_all;
use serde::Serialize;

use crate::content::ContentType;
use crate::error::Result;
use crate::store::{DocumentStore, Filter, CONTENTS_COLLECTION};

/// Per-content-type totals
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatistics {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub total_posts: u64,
    pub total_views: u64,
    pub total_likes: u64,
}

/// One counter row, for the admin dashboard table
#[derive(Debug, Clone, Serialize)]
pub struct ContentColumn {
    pub slug: String,
    pub views: u64,
    pub likes: u64,
}

/// All counter rows of one content type
#[derive(Debug, Clone, Serialize)]
pub struct ContentData {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub data: Vec<ContentColumn>,
}

/// Reduce the counter records of one content type to totals.
pub async fn content_statistics(
    store: &dyn DocumentStore,
    content_type: ContentType,
) -> Result<ContentStatistics> {
    let docs = store
        .query(
            CONTENTS_COLLECTION,
            Some(Filter::eq("type", content_type.as_str())),
            None,
        )
        .await?;

    let mut stats = ContentStatistics {
        content_type,
        total_posts: 0,
        total_views: 0,
        total_likes: 0,
    };
    for doc in docs {
        stats.total_posts += 1;
        stats.total_views += doc.u64_field("views").unwrap_or(0);
        stats.total_likes += doc.u64_field("likes").unwrap_or(0);
    }
    Ok(stats)
}

/// Statistics for every content type, fetched concurrently.
pub async fn all_statistics(store: &dyn DocumentStore) -> Result<Vec<ContentStatistics>> {
    let results = join_all(
        ContentType::ALL
            .iter()
            .map(|content_type| content_statistics(store, *content_type)),
    )
    .await;
    results.into_iter().collect()
}

/// Per-slug counter rows for one content type.
pub async fn content_data(
    store: &dyn DocumentStore,
    content_type: ContentType,
) -> Result<ContentData> {
    let docs = store
        .query(
            CONTENTS_COLLECTION,
            Some(Filter::eq("type", content_type.as_str())),
            None,
        )
        .await?;

    let data = docs
        .into_iter()
        .map(|doc| ContentColumn {
            views: doc.u64_field("views").unwrap_or(0),
            likes: doc.u64_field("likes").unwrap_or(0),
            slug: doc.id,
        })
        .collect();

    Ok(ContentData { content_type, data })
}
