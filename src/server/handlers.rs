//! JSON request handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::content::pages::{AboutContent, HomeContent};
use crate::content::{markdown, slug as slugs, ContentType, MdxPostInput, Post};
use crate::engagement::stats::{self, ContentData, ContentStatistics};
use crate::engagement::{LikeState, PostWithViews};
use crate::error::Error;
use crate::guestbook::GuestbookEntry;
use crate::store::{OrderBy, BLOGS_COLLECTION};

use super::error::ApiError;
use super::AppState;

type ApiResult<T> = Result<T, ApiError>;

// ---------------------------------------------------------------------------
// Public content routes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

pub async fn list_blog(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> ApiResult<Json<Vec<PostWithViews>>> {
    let mut posts = state.aggregator.all_blog_with_views().await?;

    if let Some(ref tag) = query.tag {
        let tag = tag.to_lowercase();
        posts.retain(|p| p.post.tags.iter().any(|t| t.to_lowercase() == tag));
    }
    if let Some(ref search) = query.search {
        posts.retain(|p| {
            slugs::text_includes(&p.post.title, search)
                || slugs::text_includes(&p.post.description, search)
        });
    }

    Ok(Json(posts))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetail {
    #[serde(flatten)]
    pub post: Post,
    /// Rendered HTML body
    pub content: String,
    pub views: u64,
    pub likes: u64,
}

pub async fn blog_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<BlogDetail>> {
    let (post, body) = state.aggregator.blog_post(&slug).await?;

    // Engagement figures degrade to zero, they never fail the detail page
    let (views, likes) = match state.aggregator.engagement().content_meta(&slug).await {
        Ok(Some(meta)) => (meta.views, meta.likes),
        Ok(None) => (0, 0),
        Err(e) => {
            tracing::warn!("Failed to read counters for {slug}: {e}");
            (0, 0)
        }
    };

    Ok(Json(BlogDetail {
        post,
        content: markdown::render(&body),
        views,
        likes,
    }))
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<TagsResponse>> {
    let posts = state.aggregator.all_blog_posts().await?;
    Ok(Json(TagsResponse {
        tags: slugs::collect_tags(&posts),
    }))
}

// ---------------------------------------------------------------------------
// Engagement routes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub views: u64,
}

pub async fn record_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ViewsResponse>> {
    let views = state
        .aggregator
        .engagement()
        .increment_view(&slug, ContentType::Blog)
        .await?;
    Ok(Json(ViewsResponse { views }))
}

#[derive(Debug, Deserialize)]
pub struct LikePayload {
    pub viewer: String,
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<LikePayload>,
) -> ApiResult<Json<LikeState>> {
    let viewer = payload.viewer.trim();
    if viewer.is_empty() {
        return Err(Error::Validation("Viewer id is required".to_string()).into());
    }
    let status = state
        .aggregator
        .engagement()
        .toggle_like(&slug, ContentType::Blog, viewer)
        .await?;
    Ok(Json(status))
}

// ---------------------------------------------------------------------------
// Guestbook routes
// ---------------------------------------------------------------------------

pub async fn guestbook_list(State(state): State<AppState>) -> Json<Vec<GuestbookEntry>> {
    Json(state.guestbook.entries().await)
}

#[derive(Debug, Deserialize)]
pub struct GuestbookPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub message: String,
}

pub async fn guestbook_create(
    State(state): State<AppState>,
    Json(payload): Json<GuestbookPayload>,
) -> ApiResult<(StatusCode, Json<GuestbookEntry>)> {
    let entry = state
        .guestbook
        .create(&payload.username, &payload.message)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn guestbook_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.guestbook.delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Guestbook entry deleted".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

pub async fn statistics(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ContentStatistics>>> {
    let stats = stats::all_statistics(state.store.as_ref()).await?;
    Ok(Json(stats))
}

pub async fn admin_content_data(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ContentData>>> {
    let mut data = Vec::with_capacity(ContentType::ALL.len());
    for content_type in ContentType::ALL {
        data.push(stats::content_data(state.store.as_ref(), content_type).await?);
    }
    Ok(Json(data))
}

// ---------------------------------------------------------------------------
// Admin: MDX origin
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    /// Array or comma-separated string, normalized on ingestion
    #[serde(default)]
    pub tags: Value,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub banner_alt: String,
    #[serde(default)]
    pub banner_link: String,
    #[serde(default)]
    pub slug: String,
}

impl PostPayload {
    fn require_fields(&self, with_slug: bool) -> Result<(), Error> {
        let mut missing = self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.content.trim().is_empty();
        if with_slug {
            missing = missing || self.slug.trim().is_empty();
        }
        if missing {
            return Err(Error::Validation(
                "Title, description, content, and slug are required".to_string(),
            ));
        }
        Ok(())
    }

    fn into_input(self) -> MdxPostInput {
        MdxPostInput {
            tags: tags_from_value(&self.tags),
            title: self.title,
            description: self.description,
            published_at: self.published_at,
            banner_alt: self.banner_alt,
            banner_link: self.banner_link,
            content: self.content,
        }
    }
}

/// Accept both tag encodings from the admin form
fn tags_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

pub async fn admin_list_blogs(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    let mut posts = state.aggregator.loader().load_all(ContentType::Blog)?;
    posts.sort_by(|a, b| b.published_date().cmp(&a.published_date()));
    Ok(Json(posts))
}

pub async fn admin_create_blog(
    State(state): State<AppState>,
    Json(payload): Json<PostPayload>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    payload.require_fields(true)?;
    let slug = slugs::normalize(&payload.slug);

    if state.aggregator.slug_taken(&slug).await? {
        return Err(
            Error::Validation(format!("A post with slug '{slug}' already exists")).into(),
        );
    }

    let post = state
        .aggregator
        .loader()
        .create(ContentType::Blog, &slug, &payload.into_input())?;

    if let Err(e) = state
        .aggregator
        .engagement()
        .ensure_initialized(&slug, ContentType::Blog)
        .await
    {
        tracing::warn!("Failed to initialize counter for {slug}: {e}");
    }

    Ok((StatusCode::CREATED, Json(post)))
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: String,
}

pub async fn admin_blog_content(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ContentResponse>> {
    let content = state.aggregator.loader().body(ContentType::Blog, &slug)?;
    Ok(Json(ContentResponse { content }))
}

pub async fn admin_update_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<PostPayload>,
) -> ApiResult<Json<Post>> {
    payload.require_fields(false)?;
    let post = state
        .aggregator
        .loader()
        .update(ContentType::Blog, &slug, &payload.into_input())?;
    Ok(Json(post))
}

pub async fn admin_delete_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.aggregator.loader().delete(ContentType::Blog, &slug)?;
    Ok(Json(MessageResponse {
        message: "Blog post deleted".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Admin: Firestore origin
// ---------------------------------------------------------------------------

pub async fn admin_list_remote(State(state): State<AppState>) -> ApiResult<Json<Vec<Value>>> {
    let docs = state
        .store
        .query(BLOGS_COLLECTION, None, Some(OrderBy::desc("createdAt")))
        .await
        .map_err(Error::from)?;

    let records = docs
        .into_iter()
        .map(|doc| {
            let mut fields = doc.fields;
            if let Some(obj) = fields.as_object_mut() {
                obj.insert("id".to_string(), Value::String(doc.id));
            }
            fields
        })
        .collect();
    Ok(Json(records))
}

pub async fn admin_create_remote(
    State(state): State<AppState>,
    Json(payload): Json<PostPayload>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    payload.require_fields(true)?;
    let slug = slugs::normalize(&payload.slug);

    if state.aggregator.slug_taken(&slug).await? {
        return Err(
            Error::Validation(format!("A post with slug '{slug}' already exists")).into(),
        );
    }

    let now = Utc::now().to_rfc3339();
    let fields = json!({
        "title": payload.title,
        "description": payload.description,
        "content": payload.content,
        "tags": tags_from_value(&payload.tags),
        "publishedAt": payload.published_at,
        "bannerAlt": payload.banner_alt,
        "bannerLink": payload.banner_link,
        "slug": slug,
        "createdAt": now,
        "updatedAt": now,
    });

    state
        .store
        .set(BLOGS_COLLECTION, &slug, fields.clone())
        .await
        .map_err(Error::from)?;

    if let Err(e) = state
        .aggregator
        .engagement()
        .ensure_initialized(&slug, ContentType::Blog)
        .await
    {
        tracing::warn!("Failed to initialize counter for {slug}: {e}");
    }

    let mut record = fields;
    if let Some(obj) = record.as_object_mut() {
        obj.insert("id".to_string(), Value::String(slug));
    }
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn admin_remote_content(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ContentResponse>> {
    let doc = state
        .store
        .get(BLOGS_COLLECTION, &slug)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::NotFound(format!("blogs/{slug}")))?;

    Ok(Json(ContentResponse {
        content: doc.str_field("content").unwrap_or_default().to_string(),
    }))
}

pub async fn admin_update_remote(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<PostPayload>,
) -> ApiResult<Json<MessageResponse>> {
    payload.require_fields(false)?;

    if state
        .store
        .get(BLOGS_COLLECTION, &slug)
        .await
        .map_err(Error::from)?
        .is_none()
    {
        return Err(Error::NotFound(format!("blogs/{slug}")).into());
    }

    let fields = json!({
        "title": payload.title,
        "description": payload.description,
        "content": payload.content,
        "tags": tags_from_value(&payload.tags),
        "publishedAt": payload.published_at,
        "bannerAlt": payload.banner_alt,
        "bannerLink": payload.banner_link,
        "updatedAt": Utc::now().to_rfc3339(),
    });

    state
        .store
        .update(BLOGS_COLLECTION, &slug, fields)
        .await
        .map_err(Error::from)?;

    Ok(Json(MessageResponse {
        message: "Blog post updated".to_string(),
    }))
}

pub async fn admin_delete_remote(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    if state
        .store
        .get(BLOGS_COLLECTION, &slug)
        .await
        .map_err(Error::from)?
        .is_none()
    {
        return Err(Error::NotFound(format!("blogs/{slug}")).into());
    }

    state
        .store
        .delete(BLOGS_COLLECTION, &slug)
        .await
        .map_err(Error::from)?;

    Ok(Json(MessageResponse {
        message: "Blog post deleted".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Admin: static pages
// ---------------------------------------------------------------------------

pub async fn admin_home(State(state): State<AppState>) -> Json<HomeContent> {
    Json(state.pages.home())
}

pub async fn admin_set_home(
    State(state): State<AppState>,
    Json(content): Json<HomeContent>,
) -> ApiResult<Json<HomeContent>> {
    state.pages.set_home(&content)?;
    Ok(Json(content))
}

pub async fn admin_about(State(state): State<AppState>) -> Json<AboutContent> {
    Json(state.pages.about())
}

pub async fn admin_set_about(
    State(state): State<AppState>,
    Json(content): Json<AboutContent>,
) -> ApiResult<Json<AboutContent>> {
    state.pages.set_about(&content)?;
    Ok(Json(content))
}
