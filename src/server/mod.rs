//! HTTP API server

mod auth;
mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::aggregate::ContentAggregator;
use crate::content::pages::PageStore;
use crate::content::MdxLoader;
use crate::guestbook::Guestbook;
use crate::store::DocumentStore;
use crate::Folio;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub aggregator: ContentAggregator,
    pub guestbook: Guestbook,
    pub pages: Arc<PageStore>,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(folio: &Folio, store: Arc<dyn DocumentStore>) -> Self {
        let aggregator =
            ContentAggregator::new(MdxLoader::new(&folio.content_dir), store.clone());
        let guestbook = Guestbook::new(store.clone(), folio.config.environment);
        let pages = Arc::new(PageStore::new(&folio.pages_dir));

        Self {
            config: Arc::new(folio.config.clone()),
            aggregator,
            guestbook,
            pages,
            store,
        }
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Admin routes sit behind the origin/bearer access gate
    let admin = Router::new()
        .route(
            "/blogs",
            get(handlers::admin_list_blogs).post(handlers::admin_create_blog),
        )
        .route(
            "/blogs/:slug",
            get(handlers::admin_blog_content)
                .put(handlers::admin_update_blog)
                .delete(handlers::admin_delete_blog),
        )
        .route(
            "/fb",
            get(handlers::admin_list_remote).post(handlers::admin_create_remote),
        )
        .route(
            "/fb/:slug",
            get(handlers::admin_remote_content)
                .put(handlers::admin_update_remote)
                .delete(handlers::admin_delete_remote),
        )
        .route(
            "/pages/home",
            get(handlers::admin_home).put(handlers::admin_set_home),
        )
        .route(
            "/pages/about",
            get(handlers::admin_about).put(handlers::admin_set_about),
        )
        .route("/statistics", get(handlers::admin_content_data))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::access_gate,
        ));

    Router::new()
        .route("/api/blog", get(handlers::list_blog))
        .route("/api/blog/:slug", get(handlers::blog_detail))
        .route("/api/tags", get(handlers::list_tags))
        .route("/api/views/:slug", post(handlers::record_view))
        .route("/api/likes/:slug", post(handlers::toggle_like))
        .route(
            "/api/guestbook",
            get(handlers::guestbook_list).post(handlers::guestbook_create),
        )
        .route("/api/guestbook/:id", delete(handlers::guestbook_delete))
        .route("/api/statistics", get(handlers::statistics))
        .nest("/api/admin", admin)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start the API server
pub async fn start(folio: &Folio, store: Arc<dyn DocumentStore>) -> Result<()> {
    let state = AppState::new(folio, store);
    let host = folio.config.server.host.clone();
    let port = folio.config.server.port;

    let app = create_router(state);

    let bind_host = if host == "localhost" {
        "127.0.0.1"
    } else {
        host.as_str()
    };
    let addr: SocketAddr = format!("{bind_host}:{port}").parse()?;

    tracing::info!("API server listening on http://{host}:{port}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
