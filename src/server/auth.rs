//! Admin access gate
//!
//! Simple allow/deny middleware for the admin subtree: the request origin
//! must match the configured site origin, and the bearer token must match
//! the configured secret. Public content routes are not gated.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};

use super::error::ErrorBody;
use super::AppState;

pub async fn access_gate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());

    if !origin_allowed(&state, origin) {
        tracing::warn!("Rejected admin request with origin {:?}", origin);
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorBody {
                message: "Forbidden".to_string(),
            }),
        )
            .into_response();
    }

    if !token_allowed(&state, bearer_token(&req)) {
        tracing::warn!("Rejected admin request with invalid bearer token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                message: "Unauthorized".to_string(),
            }),
        )
            .into_response();
    }

    next.run(req).await
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn origin_allowed(state: &AppState, origin: Option<&str>) -> bool {
    let Some(origin) = origin else {
        return false;
    };
    if origin == state.config.url {
        return true;
    }
    // Local development also accepts the loopback origin
    state.config.environment.is_development()
        && origin == format!("http://localhost:{}", state.config.server.port)
}

fn token_allowed(state: &AppState, token: Option<&str>) -> bool {
    let expected = &state.config.server.bearer_token;
    if expected.is_empty() {
        // No secret configured, the origin check stands alone
        return true;
    }
    token == Some(expected.as_str())
}
