//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store usable)
//!
//! # Pages
//! GET  /portfolio              - Project listing
//! GET  /contact                - Contact form
//! POST /contact                - Submit contact form (rate limited)
//!
//! # Theme (form posts, redirect back)
//! POST /theme/toggle           - Flip light/dark
//! POST /theme                  - Set an explicit theme
//!
//! # JSON API
//! GET  /api/theme              - Current theme
//! PUT  /api/theme              - Set theme
//! POST /api/theme/toggle       - Flip light/dark
//! GET  /api/preferences        - Preference bundle
//! PUT  /api/preferences        - Replace preference bundle
//! GET  /api/contact/messages   - Stored contact messages
//! DELETE /api/contact/messages - Clear stored contact messages
//! GET  /api/contact/status     - Submission state
//! POST /api/contact            - Submit contact form (rate limited)
//!
//! GET  /static/*               - Stylesheet
//! *                            - Redirect to /
//! ```

pub mod api;
pub mod chrome;
pub mod contact;
pub mod home;
pub mod portfolio;
pub mod theme;

use axum::{
    Router,
    extract::State,
    middleware::from_fn,
    response::Redirect,
    routing::{get, post},
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::error::{AppError, Result};
use crate::middleware::{
    contact_rate_limiter, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the page routes.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/portfolio", get(portfolio::index))
        .route(
            "/contact",
            get(contact::show).merge(post(contact::submit).layer(contact_rate_limiter())),
        )
}

/// Create the theme form routes.
pub fn theme_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(theme::set))
        .route("/toggle", post(theme::toggle))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(page_routes())
        .nest("/theme", theme_routes())
        .merge(api::router())
}

/// Build the complete application with middleware and static assets.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().static_dir);

    routes()
        .nest_service("/static", static_dir)
        .fallback(fallback)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Fails when a store is configured but cannot be read and written.
async fn readiness(State(state): State<AppState>) -> Result<&'static str> {
    state
        .storage_ready()
        .map_err(|e| AppError::Internal(format!("key-value store not ready: {e}")))?;
    Ok("ok")
}

/// Unknown paths go back to the home page.
async fn fallback() -> Redirect {
    Redirect::to("/")
}
