//! JSON API route handlers.

pub mod contact;
pub mod preferences;
pub mod theme;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(theme::router())
        .merge(preferences::router())
        .merge(contact::router())
}
