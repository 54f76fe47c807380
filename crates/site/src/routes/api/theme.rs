//! Theme API handlers.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use portfolio_core::Theme;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Build the theme router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/theme", get(current).put(set))
        .route("/api/theme/toggle", post(toggle))
}

/// Body of every theme response, and of `PUT /api/theme`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeBody {
    pub theme: Theme,
}

/// Current theme.
pub async fn current(State(state): State<AppState>) -> Json<ThemeBody> {
    Json(ThemeBody {
        theme: state.theme().current(),
    })
}

/// Set the theme.
#[instrument(skip(state, body), fields(theme = %body.theme))]
pub async fn set(State(state): State<AppState>, Json(body): Json<ThemeBody>) -> Json<ThemeBody> {
    state.theme().set(body.theme);
    add_breadcrumb("theme", "Theme set", Some(&[("theme", body.theme.as_str())]));
    Json(ThemeBody {
        theme: state.theme().current(),
    })
}

/// Flip between light and dark.
#[instrument(skip(state))]
pub async fn toggle(State(state): State<AppState>) -> Json<ThemeBody> {
    let theme = state.theme().toggle();
    add_breadcrumb("theme", "Theme toggled", Some(&[("theme", theme.as_str())]));
    Json(ThemeBody { theme })
}
