//! Preference bundle API handlers.

use axum::{Json, Router, extract::State, routing::get};
use portfolio_core::UserPreferences;
use tracing::instrument;

use crate::state::AppState;

/// Build the preferences router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/preferences", get(load).put(save))
}

/// Stored preference bundle, or the default bundle.
pub async fn load(State(state): State<AppState>) -> Json<UserPreferences> {
    Json(state.theme().load_preferences())
}

/// Replace the preference bundle. The bundle's theme becomes current.
#[instrument(skip(state, preferences), fields(theme = %preferences.theme))]
pub async fn save(
    State(state): State<AppState>,
    Json(preferences): Json<UserPreferences>,
) -> Json<UserPreferences> {
    state.theme().save_preferences(&preferences);
    Json(state.theme().load_preferences())
}
