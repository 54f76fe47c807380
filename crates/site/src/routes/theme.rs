//! Theme form handlers.
//!
//! The layout's toggle button posts here and is redirected back to the page
//! it came from, which then renders with the new `<html>` class.

use axum::{Form, extract::State, response::Redirect};
use portfolio_core::Theme;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Form body of `POST /theme/toggle`.
#[derive(Debug, Default, Deserialize)]
pub struct ToggleForm {
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Form body of `POST /theme`.
#[derive(Debug, Deserialize)]
pub struct SetThemeForm {
    pub theme: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Redirect target: a local absolute path, or the home page.
fn back_to(return_to: Option<&str>) -> Redirect {
    let target = return_to
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or("/");
    Redirect::to(target)
}

/// Flip between light and dark.
#[instrument(skip(state, form))]
pub async fn toggle(State(state): State<AppState>, Form(form): Form<ToggleForm>) -> Redirect {
    let theme = state.theme().toggle();
    add_breadcrumb("theme", "Theme toggled", Some(&[("theme", theme.as_str())]));
    back_to(form.return_to.as_deref())
}

/// Set an explicit theme.
///
/// # Errors
///
/// Returns 400 if the theme name is not `light` or `dark`.
#[instrument(skip(state, form), fields(theme = %form.theme))]
pub async fn set(State(state): State<AppState>, Form(form): Form<SetThemeForm>) -> Result<Redirect> {
    let theme: Theme = form
        .theme
        .parse()
        .map_err(|e: portfolio_core::ThemeParseError| AppError::BadRequest(e.to_string()))?;

    state.theme().set(theme);
    add_breadcrumb("theme", "Theme set", Some(&[("theme", theme.as_str())]));
    Ok(back_to(form.return_to.as_deref()))
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    fn location(redirect: Redirect) -> String {
        redirect.into_response().headers()["location"]
            .to_str()
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_back_to_accepts_local_paths_only() {
        assert_eq!(location(back_to(Some("/portfolio"))), "/portfolio");
        assert_eq!(location(back_to(Some("//evil.example"))), "/");
        assert_eq!(location(back_to(Some("https://evil.example"))), "/");
        assert_eq!(location(back_to(None)), "/");
    }
}
