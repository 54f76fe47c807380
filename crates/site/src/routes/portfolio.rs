//! Portfolio page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use portfolio_core::Project;
use tracing::instrument;

use crate::filters;
use crate::projects::featured_projects;
use crate::routes::chrome::PageChrome;
use crate::state::AppState;

/// Portfolio page template.
#[derive(Template, WebTemplate)]
#[template(path = "portfolio.html")]
pub struct PortfolioTemplate {
    pub chrome: PageChrome,
    pub projects: Vec<Project>,
}

/// Display the project listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    PortfolioTemplate {
        chrome: PageChrome::new(&state, "/portfolio", "Portfolio"),
        projects: featured_projects(),
    }
}
