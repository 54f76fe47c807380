//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::routes::chrome::PageChrome;
use crate::state::AppState;

/// Skills listed in the home page introduction.
const SKILLS: &[&str] = &["Rust", "Java", "SQL", "HTML", "CSS", "JavaScript"];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: PageChrome,
    pub skills: &'static [&'static str],
    pub project_count: usize,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    HomeTemplate {
        chrome: PageChrome::new(&state, "/", "Home"),
        skills: SKILLS,
        project_count: crate::projects::featured_projects().len(),
    }
}
