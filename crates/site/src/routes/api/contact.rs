//! Contact API handlers.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use portfolio_core::{ContactField, ContactForm, ContactMessage};
use serde::Serialize;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::middleware::contact_rate_limiter;
use crate::services::{SubmissionState, SubmitError};
use crate::state::AppState;

/// Build the contact router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(submit).layer(contact_rate_limiter()))
        .route("/api/contact/messages", get(messages).delete(clear))
        .route("/api/contact/status", get(status))
}

/// Stored messages with their count.
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub count: usize,
    pub messages: Vec<ContactMessage>,
}

/// Response for form submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<ContactMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<ContactField, String>,
}

impl ContactResponse {
    fn failure(error: &SubmitError) -> Self {
        let field_errors = match error {
            SubmitError::Invalid(validation) => validation.field_errors.clone(),
            SubmitError::Transport(_) => BTreeMap::new(),
        };
        Self {
            success: false,
            message: None,
            error: Some(error.user_message()),
            field_errors,
        }
    }
}

/// All stored messages.
pub async fn messages(State(state): State<AppState>) -> Json<MessagesResponse> {
    let messages = state.contact().all();
    Json(MessagesResponse {
        count: messages.len(),
        messages,
    })
}

/// Drop every stored message.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.contact().clear_all();
    StatusCode::NO_CONTENT
}

/// Current submission state.
pub async fn status(State(state): State<AppState>) -> Json<SubmissionState> {
    Json(state.contact().state())
}

/// Submit a contact form.
///
/// Returns 201 with the stored message, 422 with per-field errors when the
/// form is invalid, or 502 when delivery fails.
#[instrument(skip(state, form))]
pub async fn submit(State(state): State<AppState>, Json(form): Json<ContactForm>) -> Response {
    match state.contact().submit(form).await {
        Ok(message) => {
            add_breadcrumb("contact", "Contact form submitted", None);
            (
                StatusCode::CREATED,
                Json(ContactResponse {
                    success: true,
                    message: Some(message),
                    error: None,
                    field_errors: BTreeMap::new(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            let status = match &e {
                SubmitError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                SubmitError::Transport(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(ContactResponse::failure(&e))).into_response()
        }
    }
}
