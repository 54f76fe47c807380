//! Contact page route handlers.
//!
//! The page runs its own field checks before handing the form to the
//! contact service. They are stricter than the service's rules (minimum
//! lengths for the name and subject) and report every field at once.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portfolio_core::{ContactForm, Email, EmailError};
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::routes::chrome::PageChrome;
use crate::services::SubmitError;
use crate::state::AppState;

/// Alert shown when the page-level checks fail.
pub const INCOMPLETE_FORM_ALERT: &str = "Please fill in all the fields correctly.";

/// Alert shown after a successful submission.
pub const SUCCESS_ALERT: &str = "Message sent successfully.";

const MIN_NAME_CHARS: usize = 3;
const MIN_SUBJECT_CHARS: usize = 5;
const MIN_MESSAGE_CHARS: usize = 10;

/// Per-field messages from the page-level checks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    pub full_name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub subject: Option<&'static str>,
    pub message: Option<&'static str>,
}

impl FieldErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.subject.is_none()
            && self.message.is_none()
    }
}

/// Required-and-minimum-length check on a trimmed value.
fn check_length(
    value: &str,
    min: usize,
    required: &'static str,
    too_short: &'static str,
) -> Option<&'static str> {
    let len = value.trim().chars().count();
    if len == 0 {
        Some(required)
    } else if len < min {
        Some(too_short)
    } else {
        None
    }
}

/// Page-level checks on a submitted form.
#[must_use]
pub fn check_form(form: &ContactForm) -> FieldErrors {
    FieldErrors {
        full_name: check_length(
            &form.full_name,
            MIN_NAME_CHARS,
            "Full name is required",
            "Full name must be at least 3 characters",
        ),
        email: match Email::parse(&form.email) {
            Ok(_) => None,
            Err(EmailError::Empty) => Some("Email is required"),
            Err(EmailError::TooLong { .. }) => Some("Email is too long"),
            Err(EmailError::InvalidFormat) => Some("Enter a valid email address"),
        },
        subject: check_length(
            &form.subject,
            MIN_SUBJECT_CHARS,
            "Subject is required",
            "Subject must be at least 5 characters",
        ),
        message: check_length(
            &form.message,
            MIN_MESSAGE_CHARS,
            "Message is required",
            "Message must be at least 10 characters",
        ),
    }
}

/// Banner at the top of the form.
#[derive(Debug, Clone)]
pub struct Alert {
    pub success: bool,
    pub message: String,
}

impl Alert {
    fn success() -> Self {
        Self {
            success: true,
            message: SUCCESS_ALERT.to_string(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Error banner for this submission's own failure.
    fn failure(error: &SubmitError) -> Self {
        Self::error(error.user_message())
    }
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub chrome: PageChrome,
    pub form: ContactForm,
    pub errors: FieldErrors,
    pub alert: Option<Alert>,
    pub message_count: usize,
}

impl ContactTemplate {
    fn new(state: &AppState, form: ContactForm, errors: FieldErrors, alert: Option<Alert>) -> Self {
        Self {
            chrome: PageChrome::new(state, "/contact", "Contact"),
            form,
            errors,
            alert,
            message_count: state.contact().count(),
        }
    }
}

/// Display the empty contact form.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    ContactTemplate::new(&state, ContactForm::default(), FieldErrors::default(), None)
}

/// Handle a contact form submission.
///
/// Failed page checks or service validation re-render the form with the
/// visitor's input and a 422 status; a failed delivery does the same with
/// 502. Success renders an empty form with a confirmation.
#[instrument(skip(state, form))]
pub async fn submit(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Response {
    let errors = check_form(&form);
    if !errors.is_empty() {
        let page = ContactTemplate::new(&state, form, errors, Some(Alert::error(INCOMPLETE_FORM_ALERT)));
        return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
    }

    match state.contact().submit(form.clone()).await {
        Ok(_) => {
            add_breadcrumb("contact", "Contact form submitted", None);
            ContactTemplate::new(
                &state,
                ContactForm::default(),
                FieldErrors::default(),
                Some(Alert::success()),
            )
            .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Contact submission failed");
            let page = ContactTemplate::new(&state, form, FieldErrors::default(), Some(Alert::failure(&e)));
            (failure_status(&e), page).into_response()
        }
    }
}

const fn failure_status(error: &SubmitError) -> StatusCode {
    match error {
        SubmitError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitError::Transport(_) => StatusCode::BAD_GATEWAY,
    }
}
