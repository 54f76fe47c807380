//! Contact form submission.
//!
//! [`ContactService`] validates a form, hands it to a [`ContactTransport`],
//! and on success appends the stamped message to a list that is persisted
//! as a whole after every append. Submission progress (in flight, last
//! error) is published through a `watch` channel.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use portfolio_core::{ContactForm, ContactMessage, ValidationResult, validate_contact_form};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::instrument;

use crate::services::transport::{ContactTransport, SimulatedTransport, TransportError};
use crate::storage::StorageService;

/// Storage key of the message list.
pub const MESSAGES_KEY: &str = "contact_messages";

/// Shown when a failure carries no message of its own.
pub const SUBMIT_FALLBACK_ERROR: &str = "An error occurred while sending the form";

/// Shown when validation fails without a field message.
const INVALID_FORM_ERROR: &str = "Form validation failed";

/// Why a submission did not produce a stored message.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("contact form is invalid")]
    Invalid(ValidationResult),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SubmitError {
    /// Single human-readable message for the visitor.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(validation) => validation
                .first_error()
                .unwrap_or(INVALID_FORM_ERROR)
                .to_owned(),
            Self::Transport(e) => e.message().unwrap_or(SUBMIT_FALLBACK_ERROR).to_owned(),
        }
    }
}

/// Observable progress of contact submissions. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionState {
    pub in_flight: bool,
    pub last_error: Option<String>,
    #[serde(skip)]
    pending: usize,
}

/// Clears the in-flight flag when the last concurrent submission exits.
struct InFlight<'a> {
    state: &'a watch::Sender<SubmissionState>,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a watch::Sender<SubmissionState>) -> Self {
        state.send_modify(|s| {
            s.pending += 1;
            s.in_flight = true;
            s.last_error = None;
        });
        Self { state }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| {
            s.pending = s.pending.saturating_sub(1);
            s.in_flight = s.pending > 0;
        });
    }
}

/// Owner of the stored contact messages.
#[derive(Debug)]
pub struct ContactService<T = SimulatedTransport> {
    storage: StorageService,
    transport: T,
    messages: Mutex<Vec<ContactMessage>>,
    state: watch::Sender<SubmissionState>,
}

impl<T: ContactTransport> ContactService<T> {
    /// Create the service and load previously stored messages.
    ///
    /// A stored list that cannot be read is logged and treated as empty.
    #[must_use]
    pub fn new(storage: StorageService, transport: T) -> Self {
        let messages = match storage.try_get::<Vec<ContactMessage>>(MESSAGES_KEY) {
            Ok(messages) => messages.unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load contact messages");
                Vec::new()
            }
        };

        tracing::info!(count = messages.len(), "Contact messages loaded");

        let (state, _) = watch::channel(SubmissionState::default());
        Self {
            storage,
            transport,
            messages: Mutex::new(messages),
            state,
        }
    }

    /// Validate and deliver a form, then store it with a timestamp.
    ///
    /// Resets the last error and marks a submission in flight for the whole
    /// call; the flag is cleared on every exit path.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Invalid`] if the form fails validation and
    /// [`SubmitError::Transport`] if delivery fails. Either way the message
    /// list is unchanged and the last error is set.
    #[instrument(skip(self, form))]
    pub async fn submit(&self, form: ContactForm) -> Result<ContactMessage, SubmitError> {
        let _in_flight = InFlight::begin(&self.state);

        let validation = self.validate(&form);
        if !validation.is_valid() {
            let err = SubmitError::Invalid(validation);
            tracing::info!("Contact form rejected by validation");
            self.record_error(&err);
            return Err(err);
        }

        if let Err(e) = self.transport.deliver(&form).await {
            tracing::error!(error = %e, "Failed to submit contact form");
            let err = SubmitError::from(e);
            self.record_error(&err);
            return Err(err);
        }

        let stored = ContactMessage::from_form(form, Utc::now());
        let count = {
            let mut messages = self.synced_messages();
            messages.push(stored.clone());
            self.storage.set(MESSAGES_KEY, &*messages);
            messages.len()
        };

        tracing::info!(count, "Contact message stored");
        Ok(stored)
    }

    /// Field validation without side effects.
    #[must_use]
    pub fn validate(&self, form: &ContactForm) -> ValidationResult {
        validate_contact_form(form)
    }

    /// Snapshot of all stored messages in submission order.
    ///
    /// Reflects changes made to the store by other processes.
    #[must_use]
    pub fn all(&self) -> Vec<ContactMessage> {
        self.synced_messages().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.synced_messages().len()
    }

    /// Drop every stored message, in memory and in storage.
    #[instrument(skip(self))]
    pub fn clear_all(&self) {
        let mut messages = self.lock_messages();
        messages.clear();
        self.storage.remove(MESSAGES_KEY);
        tracing::info!("Contact messages cleared");
    }

    /// Current submission state.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes submission state changes.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    fn record_error(&self, err: &SubmitError) {
        let message = err.user_message();
        self.state.send_modify(|s| s.last_error = Some(message));
    }

    fn lock_messages(&self) -> MutexGuard<'_, Vec<ContactMessage>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the list after refreshing it from storage.
    ///
    /// Another process may share the store, so a readable stored list
    /// replaces the in-memory one. Without a store, or when the stored value
    /// is unreadable, the in-memory list is kept.
    fn synced_messages(&self) -> MutexGuard<'_, Vec<ContactMessage>> {
        let mut messages = self.lock_messages();
        if self.storage.is_available() {
            match self.storage.try_get::<Vec<ContactMessage>>(MESSAGES_KEY) {
                Ok(stored) => *messages = stored.unwrap_or_default(),
                Err(e) => tracing::warn!(error = %e, "Keeping in-memory contact messages"),
            }
        }
        messages
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use portfolio_core::ContactField;

    use super::*;
    use crate::storage::{KeyValueBackend, MemoryBackend};

    /// Transport that always fails.
    struct FailingTransport(Option<&'static str>);

    impl ContactTransport for FailingTransport {
        async fn deliver(&self, _form: &ContactForm) -> Result<(), TransportError> {
            match self.0 {
                Some(message) => Err(TransportError::Rejected(message.to_string())),
                None => Err(TransportError::Unknown),
            }
        }
    }

    fn valid_form() -> ContactForm {
        ContactForm {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Collaboration".to_string(),
            message: "Would you like to work on an engine?".to_string(),
        }
    }

    fn service(backend: &Arc<MemoryBackend>) -> ContactService {
        ContactService::new(
            StorageService::new(Some(backend.clone())),
            SimulatedTransport::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_submission_is_stored_after_delay() {
        let backend = Arc::new(MemoryBackend::new());
        let contact = service(&backend);
        let started = tokio::time::Instant::now();
        let before = Utc::now();

        let stored = contact.submit(valid_form()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(contact.count(), 1);
        assert_eq!(stored.full_name, "Ada Lovelace");
        assert_eq!(stored.email, "ada@example.com");
        assert_eq!(stored.subject, "Collaboration");
        assert_eq!(stored.message, "Would you like to work on an engine?");
        assert!(stored.created_at >= before);
        assert_eq!(contact.all(), vec![stored]);

        let state = contact.state();
        assert!(!state.in_flight);
        assert_eq!(state.last_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_list_persisted_on_each_append() {
        let backend = Arc::new(MemoryBackend::new());
        let contact = service(&backend);

        contact.submit(valid_form()).await.unwrap();
        contact.submit(valid_form()).await.unwrap();

        let raw = backend.get_item("portfolio_contact_messages").unwrap().unwrap();
        let persisted: Vec<ContactMessage> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, contact.all());
        assert_eq!(persisted.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_submission_changes_nothing() {
        let backend = Arc::new(MemoryBackend::new());
        let contact = service(&backend);
        let mut form = valid_form();
        form.message = "short".to_string();

        let err = contact.submit(form).await.unwrap_err();

        match &err {
            SubmitError::Invalid(validation) => {
                assert!(validation.error(ContactField::Message).is_some());
            }
            SubmitError::Transport(_) => panic!("expected validation failure"),
        }
        assert_eq!(contact.count(), 0);
        assert!(backend.get_item("portfolio_contact_messages").unwrap().is_none());

        let state = contact.state();
        assert!(!state.in_flight);
        assert_eq!(
            state.last_error.as_deref(),
            Some("Message must be at least 10 characters")
        );
    }

    #[tokio::test]
    async fn test_transport_failure_sets_last_error() {
        let contact = ContactService::new(
            StorageService::new(Some(Arc::new(MemoryBackend::new()))),
            FailingTransport(Some("Mail server unreachable")),
        );

        let err = contact.submit(valid_form()).await.unwrap_err();

        assert!(matches!(err, SubmitError::Transport(_)));
        assert_eq!(contact.count(), 0);
        let state = contact.state();
        assert!(!state.in_flight);
        assert_eq!(state.last_error.as_deref(), Some("Mail server unreachable"));
    }

    #[tokio::test]
    async fn test_transport_failure_without_message_uses_fallback() {
        let contact = ContactService::new(StorageService::headless(), FailingTransport(None));

        let err = contact.submit(valid_form()).await.unwrap_err();

        assert_eq!(err.user_message(), SUBMIT_FALLBACK_ERROR);
        assert_eq!(contact.state().last_error.as_deref(), Some(SUBMIT_FALLBACK_ERROR));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_attempt_clears_previous_error() {
        let contact = service(&Arc::new(MemoryBackend::new()));
        contact.submit(ContactForm::default()).await.unwrap_err();
        assert!(contact.state().last_error.is_some());

        contact.submit(valid_form()).await.unwrap();
        assert_eq!(contact.state().last_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_visible_while_waiting() {
        let contact = Arc::new(service(&Arc::new(MemoryBackend::new())));
        let mut states = contact.watch_state();

        let task = {
            let contact = contact.clone();
            tokio::spawn(async move { contact.submit(valid_form()).await })
        };

        states.changed().await.unwrap();
        assert!(states.borrow_and_update().in_flight);

        task.await.unwrap().unwrap();
        assert!(!contact.state().in_flight);
    }

    #[test]
    fn test_messages_loaded_at_construction() {
        let stored = vec![ContactMessage::from_form(valid_form(), Utc::now())];
        let backend = Arc::new(MemoryBackend::with_entries([(
            "portfolio_contact_messages",
            serde_json::to_string(&stored).unwrap(),
        )]));

        let contact = service(&backend);
        assert_eq!(contact.all(), stored);
    }

    #[test]
    fn test_unreadable_list_starts_empty() {
        let backend = Arc::new(MemoryBackend::with_entries([(
            "portfolio_contact_messages",
            "{\"not\": \"a list\"}",
        )]));
        assert_eq!(service(&backend).count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_all() {
        let backend = Arc::new(MemoryBackend::new());
        let contact = service(&backend);
        contact.submit(valid_form()).await.unwrap();

        contact.clear_all();

        assert!(contact.all().is_empty());
        assert_eq!(contact.count(), 0);
        assert!(backend.get_item("portfolio_contact_messages").unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_services_sharing_a_file_store_stay_in_sync() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let open = || {
            let backend: Arc<dyn KeyValueBackend> =
                Arc::new(crate::storage::FileBackend::open(&path).unwrap());
            ContactService::new(StorageService::new(Some(backend)), SimulatedTransport::default())
        };
        let site = open();
        let cli = open();

        site.submit(valid_form()).await.unwrap();
        assert_eq!(cli.count(), 1);

        cli.clear_all();
        assert_eq!(site.count(), 0);

        site.submit(valid_form()).await.unwrap();
        assert_eq!(site.count(), 1);
        assert_eq!(cli.all(), site.all());
    }

    #[tokio::test]
    async fn test_headless_service_keeps_messages_in_memory() {
        let contact = ContactService::new(
            StorageService::headless(),
            SimulatedTransport::new(Duration::ZERO),
        );

        contact.submit(valid_form()).await.unwrap();
        contact.submit(valid_form()).await.unwrap();

        assert_eq!(contact.count(), 2);
    }

    #[test]
    fn test_state_json_hides_counter() {
        let json = serde_json::to_value(SubmissionState::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "inFlight": false, "lastError": null })
        );
    }
}
