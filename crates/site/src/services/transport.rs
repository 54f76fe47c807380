//! Delivery of contact submissions.
//!
//! The site has no mail backend; [`SimulatedTransport`] stands in for one by
//! waiting a fixed delay and reporting success. The trait exists so a real
//! delivery channel can replace it without touching the contact service.

use std::future::Future;
use std::time::Duration;

use portfolio_core::ContactForm;
use thiserror::Error;

/// Failure reported by a [`ContactTransport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// Delivery failed with a message fit for the visitor.
    #[error("{0}")]
    Rejected(String),
    /// Delivery failed without a usable message.
    #[error("contact delivery failed")]
    Unknown,
}

impl TransportError {
    /// Visitor-facing message, if the failure carries one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected(message) if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Delivers a validated contact form somewhere.
pub trait ContactTransport: Send + Sync + 'static {
    /// Deliver one submission. Not cancellable once started.
    fn deliver(
        &self,
        form: &ContactForm,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Transport that waits a fixed delay and always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedTransport {
    delay: Duration,
}

impl SimulatedTransport {
    /// Delay used when none is configured.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl ContactTransport for SimulatedTransport {
    async fn deliver(&self, form: &ContactForm) -> Result<(), TransportError> {
        tracing::debug!(delay_ms = self.delay.as_millis(), subject = %form.subject, "Simulating contact delivery");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
