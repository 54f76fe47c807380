//! Site-wide services.
//!
//! Each service is created once in the composition root and shared through
//! [`AppState`](crate::state::AppState).

pub mod contact;
pub mod theme;
pub mod transport;

pub use contact::{ContactService, MESSAGES_KEY, SubmissionState, SubmitError};
pub use theme::{PREFERENCES_KEY, THEME_KEY, ThemeService};
pub use transport::{ContactTransport, SimulatedTransport, TransportError};
