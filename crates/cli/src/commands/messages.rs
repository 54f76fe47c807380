//! Contact message commands.

use super::{CliError, Services};

/// Stored messages as pretty JSON.
///
/// # Errors
///
/// Returns an error if the messages cannot be encoded.
pub fn list(services: &Services) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(&services.contact.all())?)
}

#[must_use]
pub fn count(services: &Services) -> String {
    services.contact.count().to_string()
}

/// Delete every stored message and report how many were removed.
#[must_use]
pub fn clear(services: &Services) -> String {
    let removed = services.contact.count();
    services.contact.clear_all();
    format!("Removed {removed} messages")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use portfolio_core::{ContactForm, ContactMessage};
    use portfolio_site::services::MESSAGES_KEY;

    use super::*;
    use crate::commands::test_support::services;

    #[test]
    fn test_empty_store() {
        let (_dir, services) = services();
        assert_eq!(list(&services).unwrap(), "[]");
        assert_eq!(count(&services), "0");
    }

    #[test]
    fn test_list_and_clear_stored_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        {
            let seed = Services::open(&path).unwrap();
            let message = ContactMessage::from_form(
                ContactForm {
                    full_name: "Ada Lovelace".to_string(),
                    email: "ada@example.com".to_string(),
                    subject: "Engines".to_string(),
                    message: "Let us build an engine.".to_string(),
                },
                Utc::now(),
            );
            seed.storage.set(MESSAGES_KEY, &[message]);
        }

        let services = Services::open(&path).unwrap();
        assert_eq!(count(&services), "1");
        assert!(list(&services).unwrap().contains("\"fullName\": \"Ada Lovelace\""));

        assert_eq!(clear(&services), "Removed 1 messages");
        assert_eq!(count(&Services::open(&path).unwrap()), "0");
    }
}
