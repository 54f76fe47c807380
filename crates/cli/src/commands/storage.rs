//! Whole-namespace commands.

use portfolio_site::storage::STORAGE_PREFIX;

use super::Services;

/// Remove every key carrying the site prefix.
#[must_use]
pub fn clear(services: &Services) -> String {
    services.storage.clear_all();
    format!("Cleared all {STORAGE_PREFIX}* keys")
}
