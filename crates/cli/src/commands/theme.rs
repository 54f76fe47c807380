//! Theme commands.

use portfolio_core::Theme;

use super::Services;

#[must_use]
pub fn show(services: &Services) -> String {
    services.theme.current().to_string()
}

#[must_use]
pub fn set(services: &Services, theme: Theme) -> String {
    services.theme.set(theme);
    format!("Theme set to {theme}")
}

#[must_use]
pub fn toggle(services: &Services) -> String {
    format!("Theme set to {}", services.theme.toggle())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::test_support::services;

    #[test]
    fn test_fresh_store_is_light() {
        let (_dir, services) = services();
        assert_eq!(show(&services), "light");
    }

    #[test]
    fn test_set_and_toggle_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let services = Services::open(&path).unwrap();
        assert_eq!(set(&services, Theme::Dark), "Theme set to dark");
        drop(services);

        let services = Services::open(&path).unwrap();
        assert_eq!(show(&services), "dark");
        assert_eq!(toggle(&services), "Theme set to light");
        drop(services);

        assert_eq!(show(&Services::open(&path).unwrap()), "light");
    }
}
