//! Display context root.
//!
//! The set of style-class tags rendered onto every page's `<html>` element.
//! The theme service keeps exactly one of `dark-mode` / `light-mode` in it.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use portfolio_core::Theme;

/// Shared, mutable set of class tags on the document root.
#[derive(Debug, Clone, Default)]
pub struct DisplayRoot {
    classes: Arc<RwLock<BTreeSet<String>>>,
}

impl DisplayRoot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&self, class: &str) {
        self.write().insert(class.to_owned());
    }

    pub fn remove_class(&self, class: &str) {
        self.write().remove(class);
    }

    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.read().contains(class)
    }

    /// Current classes in sorted order.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.read().iter().cloned().collect()
    }

    /// Classes joined for an HTML `class` attribute.
    #[must_use]
    pub fn class_attr(&self) -> String {
        self.classes().join(" ")
    }

    /// Swap in the class for `theme`, removing the opposite one.
    pub fn apply_theme(&self, theme: Theme) {
        let mut classes = self.write();
        classes.remove(theme.toggled().css_class());
        classes.insert(theme.css_class().to_owned());
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeSet<String>> {
        self.classes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeSet<String>> {
        self.classes.write().unwrap_or_else(PoisonError::into_inner)
    }
}
