//! Core types for the portfolio.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the site and the CLI.

pub mod contact;
pub mod email;
pub mod id;
pub mod preferences;
pub mod project;
pub mod theme;

pub use contact::{ContactField, ContactForm, ContactMessage, ValidationResult, validate_contact_form};
pub use email::{Email, EmailError, is_valid_email};
pub use id::*;
pub use preferences::{FontSize, FontSizeParseError, UserPreferences};
pub use project::Project;
pub use theme::{Theme, ThemeParseError};
