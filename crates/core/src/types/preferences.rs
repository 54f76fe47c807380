//! User preference bundle.

use serde::{Deserialize, Serialize};

use crate::types::theme::Theme;

/// Error returned when a string does not name a [`FontSize`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid font size: {0} (expected `small`, `medium` or `large`)")]
pub struct FontSizeParseError(pub String);

/// Base font size selected by the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl std::fmt::Display for FontSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}

impl std::str::FromStr for FontSize {
    type Err = FontSizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(FontSizeParseError(s.to_owned())),
        }
    }
}

/// The full user-settings record.
///
/// Persisted as one JSON value and replaced wholesale on every save; there is
/// no per-field update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub theme: Theme,
    pub language: String,
    pub font_size: FontSize,
    pub notifications: bool,
}

impl UserPreferences {
    /// Language used when nothing has been saved.
    pub const DEFAULT_LANGUAGE: &'static str = "es";
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: Self::DEFAULT_LANGUAGE.to_string(),
            font_size: FontSize::Medium,
            notifications: true,
        }
    }
}
