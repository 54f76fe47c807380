//! Portfolio project records.

use serde::{Deserialize, Serialize};

use crate::types::id::ProjectId;

/// A project shown on the portfolio page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
}

impl Project {
    /// Technologies joined for compact display, e.g. `"Java · MySQL"`.
    #[must_use]
    pub fn technology_summary(&self) -> String {
        self.technologies.join(" · ")
    }
}
