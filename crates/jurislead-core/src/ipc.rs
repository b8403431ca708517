//! Static Indian Penal Code reference entries.

use serde::{Deserialize, Serialize};

/// Severity band of an offence in the reference dataset.
///
/// Declared high-to-low so the derived `Ord` ranks `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionSeverity {
    High,
    Medium,
    Low,
}

impl SectionSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// One section of the penal code as bundled with the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpcSection {
    /// Section identifier, e.g. `"302"` or `"498A"`.
    pub section: String,
    pub title: String,
    pub description: String,
    pub punishment: String,
    pub severity: SectionSeverity,
    pub bailable: bool,
    pub cognizable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub related_sections: Vec<String>,
    #[serde(default)]
    pub case_studies: Vec<String>,
}
