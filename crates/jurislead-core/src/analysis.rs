//! Case analysis shapes: the request sent to the backend, the backend's
//! response, and the display shape the front end renders and stores.

use serde::{Deserialize, Serialize};

/// Who is asking for the analysis. The backend tailors wording to this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Citizen,
    Lawyer,
    LawStudent,
    LegalAid,
}

/// How a matched lawyer may reach the citizen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    Email,
    Telegram,
    Phone,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Body of `POST /leads/analyze-case/`.
///
/// Only `case_description` is required; the remaining fields are structured
/// incident metadata and are omitted from the JSON when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub case_description: String,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<chrono::NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_method: Option<ContactMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub create_lead: bool,
}

impl AnalysisRequest {
    pub fn new(case_description: impl Into<String>) -> Self {
        Self {
            case_description: case_description.into(),
            ..Default::default()
        }
    }
}

/// One IPC section as returned by the analysis backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendSection {
    pub section_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Older backends send `why_applied`.
    #[serde(default, alias = "why_applied")]
    pub why_applicable: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punishment: Option<String>,
}

/// Response of `POST /leads/analyze-case/`.
///
/// `applicable_ipc_sections` is mandatory: a payload without it is rejected
/// at deserialisation. `severity` is kept as the raw backend string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub applicable_ipc_sections: Vec<BackendSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defensive_ipc_sections: Option<Vec<BackendSection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sections_identified: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_timestamp: Option<String>,
}

/// Display severity of a legal matter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    /// Map a backend severity string (`High`, `Medium`, `Low`).
    ///
    /// Returns `None` for anything else so callers can decide on a default.
    pub fn from_backend(raw: &str) -> Option<Self> {
        match raw {
            "High" => Some(Self::High),
            "Medium" => Some(Self::Medium),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A section in display form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub section: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub punishment: String,
}

/// Analysis result in the shape rendered by the analyzer and stored in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub legal_issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub severity: Severity,
    pub next_steps: Vec<String>,
    pub applicable_sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defensive_sections: Option<Vec<Section>>,
    pub timeline: String,
    pub case_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_unset_metadata() {
        let req = AnalysisRequest::new("my phone was snatched near the station");
        let json = serde_json::to_value(&req).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(json["user_type"], "citizen");
    }

    #[test]
    fn request_serialises_metadata() {
        let req = AnalysisRequest {
            incident_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 14),
            contact_method: Some(ContactMethod::Telegram),
            urgency_level: Some(UrgencyLevel::Critical),
            create_lead: true,
            ..AnalysisRequest::new("x")
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["incident_date"], "2025-03-14");
        assert_eq!(json["contact_method"], "telegram");
        assert_eq!(json["urgency_level"], "critical");
        assert_eq!(json["create_lead"], true);
    }

    #[test]
    fn response_requires_sections() {
        let json = r#"{"severity": "High"}"#;
        assert!(serde_json::from_str::<AnalysisResponse>(json).is_err());
    }

    #[test]
    fn response_accepts_why_applied_alias() {
        let json = r#"{
            "applicable_ipc_sections": [
                {"section_number": "379", "description": "Theft", "why_applied": "property taken"}
            ]
        }"#;
        let resp: AnalysisResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.applicable_ipc_sections[0].why_applicable, "property taken");
        assert!(resp.severity.is_none());
    }

    #[test]
    fn severity_from_backend() {
        assert_eq!(Severity::from_backend("High"), Some(Severity::High));
        assert_eq!(Severity::from_backend("Low"), Some(Severity::Low));
        assert_eq!(Severity::from_backend("high"), None);
        assert_eq!(Severity::from_backend("Critical"), None);
    }

    #[test]
    fn result_uses_camel_case() {
        let result = AnalysisResult {
            summary: "s".into(),
            legal_issues: vec![],
            recommendations: vec![],
            severity: Severity::Low,
            next_steps: vec![],
            applicable_sections: vec![],
            defensive_sections: None,
            timeline: "t".into(),
            case_type: "c".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("legalIssues").is_some());
        assert!(json.get("caseType").is_some());
        assert!(json.get("defensiveSections").is_none());
        assert_eq!(json["severity"], "low");
    }
}
