//! Turn the backend's analysis payload into the display shape.

use chrono::DateTime;
use jurislead_core::{AnalysisResponse, AnalysisResult, BackendSection, Section, Severity};
use tracing::warn;

pub const CASE_TYPE: &str = "Criminal Law - IPC Analysis";

pub const RECOMMENDATIONS: [&str; 5] = [
    "Consult with a qualified legal professional immediately",
    "Document all relevant evidence and maintain records",
    "Gather witness statements if applicable",
    "Preserve any physical or digital evidence",
    "Consider filing a formal complaint with appropriate authorities",
];

pub const NEXT_STEPS: [&str; 4] = [
    "Schedule consultation with recommended lawyers",
    "Prepare comprehensive case documentation",
    "Review applicable legal sections in detail",
    "Consider alternative dispute resolution options",
];

/// Expected time to resolution for a severity.
pub fn timeline_for(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "1-3 months for urgent action",
        Severity::Medium => "2-6 months for resolution",
        Severity::Low => "3-12 months for standard proceedings",
    }
}

/// Map an analysis response to its display form. Pure apart from logging.
///
/// A missing or unrecognised severity becomes `medium`. The completion
/// date is the timestamp's calendar date when it parses as RFC 3339, the
/// raw timestamp otherwise.
pub fn transform_analysis_response(resp: &AnalysisResponse) -> AnalysisResult {
    let severity = match resp.severity.as_deref() {
        Some(raw) => Severity::from_backend(raw).unwrap_or_else(|| {
            warn!(severity = raw, "unrecognised severity from backend, using medium");
            Severity::Medium
        }),
        None => {
            warn!("analysis response has no severity, using medium");
            Severity::Medium
        }
    };

    let count = resp
        .total_sections_identified
        .map(|n| n as usize)
        .unwrap_or(resp.applicable_ipc_sections.len());
    let completed_on = match resp.analysis_timestamp.as_deref() {
        Some(ts) => DateTime::parse_from_rfc3339(ts)
            .map(|dt| dt.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|_| ts.to_string()),
        None => "an unknown date".to_string(),
    };

    let defensive_sections = resp
        .defensive_ipc_sections
        .as_ref()
        .filter(|s| !s.is_empty())
        .map(|s| s.iter().map(display_section).collect());

    AnalysisResult {
        summary: format!(
            "AI analysis identified {count} applicable IPC sections with {severity} severity. \
             This analysis was completed on {completed_on}."
        ),
        legal_issues: resp
            .applicable_ipc_sections
            .iter()
            .map(|s| format!("IPC {}: {}", s.section_number, s.description))
            .collect(),
        recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
        severity,
        next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        applicable_sections: resp
            .applicable_ipc_sections
            .iter()
            .map(display_section)
            .collect(),
        defensive_sections,
        timeline: timeline_for(severity).to_string(),
        case_type: CASE_TYPE.to_string(),
    }
}

fn display_section(s: &BackendSection) -> Section {
    let title = match s.section_title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => {
            let head = s.description.split(':').next().unwrap_or_default().trim();
            if head.is_empty() {
                s.description.clone()
            } else {
                head.to_string()
            }
        }
    };
    Section {
        section: format!("IPC {}", s.section_number),
        title,
        description: s.why_applicable.clone(),
        punishment: s.punishment.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(v: serde_json::Value) -> AnalysisResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn high_severity_fixture() {
        let resp = response(json!({
            "applicable_ipc_sections": [{
                "section_number": "302",
                "description": "Murder: intentional killing",
                "why_applicable": "Victim was killed deliberately",
                "punishment": "Death or imprisonment for life"
            }],
            "severity": "High",
            "total_sections_identified": 1,
            "analysis_timestamp": "2025-06-10T12:00:00+05:30"
        }));
        let result = transform_analysis_response(&resp);

        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.timeline, "1-3 months for urgent action");
        assert_eq!(result.legal_issues, vec!["IPC 302: Murder: intentional killing"]);
        assert_eq!(
            result.applicable_sections,
            vec![Section {
                section: "IPC 302".into(),
                title: "Murder".into(),
                description: "Victim was killed deliberately".into(),
                punishment: "Death or imprisonment for life".into(),
            }]
        );
        assert_eq!(
            result.summary,
            "AI analysis identified 1 applicable IPC sections with high severity. \
             This analysis was completed on 10/06/2025."
        );
        assert_eq!(result.recommendations.len(), 5);
        assert_eq!(result.next_steps.len(), 4);
        assert_eq!(result.case_type, CASE_TYPE);
        assert!(result.defensive_sections.is_none());
    }

    #[test]
    fn section_title_preferred_over_description() {
        let resp = response(json!({
            "applicable_ipc_sections": [{
                "section_number": "420",
                "section_title": "Cheating",
                "description": "Dishonest inducement: property delivered",
                "why_applicable": "Money taken on a false promise"
            }],
            "severity": "Medium"
        }));
        let result = transform_analysis_response(&resp);
        assert_eq!(result.applicable_sections[0].title, "Cheating");
        assert_eq!(result.applicable_sections[0].punishment, "");
        assert_eq!(result.timeline, "2-6 months for resolution");
    }

    #[test]
    fn unknown_severity_defaults_to_medium() {
        for sev in [json!("Critical"), json!("high"), serde_json::Value::Null] {
            let resp = response(json!({
                "applicable_ipc_sections": [],
                "severity": sev
            }));
            let result = transform_analysis_response(&resp);
            assert_eq!(result.severity, Severity::Medium);
            assert_eq!(result.timeline, "2-6 months for resolution");
        }
    }

    #[test]
    fn low_severity_timeline() {
        let resp = response(json!({"applicable_ipc_sections": [], "severity": "Low"}));
        assert_eq!(
            transform_analysis_response(&resp).timeline,
            "3-12 months for standard proceedings"
        );
    }

    #[test]
    fn count_falls_back_to_section_list() {
        let resp = response(json!({
            "applicable_ipc_sections": [
                {"section_number": "323", "description": "Hurt", "why_applicable": "Slapped"},
                {"section_number": "506", "description": "Intimidation", "why_applicable": "Threatened"}
            ],
            "severity": "Low",
            "analysis_timestamp": "yesterday"
        }));
        let result = transform_analysis_response(&resp);
        assert!(result.summary.starts_with("AI analysis identified 2 applicable IPC sections"));
        assert!(result.summary.ends_with("completed on yesterday."));
        assert_eq!(result.applicable_sections[1].title, "Intimidation");
    }

    #[test]
    fn defensive_sections_empty_is_none() {
        let resp = response(json!({
            "applicable_ipc_sections": [],
            "defensive_ipc_sections": [],
            "severity": "Low"
        }));
        assert!(transform_analysis_response(&resp).defensive_sections.is_none());

        let resp = response(json!({
            "applicable_ipc_sections": [],
            "defensive_ipc_sections": [{
                "section_number": "96",
                "description": "Private defence: acts in private defence",
                "why_applicable": "Accused acted to protect themselves"
            }],
            "severity": "Low"
        }));
        let defensive = transform_analysis_response(&resp).defensive_sections.unwrap();
        assert_eq!(defensive[0].section, "IPC 96");
        assert_eq!(defensive[0].title, "Private defence");
    }
}
