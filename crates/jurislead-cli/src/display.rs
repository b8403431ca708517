//! Terminal cards and downloadable plain-text reports.
//!
//! Cards print straight to stdout. Reports are built as strings so they can
//! be written to a file or checked in tests.

use std::fmt::Write as _;

use chrono::NaiveDate;
use jurislead_client::history::HistoryStats;
use jurislead_client::models::{DocumentSummary, HealthStatus, HistoryAnalytics, OcrResult};
use jurislead_client::HistorySource;
use jurislead_core::{
    ActivityRecord, AnalysisResult, CaseTimeline, IpcSection, Section, TimelineBrief, UserProfile,
};
use jurislead_search::{LegalTopic, RankedSection};

const MAX_LIST_ITEMS: usize = 10;

pub const ANALYSIS_DISCLAIMER: &str = "This analysis is generated by Aura AI and should be used for informational purposes only.\nPlease consult with a qualified lawyer for legal advice.";
pub const SUMMARY_DISCLAIMER: &str =
    "This summary is generated by AI and should be used for informational purposes only.";

/// What was submitted for analysis, as shown in the report header.
pub struct ReportInput<'a> {
    /// `text`, `pdf`, or `image`.
    pub input_type: &'a str,
    pub file_name: Option<&'a str>,
    /// The typed description, empty for file-only analyses.
    pub text: &'a str,
}

// ── Reports ──

pub fn analysis_report(input: &ReportInput<'_>, result: &AnalysisResult, generated_on: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "JURIS-LEAD LEGAL ANALYSIS REPORT");
    let _ = writeln!(out, "Generated on: {}", generated_on.format("%d/%m/%Y"));
    let _ = writeln!(out);
    let _ = writeln!(out, "INPUT TYPE: {}", input.input_type.to_uppercase());
    if let Some(name) = input.file_name {
        let _ = writeln!(out, "FILE: {name}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "INCIDENT DESCRIPTION:");
    let description = if input.text.trim().is_empty() {
        "File-based analysis"
    } else {
        input.text
    };
    let _ = writeln!(out, "{description}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "SEVERITY ASSESSMENT: {}",
        result.severity.as_str().to_uppercase()
    );
    let _ = writeln!(out, "EXPECTED TIMELINE: {}", result.timeline);
    let _ = writeln!(out);
    let _ = writeln!(out, "APPLICABLE LEGAL SECTIONS:");
    for s in &result.applicable_sections {
        let _ = writeln!(out, "• {}: {}\n  {}", s.section, s.title, s.description);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "RECOMMENDED ACTIONS:");
    for (i, action) in result.recommendations.iter().enumerate() {
        let _ = writeln!(out, "{}. {action}", i + 1);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{ANALYSIS_DISCLAIMER}");
    out
}

pub fn summary_report(summary: &DocumentSummary, file_name: Option<&str>, generated_on: NaiveDate) -> String {
    let or_none = |items: &[String]| {
        if items.is_empty() {
            "None specified".to_string()
        } else {
            items.join(", ")
        }
    };
    let mut out = String::new();
    let _ = writeln!(out, "DOCUMENT SUMMARY");
    let _ = writeln!(out, "Generated on: {}", generated_on.format("%d/%m/%Y"));
    let _ = writeln!(out);
    let _ = writeln!(out, "DOCUMENT TYPE: {}", summary.document_type);
    let _ = writeln!(out, "FILE: {}", file_name.unwrap_or("User Input"));
    let _ = writeln!(out);
    let _ = writeln!(out, "SIMPLE SUMMARY:\n{}\n", summary.simple_summary);
    let _ = writeln!(out, "DETAILED SUMMARY:\n{}\n", summary.detailed_summary);
    let _ = writeln!(out, "KEY POINTS:");
    for (i, point) in summary.key_points.iter().enumerate() {
        let _ = writeln!(out, "{}. {point}", i + 1);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "PARTIES INVOLVED:\n{}\n", or_none(&summary.parties_involved));
    let _ = writeln!(out, "IMPORTANT DATES:\n{}\n", or_none(&summary.important_dates));
    let _ = writeln!(out, "DOCUMENT IMPLICATIONS:\n{}\n", summary.legal_implications);
    let _ = writeln!(out, "ACTION REQUIRED:\n{}\n", summary.action_required);
    let _ = writeln!(out, "URGENCY LEVEL: {}", summary.urgency_level);
    let _ = writeln!(out, "LANGUAGE COMPLEXITY: {}", summary.language_complexity);
    let _ = writeln!(out);
    let _ = writeln!(out, "{SUMMARY_DISCLAIMER}");
    out
}

// ── Cards ──

pub fn print_health(health: &HealthStatus) {
    println!("Analysis service: {}", health.status);
    if !health.timestamp.is_empty() {
        println!("  {:<26} {}", "checked_at", health.timestamp);
    }
    for (service, state) in &health.services {
        println!("  {service:<26} {state}");
    }
}

pub fn print_analysis(result: &AnalysisResult) {
    println!("=== Legal Analysis ===");
    println!("{}", result.summary);
    println!();
    println!("  {:<26} {}", "severity", result.severity.as_str().to_uppercase());
    println!("  {:<26} {}", "timeline", result.timeline);
    println!("  {:<26} {}", "case_type", result.case_type);
    println!();

    print_sections("Applicable Sections", &result.applicable_sections);
    if let Some(defensive) = &result.defensive_sections {
        print_sections("Possible Defences", defensive);
    }
    print_numbered("Recommendations", &result.recommendations);
    print_numbered("Next Steps", &result.next_steps);
}

fn print_sections(header: &str, sections: &[Section]) {
    if sections.is_empty() {
        return;
    }
    println!("{header} ({}):", sections.len());
    for s in sections {
        println!("  {}: {}", s.section, s.title);
        if !s.description.is_empty() {
            println!("      {}", s.description);
        }
        if !s.punishment.is_empty() {
            println!("      Punishment: {}", s.punishment);
        }
    }
    println!();
}

fn print_numbered(header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{header}");
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {item}", i + 1);
    }
    println!();
}

pub fn print_summary(summary: &DocumentSummary) {
    println!("=== {} ===", summary.document_type);
    println!("{}", summary.simple_summary);
    println!();
    if !summary.detailed_summary.is_empty() {
        println!("Details");
        println!("  {}", summary.detailed_summary);
        println!();
    }
    print_numbered("Key Points", &summary.key_points);
    println!("Context");
    print_list("parties", &summary.parties_involved);
    print_list("important_dates", &summary.important_dates);
    println!("  {:<26} {}", "urgency", summary.urgency_level);
    println!("  {:<26} {}", "complexity", summary.language_complexity);
    println!();
    if !summary.legal_implications.is_empty() {
        println!("Implications\n  {}\n", summary.legal_implications);
    }
    if !summary.action_required.is_empty() {
        println!("Action Required\n  {}\n", summary.action_required);
    }
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("  {label:<26} -");
        return;
    }
    let shown: Vec<&str> = items.iter().take(MAX_LIST_ITEMS).map(String::as_str).collect();
    let more = items.len().saturating_sub(MAX_LIST_ITEMS);
    if more > 0 {
        println!("  {label:<26} {} (+{more} more)", shown.join(", "));
    } else {
        println!("  {label:<26} {}", shown.join(", "));
    }
}

pub fn print_ocr(result: &OcrResult) {
    println!("=== Extracted Text ===");
    println!("{}", result.extracted_text);
    println!();
    println!("  {:<26} {:.1}%", "confidence", result.confidence);
    println!("  {:<26} {}", "words", result.metadata.word_count);
    println!("  {:<26} {}", "characters", result.metadata.character_count);
    if let Some(size) = &result.metadata.image_size {
        println!("  {:<26} {}x{}", "image_size", size.width, size.height);
    }
}

pub fn print_section_card(entry: &IpcSection, related: &[&IpcSection]) {
    println!("=== IPC {} ===", entry.section);
    println!("{}", entry.title);
    println!();
    println!("  {}", entry.description);
    println!();
    println!("Classification");
    println!("  {:<26} {}", "severity", entry.severity.as_str());
    println!("  {:<26} {}", "bailable", yes_no(entry.bailable));
    println!("  {:<26} {}", "cognizable", yes_no(entry.cognizable));
    if let Some(category) = &entry.category {
        println!("  {:<26} {category}", "category");
    }
    if let Some(chapter) = &entry.chapter {
        println!("  {:<26} {chapter}", "chapter");
    }
    if !entry.keywords.is_empty() {
        print_list("keywords", &entry.keywords);
    }
    println!();
    println!("Punishment\n  {}\n", entry.punishment);
    if !entry.case_studies.is_empty() {
        print_numbered("Case Studies", &entry.case_studies);
    }
    if !related.is_empty() {
        println!("Related Sections ({}):", related.len());
        for r in related.iter().take(MAX_LIST_ITEMS) {
            println!("  IPC {:<8} {}", r.section, r.title);
        }
        println!();
    }
}

pub fn print_ranked(results: &[RankedSection<'_>]) {
    for r in results {
        let e = r.entry;
        println!(
            "IPC {:<6} {:<40} [{}] score {}",
            e.section,
            truncate(&e.title, 40),
            e.severity.as_str(),
            r.score
        );
    }
}

pub fn print_topics(topics: &[&LegalTopic]) {
    for t in topics {
        println!("{} ({}, {}, {})", t.title, t.category, t.difficulty, t.read_time);
        println!("  {}", t.description);
        println!("  tags: {}", t.tags.join(", "));
    }
}

pub fn print_profile(user: &UserProfile) {
    println!("=== {} ===", user.display_name());
    println!("  {:<26} {}", "email", user.email);
    println!("  {:<26} {}", "role", user.user_role);
    if let Some(phone) = &user.phone_number {
        println!("  {:<26} {phone}", "phone");
    }
    println!("  {:<26} {}", "email_verified", yes_no(user.email_verified));
    println!("  {:<26} {}", "google_account", yes_no(user.is_google_user));
    if !user.date_joined.is_empty() {
        println!("  {:<26} {}", "joined", user.date_joined);
    }
}

pub fn print_history(records: &[&ActivityRecord], source: HistorySource) {
    if source == HistorySource::LocalFallback {
        println!("(history service unavailable; showing history saved on this device)");
    }
    if records.is_empty() {
        println!("No activity found.");
        return;
    }
    for r in records {
        let kind = r.activity_type_display.as_deref().unwrap_or(&r.activity_type);
        println!(
            "{:<38} {:<24} {:<9} {}",
            r.id,
            kind,
            r.status.as_str(),
            r.time_ago
        );
        println!("  {}", r.title);
    }
}

pub fn print_history_stats(stats: &HistoryStats) {
    println!();
    println!(
        "Total {}  Successful {}  Analyses {}  Summaries {}  This Month {}",
        stats.total, stats.successful, stats.analyses, stats.summaries, stats.this_month
    );
}

pub fn print_analytics(report: &HistoryAnalytics) {
    let a = &report.analytics;
    println!("=== Activity summary ===");
    println!("  {:<26} {}", "analyses", a.total_analyses);
    println!("  {:<26} {}", "documents_processed", a.total_documents_processed);
    println!("  {:<26} {}", "cases_created", a.total_cases_created);
    println!("  {:<26} {}", "lawyer_searches", a.total_lawyer_searches);
    println!("  {:<26} {}", "legal_research", a.total_legal_research);
    println!("  {:<26} {} ({:.1} MB)", "files_uploaded", a.total_files_uploaded, a.total_file_size_mb);
    println!("  {:<26} {} min", "time_spent", a.total_time_spent_minutes);
    if let Some(last) = &a.last_activity_date {
        println!("  {:<26} {last}", "last_activity");
    }
    println!(
        "This month: {} analyses, {} documents, {} cases",
        a.monthly_analyses, a.monthly_documents, a.monthly_cases
    );
    if !report.recent_trend.is_empty() {
        println!("Last 7 days:");
        for day in &report.recent_trend {
            println!("  {:<12} {}", day.date, day.count);
        }
    }
    if !report.top_activities.is_empty() {
        println!("Most frequent:");
        for t in &report.top_activities {
            println!("  {:<28} {}", t.activity_type, t.count);
        }
    }
}

pub fn print_timelines(timelines: &[CaseTimeline]) {
    if timelines.is_empty() {
        println!("No case timelines yet.");
        return;
    }
    for t in timelines {
        println!(
            "{:<15} {:<10} {:>3} events  {}",
            t.id,
            t.status.as_str(),
            t.events,
            t.last_updated
        );
        println!("  {}", truncate(&t.name, 60));
    }
}

pub fn print_timeline(timeline: &CaseTimeline, brief: &TimelineBrief) {
    println!("=== {} ({}) ===", timeline.name, timeline.status);
    if !timeline.description.is_empty() {
        println!("{}", timeline.description);
    }
    for e in &timeline.entries {
        println!(
            "{}  {:<8} {:<6} {:<15} {}",
            e.date.format("%d/%m/%Y"),
            e.kind.as_str(),
            e.importance.as_str(),
            e.id,
            e.title
        );
        if !e.description.is_empty() {
            println!("    {}", e.description);
        }
    }
    println!();
    println!("{}", brief.overview);
    println!();
    print_numbered("KEY FACTS:", &brief.key_facts);
    print_numbered("LEGAL CONSIDERATIONS:", &brief.legal_considerations);
    print_numbered("RECOMMENDATIONS:", &brief.recommendations);
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jurislead_core::Severity;

    fn result() -> AnalysisResult {
        AnalysisResult {
            summary: "AI analysis identified 1 applicable IPC sections with high severity.".into(),
            legal_issues: vec!["IPC 379: Theft".into()],
            recommendations: vec!["Consult a lawyer".into(), "Keep receipts".into()],
            severity: Severity::High,
            next_steps: vec![],
            applicable_sections: vec![Section {
                section: "IPC 379".into(),
                title: "Theft".into(),
                description: "Phone taken from a bag".into(),
                punishment: "Up to 3 years".into(),
            }],
            defensive_sections: None,
            timeline: "1-3 months for urgent action".into(),
            case_type: "Criminal Law - IPC Analysis".into(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    #[test]
    fn analysis_report_layout() {
        let input = ReportInput {
            input_type: "text",
            file_name: None,
            text: "My phone was stolen on the bus",
        };
        let report = analysis_report(&input, &result(), date());
        assert!(report.starts_with("JURIS-LEAD LEGAL ANALYSIS REPORT\nGenerated on: 10/06/2025\n"));
        assert!(report.contains("INPUT TYPE: TEXT\n"));
        assert!(!report.contains("FILE:"));
        assert!(report.contains("INCIDENT DESCRIPTION:\nMy phone was stolen on the bus\n"));
        assert!(report.contains("SEVERITY ASSESSMENT: HIGH\n"));
        assert!(report.contains("• IPC 379: Theft\n  Phone taken from a bag\n"));
        assert!(report.contains("1. Consult a lawyer\n2. Keep receipts\n"));
        assert!(report.trim_end().ends_with("Please consult with a qualified lawyer for legal advice."));
    }

    #[test]
    fn file_analysis_report() {
        let input = ReportInput {
            input_type: "pdf",
            file_name: Some("fir.pdf"),
            text: "",
        };
        let report = analysis_report(&input, &result(), date());
        assert!(report.contains("INPUT TYPE: PDF\nFILE: fir.pdf\n"));
        assert!(report.contains("INCIDENT DESCRIPTION:\nFile-based analysis\n"));
    }

    #[test]
    fn summary_report_layout() {
        let summary = DocumentSummary {
            document_type: "Rental Agreement".into(),
            simple_summary: "An eleven month lease.".into(),
            detailed_summary: "Rent is due on the fifth.".into(),
            key_points: vec!["Deposit of two months".into()],
            parties_involved: vec![],
            important_dates: vec!["2025-07-01".into(), "2026-05-31".into()],
            legal_implications: "Standard residential lease.".into(),
            action_required: "Sign before moving in.".into(),
            urgency_level: "Low".into(),
            language_complexity: "Simple".into(),
        };
        let report = summary_report(&summary, None, date());
        assert!(report.starts_with("DOCUMENT SUMMARY\nGenerated on: 10/06/2025\n"));
        assert!(report.contains("FILE: User Input\n"));
        assert!(report.contains("KEY POINTS:\n1. Deposit of two months\n"));
        assert!(report.contains("PARTIES INVOLVED:\nNone specified\n"));
        assert!(report.contains("IMPORTANT DATES:\n2025-07-01, 2026-05-31\n"));
        assert!(report.contains("URGENCY LEVEL: Low\nLANGUAGE COMPLEXITY: Simple\n"));
        assert!(report.trim_end().ends_with(SUMMARY_DISCLAIMER));
    }

    #[test]
    fn truncate_long_titles() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 10), "abcdefg...");
    }
}
