//! Case timelines: dated events a user collects while building a case.
//!
//! Timelines are kept on the device under `juris-timelines`. Each stored
//! timeline carries the dashboard summary (`events` count, `lastUpdated`,
//! `status`) next to its events, ordered by date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Incident,
    Document,
    Date,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incident => "incident",
            Self::Document => "document",
            Self::Date => "date",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineStatus {
    #[default]
    Active,
    Completed,
    Pending,
}

impl TimelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for TimelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub importance: Importance,
}

/// Event fields supplied by the user; the id is assigned on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvent {
    pub kind: EventKind,
    pub title: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub importance: Importance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseTimeline {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Number of events, as shown on the dashboard.
    #[serde(default)]
    pub events: usize,
    /// RFC 3339.
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub status: TimelineStatus,
    /// Events in date order.
    #[serde(default)]
    pub entries: Vec<TimelineEvent>,
}

impl CaseTimeline {
    pub fn new(id: String, name: String, description: String, now: &str) -> Self {
        Self {
            id,
            name,
            description,
            events: 0,
            last_updated: now.to_string(),
            status: TimelineStatus::Active,
            entries: Vec::new(),
        }
    }

    /// Insert keeping date order. Events on the same date stay in the order
    /// they were added.
    pub fn insert(&mut self, event: TimelineEvent, now: &str) {
        let at = self.entries.partition_point(|e| e.date <= event.date);
        self.entries.insert(at, event);
        self.touch(now);
    }

    pub fn remove(&mut self, event_id: &str, now: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != event_id);
        let removed = self.entries.len() != before;
        if removed {
            self.touch(now);
        }
        removed
    }

    fn touch(&mut self, now: &str) {
        self.events = self.entries.len();
        self.last_updated = now.to_string();
    }

    /// Canned review of the timeline: counts by kind and importance plus
    /// standing advice.
    pub fn brief(&self) -> TimelineBrief {
        let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) else {
            return TimelineBrief {
                overview: "No events added yet. Start building your case timeline to see Aura's analysis."
                    .to_string(),
                ..TimelineBrief::default()
            };
        };
        let high = self
            .entries
            .iter()
            .filter(|e| e.importance == Importance::High)
            .count();
        let of_kind = |k: EventKind| self.entries.iter().filter(|e| e.kind == k).count();

        TimelineBrief {
            overview: format!(
                "Case timeline contains {} events spanning from {} to {}. {} high-priority events identified.",
                self.entries.len(),
                first.date.format("%d/%m/%Y"),
                last.date.format("%d/%m/%Y"),
                high
            ),
            key_facts: vec![
                format!("{} incident(s) documented", of_kind(EventKind::Incident)),
                format!(
                    "{} supporting document(s) referenced",
                    of_kind(EventKind::Document)
                ),
                format!("{high} critical event(s) requiring attention"),
                "Chronological sequence established for legal proceedings".to_string(),
            ],
            legal_considerations: [
                "Timeline consistency supports case credibility",
                "Documentary evidence strengthens legal position",
                "High-priority events may require immediate legal action",
                "Chronological gaps may need additional documentation",
            ]
            .map(str::to_string)
            .to_vec(),
            recommendations: [
                "Gather additional evidence for high-priority events",
                "Consult with specialized legal counsel",
                "Prepare witness statements for key incidents",
                "Organize documents in chronological order for court presentation",
            ]
            .map(str::to_string)
            .to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBrief {
    pub overview: String,
    pub key_facts: Vec<String>,
    pub legal_considerations: Vec<String>,
    pub recommendations: Vec<String>,
}
