//! The legacy local history array (`juris-history`).
//!
//! Before the remote history service existed, the analyzer and summarizer
//! kept a JSON array of items shaped like:
//!
//! ```json
//! {"id": "1717230000000", "type": "analysis", "title": "...",
//!  "timestamp": "2025-06-01T10:00:00Z", "status": "completed",
//!  "data": {"input": "...", "result": {...}}}
//! ```
//!
//! The array is still written whenever the remote service is unreachable, and
//! read back as a fallback. Conversion to [`ActivityRecord`] is pure and
//! deterministic for a given clock.

use chrono::{DateTime, Utc};
use jurislead_core::keys;
use jurislead_core::{ActivityRecord, ActivityStatus, AnalysisResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{LocalStorage, StoreError};

/// One item of the legacy history array, in its validated form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyHistoryItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl LegacyHistoryItem {
    /// Validate a raw array element. Returns `None` unless `id`, `type`,
    /// `title` and `timestamp` are all strings.
    pub fn from_value(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        let field = |name: &str| obj.get(name)?.as_str().map(str::to_string);
        Some(Self {
            id: field("id")?,
            kind: field("type")?,
            title: field("title")?,
            timestamp: field("timestamp")?,
            data: obj.get("data").cloned().filter(|d| !d.is_null()),
            status: field("status"),
        })
    }
}

/// Human-readable age in day/hour buckets.
///
/// `"3 days ago"`, `"1 day ago"`, `"5 hours ago"`, `"1 hour ago"`, or
/// `"Just now"` under an hour. Future timestamps read as `"Just now"`.
pub fn time_ago(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created);
    let days = elapsed.num_days();
    let hours = elapsed.num_hours();
    if days > 0 {
        format!("{days} day{} ago", if days > 1 { "s" } else { "" })
    } else if hours > 0 {
        format!("{hours} hour{} ago", if hours > 1 { "s" } else { "" })
    } else {
        "Just now".to_string()
    }
}

fn activity_type_for(kind: &str) -> (&str, Option<&'static str>, Option<&'static str>) {
    match kind {
        "analysis" => ("case_analysis", Some("Case Analysis"), Some("Scale")),
        "summary" => (
            "document_summarization",
            Some("Document Summarization"),
            Some("FileText"),
        ),
        other => (other, None, None),
    }
}

fn status_for(raw: Option<&str>) -> ActivityStatus {
    match raw {
        Some("failed") => ActivityStatus::Failed,
        Some("processing") => ActivityStatus::Pending,
        Some(other) => ActivityStatus::parse(other).unwrap_or(ActivityStatus::Success),
        None => ActivityStatus::Success,
    }
}

/// Remap one validated legacy item into the remote record shape.
///
/// Returns `None` when the timestamp is not RFC 3339.
pub fn to_activity(item: &LegacyHistoryItem, now: DateTime<Utc>) -> Option<ActivityRecord> {
    let created = DateTime::parse_from_rfc3339(&item.timestamp)
        .ok()?
        .with_timezone(&Utc);
    let (activity_type, display, icon) = activity_type_for(&item.kind);
    let description = match item.kind.as_str() {
        "analysis" => "Legal analysis saved on this device".to_string(),
        "summary" => "Document summary saved on this device".to_string(),
        _ => String::new(),
    };
    let file_name = item
        .data
        .as_ref()
        .and_then(|d| d.get("file"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(ActivityRecord {
        id: item.id.clone(),
        activity_type: activity_type.to_string(),
        activity_type_display: display.map(str::to_string),
        title: item.title.clone(),
        description,
        status: status_for(item.status.as_deref()),
        created_at: item.timestamp.clone(),
        time_ago: time_ago(created, now),
        result_data: item.data.clone(),
        file_name,
        file_size: None,
        file_type: None,
        duration_seconds: None,
        icon_name: icon.map(str::to_string),
        page_url: None,
        additional_data: None,
    })
}

/// Convert raw legacy array elements, discarding malformed ones.
pub fn convert_legacy(items: &[Value], now: DateTime<Utc>) -> Vec<ActivityRecord> {
    let mut out = Vec::with_capacity(items.len());
    for (idx, raw) in items.iter().enumerate() {
        match LegacyHistoryItem::from_value(raw).and_then(|item| to_activity(&item, now)) {
            Some(record) => out.push(record),
            None => debug!(idx, "discarding malformed legacy history entry"),
        }
    }
    out
}

/// Read the raw legacy array. A missing key is an empty history; a value that
/// is not a JSON array is [`StoreError::Corrupt`].
pub fn read_legacy_array(storage: &LocalStorage) -> Result<Vec<Value>, StoreError> {
    match storage.get_json::<Value>(keys::HISTORY)? {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(StoreError::Corrupt {
            key: keys::HISTORY.to_string(),
            reason: format!("expected an array, found {}", json_kind(&other)),
        }),
    }
}

/// Load and convert the legacy history.
pub fn load_legacy_history(
    storage: &LocalStorage,
    now: DateTime<Utc>,
) -> Result<Vec<ActivityRecord>, StoreError> {
    let raw = read_legacy_array(storage)?;
    let records = convert_legacy(&raw, now);
    if records.len() != raw.len() {
        warn!(
            kept = records.len(),
            discarded = raw.len() - records.len(),
            "legacy history contained malformed entries"
        );
    }
    Ok(records)
}

/// Insert an item at the front of the legacy array (newest first).
pub fn push_legacy_item(storage: &LocalStorage, item: &LegacyHistoryItem) -> Result<(), StoreError> {
    // An unreadable array is replaced rather than blocking the save.
    let mut items = read_legacy_array(storage).unwrap_or_default();
    items.insert(0, serde_json::to_value(item)?);
    storage.set_json(keys::HISTORY, &items)
}

/// Remove the item with `id` from the legacy array if it is there.
///
/// Returns whether anything was removed. Other elements, malformed ones
/// included, are written back untouched.
pub fn remove_legacy_item(storage: &LocalStorage, id: &str) -> Result<bool, StoreError> {
    if storage.get_item(keys::HISTORY)?.is_none() {
        return Ok(false);
    }
    let mut items = read_legacy_array(storage)?;
    let before = items.len();
    items.retain(|v| v.get("id").and_then(Value::as_str) != Some(id));
    if items.len() == before {
        return Ok(false);
    }
    storage.set_json(keys::HISTORY, &items)?;
    Ok(true)
}

/// A past analysis read back from the legacy array.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredAnalysis {
    pub title: String,
    /// Text the user submitted.
    pub input: Option<String>,
    pub result: Option<AnalysisResult>,
}

/// Look up a saved analysis by id.
///
/// Only `analysis` items carrying `data` qualify. A stored result that no
/// longer parses is dropped, keeping the input.
pub fn restore_analysis(storage: &LocalStorage, id: &str) -> Result<Option<RestoredAnalysis>, StoreError> {
    let found = read_legacy_array(storage)?
        .iter()
        .filter_map(LegacyHistoryItem::from_value)
        .find(|item| item.id == id);
    let Some(item) = found else {
        return Ok(None);
    };
    let Some(data) = item.data.filter(|_| item.kind == "analysis") else {
        debug!(id, kind = %item.kind, "history entry has no analysis to restore");
        return Ok(None);
    };
    let input = data
        .get("input")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let result = match data.get("result").filter(|r| !r.is_null()) {
        None => None,
        Some(raw) => match serde_json::from_value(raw.clone()) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(id, error = %e, "saved analysis result unreadable");
                None
            }
        },
    };
    Ok(Some(RestoredAnalysis {
        title: item.title,
        input,
        result,
    }))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn frozen_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn sample_items() -> Vec<Value> {
        vec![
            json!({
                "id": "1717999200000",
                "type": "analysis",
                "title": "Phone snatched near bus stop",
                "timestamp": "2025-06-10T06:00:00Z",
                "status": "completed",
                "data": {"input": "Phone snatched", "result": {"severity": "medium"}}
            }),
            json!({
                "id": "1717740000000",
                "type": "summary",
                "title": "Rental agreement",
                "timestamp": "2025-06-07T12:00:00Z",
                "status": "processing",
                "data": {"file": "rent.pdf"}
            }),
        ]
    }

    #[test]
    fn time_ago_buckets() {
        let now = frozen_now();
        assert_eq!(time_ago(now, now), "Just now");
        assert_eq!(time_ago(now - chrono::Duration::minutes(59), now), "Just now");
        assert_eq!(time_ago(now - chrono::Duration::hours(1), now), "1 hour ago");
        assert_eq!(time_ago(now - chrono::Duration::hours(23), now), "23 hours ago");
        assert_eq!(time_ago(now - chrono::Duration::days(1), now), "1 day ago");
        assert_eq!(time_ago(now - chrono::Duration::days(9), now), "9 days ago");
        assert_eq!(time_ago(now + chrono::Duration::hours(2), now), "Just now");
    }

    #[test]
    fn converts_legacy_shape() {
        let records = convert_legacy(&sample_items(), frozen_now());
        assert_eq!(records.len(), 2);

        let a = &records[0];
        assert_eq!(a.activity_type, "case_analysis");
        assert_eq!(a.status, ActivityStatus::Success);
        assert_eq!(a.time_ago, "6 hours ago");
        assert_eq!(a.result_data.as_ref().unwrap()["input"], "Phone snatched");

        let s = &records[1];
        assert_eq!(s.activity_type, "document_summarization");
        assert_eq!(s.status, ActivityStatus::Pending);
        assert_eq!(s.time_ago, "3 days ago");
        assert_eq!(s.file_name.as_deref(), Some("rent.pdf"));
    }

    #[test]
    fn missing_timestamp_is_discarded_not_an_error() {
        let mut items = sample_items();
        items.push(json!({"id": "3", "type": "analysis", "title": "no time"}));
        let records = convert_legacy(&items, frozen_now());
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.id != "3"));
    }

    #[test]
    fn malformed_entries_discarded() {
        let items = vec![
            json!(null),
            json!("a string"),
            json!({"id": 7, "type": "analysis", "title": "numeric id", "timestamp": "2025-06-01T00:00:00Z"}),
            json!({"id": "8", "type": "analysis", "title": "bad time", "timestamp": "yesterday"}),
            sample_items()[0].clone(),
        ];
        let records = convert_legacy(&items, frozen_now());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1717999200000");
    }

    #[test]
    fn conversion_is_idempotent_for_frozen_clock() {
        let storage = LocalStorage::in_memory();
        storage.set_json(keys::HISTORY, &sample_items()).unwrap();
        let first = load_legacy_history(&storage, frozen_now()).unwrap();
        let second = load_legacy_history(&storage, frozen_now()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn non_array_history_is_corrupt() {
        let storage = LocalStorage::in_memory();
        storage.set_item(keys::HISTORY, r#"{"id": "1"}"#).unwrap();
        let err = load_legacy_history(&storage, frozen_now()).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn missing_history_is_empty() {
        let storage = LocalStorage::in_memory();
        assert!(load_legacy_history(&storage, frozen_now()).unwrap().is_empty());
    }

    #[test]
    fn push_puts_newest_first() {
        let storage = LocalStorage::in_memory();
        storage.set_json(keys::HISTORY, &sample_items()).unwrap();
        let item = LegacyHistoryItem {
            id: "new".into(),
            kind: "analysis".into(),
            title: "Fresh".into(),
            timestamp: "2025-06-10T11:59:00Z".into(),
            data: None,
            status: Some("completed".into()),
        };
        push_legacy_item(&storage, &item).unwrap();
        let raw = read_legacy_array(&storage).unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0]["id"], "new");
        assert_eq!(raw[0]["type"], "analysis");
    }

    #[test]
    fn remove_keeps_other_entries() {
        let storage = LocalStorage::in_memory();
        let mut items = sample_items();
        items.push(json!({"garbage": true}));
        storage.set_json(keys::HISTORY, &items).unwrap();

        assert!(remove_legacy_item(&storage, "1717740000000").unwrap());
        assert!(!remove_legacy_item(&storage, "1717740000000").unwrap());

        let raw = read_legacy_array(&storage).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[1]["garbage"], true);
    }

    #[test]
    fn restores_saved_analysis() {
        let storage = LocalStorage::in_memory();
        storage
            .set_json(
                keys::HISTORY,
                &json!([
                    {"id": "s1", "type": "summary", "title": "Lease",
                     "timestamp": "2025-06-09T10:00:00Z", "data": {"input": "lease text"}},
                    {"id": "a1", "type": "analysis", "title": "Bike theft",
                     "timestamp": "2025-06-09T10:00:00Z",
                     "data": {
                        "input": "Someone stole my bike",
                        "result": {
                            "summary": "AI analysis identified 1 applicable IPC sections with medium severity.",
                            "legalIssues": ["IPC 379: Theft"],
                            "recommendations": [],
                            "severity": "medium",
                            "nextSteps": [],
                            "applicableSections": [{
                                "section": "IPC 379", "title": "Theft",
                                "description": "Bike taken", "punishment": "Up to 3 years"
                            }],
                            "timeline": "2-4 weeks",
                            "caseType": "Criminal Law - IPC Analysis"
                        }
                     }},
                    {"id": "a2", "type": "analysis", "title": "Old format",
                     "timestamp": "2025-06-09T10:00:00Z",
                     "data": {"input": "text only", "result": {"summary": 3}}}
                ]),
            )
            .unwrap();

        let restored = restore_analysis(&storage, "a1").unwrap().unwrap();
        assert_eq!(restored.title, "Bike theft");
        assert_eq!(restored.input.as_deref(), Some("Someone stole my bike"));
        let result = restored.result.unwrap();
        assert_eq!(result.applicable_sections[0].section, "IPC 379");

        let partial = restore_analysis(&storage, "a2").unwrap().unwrap();
        assert_eq!(partial.input.as_deref(), Some("text only"));
        assert!(partial.result.is_none());

        assert!(restore_analysis(&storage, "s1").unwrap().is_none());
        assert!(restore_analysis(&storage, "missing").unwrap().is_none());
    }

    #[test]
    fn remove_without_history_is_noop() {
        let storage = LocalStorage::in_memory();
        assert!(!remove_legacy_item(&storage, "x").unwrap());
        assert_eq!(storage.get_item(keys::HISTORY).unwrap(), None);
    }
}
