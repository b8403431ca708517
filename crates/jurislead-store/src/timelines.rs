//! Case timelines kept on the device (`juris-timelines`).

use chrono::{DateTime, SecondsFormat, Utc};
use jurislead_core::keys;
use jurislead_core::{CaseTimeline, NewEvent, TimelineEvent, TimelineStatus};
use tracing::info;

use crate::{LocalStorage, StoreError};

/// All stored timelines. A missing key is an empty list; anything that is
/// not an array of timelines is [`StoreError::Corrupt`].
pub fn load_timelines(storage: &LocalStorage) -> Result<Vec<CaseTimeline>, StoreError> {
    Ok(storage.get_json(keys::TIMELINES)?.unwrap_or_default())
}

pub fn find_timeline(storage: &LocalStorage, id: &str) -> Result<Option<CaseTimeline>, StoreError> {
    Ok(load_timelines(storage)?.into_iter().find(|t| t.id == id))
}

/// Millisecond id from `now`, bumped past any id already taken.
fn next_id<'a>(taken: impl Iterator<Item = &'a str> + Clone, now: DateTime<Utc>) -> String {
    let mut id = now.timestamp_millis();
    while taken.clone().any(|t| t == id.to_string()) {
        id += 1;
    }
    id.to_string()
}

fn stamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn create_timeline(
    storage: &LocalStorage,
    name: &str,
    description: &str,
    now: DateTime<Utc>,
) -> Result<CaseTimeline, StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidTimeline("a timeline needs a name"));
    }
    let mut all = load_timelines(storage)?;
    let id = next_id(all.iter().map(|t| t.id.as_str()), now);
    let timeline = CaseTimeline::new(id, name.trim().to_string(), description.to_string(), &stamp(now));
    all.insert(0, timeline.clone());
    storage.set_json(keys::TIMELINES, &all)?;
    info!(id = %timeline.id, "created case timeline");
    Ok(timeline)
}

/// Load, change one timeline, and write everything back.
fn edit<T>(
    storage: &LocalStorage,
    id: &str,
    change: impl FnOnce(&mut CaseTimeline) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let mut all = load_timelines(storage)?;
    let timeline = all
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| StoreError::UnknownTimeline(id.to_string()))?;
    let out = change(timeline)?;
    storage.set_json(keys::TIMELINES, &all)?;
    Ok(out)
}

/// Add an event. A title and a date are required.
pub fn add_event(
    storage: &LocalStorage,
    timeline_id: &str,
    new: NewEvent,
    now: DateTime<Utc>,
) -> Result<TimelineEvent, StoreError> {
    if new.title.trim().is_empty() {
        return Err(StoreError::InvalidTimeline("an event needs a title"));
    }
    let Some(date) = new.date else {
        return Err(StoreError::InvalidTimeline("an event needs a date"));
    };
    edit(storage, timeline_id, |timeline| {
        let event = TimelineEvent {
            id: next_id(timeline.entries.iter().map(|e| e.id.as_str()), now),
            kind: new.kind,
            title: new.title.trim().to_string(),
            description: new.description,
            date,
            importance: new.importance,
        };
        timeline.insert(event.clone(), &stamp(now));
        info!(timeline = timeline_id, event = %event.id, "added timeline event");
        Ok(event)
    })
}

/// Returns whether the event existed.
pub fn remove_event(
    storage: &LocalStorage,
    timeline_id: &str,
    event_id: &str,
    now: DateTime<Utc>,
) -> Result<bool, StoreError> {
    edit(storage, timeline_id, |timeline| {
        Ok(timeline.remove(event_id, &stamp(now)))
    })
}

pub fn set_status(
    storage: &LocalStorage,
    timeline_id: &str,
    status: TimelineStatus,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    edit(storage, timeline_id, |timeline| {
        timeline.status = status;
        timeline.last_updated = stamp(now);
        Ok(())
    })
}

/// Returns whether the timeline existed.
pub fn delete_timeline(storage: &LocalStorage, id: &str) -> Result<bool, StoreError> {
    let mut all = load_timelines(storage)?;
    let before = all.len();
    all.retain(|t| t.id != id);
    if all.len() == before {
        return Ok(false);
    }
    storage.set_json(keys::TIMELINES, &all)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use jurislead_core::{EventKind, Importance};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn new_event(title: &str, date: &str) -> NewEvent {
        NewEvent {
            kind: EventKind::Incident,
            title: title.to_string(),
            description: String::new(),
            date: date.parse::<NaiveDate>().ok(),
            importance: Importance::High,
        }
    }

    #[test]
    fn create_add_and_reload() {
        let storage = LocalStorage::in_memory();
        let t = create_timeline(&storage, "Bike theft", "stolen outside office", now()).unwrap();
        assert_eq!(t.id, now().timestamp_millis().to_string());
        assert_eq!(t.last_updated, "2025-06-10T12:00:00Z");

        let late = add_event(&storage, &t.id, new_event("FIR filed", "2025-05-04"), now()).unwrap();
        let early = add_event(&storage, &t.id, new_event("Bike stolen", "2025-05-02"), now()).unwrap();
        assert_ne!(late.id, early.id);

        let stored = find_timeline(&storage, &t.id).unwrap().unwrap();
        assert_eq!(stored.events, 2);
        assert_eq!(stored.entries[0].title, "Bike stolen");
        assert_eq!(stored.entries[1].title, "FIR filed");
    }

    #[test]
    fn same_millisecond_gets_distinct_ids() {
        let storage = LocalStorage::in_memory();
        let a = create_timeline(&storage, "A", "", now()).unwrap();
        let b = create_timeline(&storage, "B", "", now()).unwrap();
        assert_ne!(a.id, b.id);
        // Newest first.
        assert_eq!(load_timelines(&storage).unwrap()[0].id, b.id);
    }

    #[test]
    fn event_needs_title_and_date() {
        let storage = LocalStorage::in_memory();
        let t = create_timeline(&storage, "Case", "", now()).unwrap();
        assert!(matches!(
            add_event(&storage, &t.id, new_event("  ", "2025-05-04"), now()),
            Err(StoreError::InvalidTimeline(_))
        ));
        assert!(matches!(
            add_event(&storage, &t.id, new_event("No date", "someday"), now()),
            Err(StoreError::InvalidTimeline(_))
        ));
        assert!(matches!(
            add_event(&storage, "nope", new_event("x", "2025-05-04"), now()),
            Err(StoreError::UnknownTimeline(id)) if id == "nope"
        ));
    }

    #[test]
    fn status_remove_and_delete() {
        let storage = LocalStorage::in_memory();
        let t = create_timeline(&storage, "Case", "", now()).unwrap();
        let e = add_event(&storage, &t.id, new_event("x", "2025-05-04"), now()).unwrap();

        set_status(&storage, &t.id, TimelineStatus::Completed, now()).unwrap();
        assert!(remove_event(&storage, &t.id, &e.id, now()).unwrap());
        assert!(!remove_event(&storage, &t.id, &e.id, now()).unwrap());
        let stored = find_timeline(&storage, &t.id).unwrap().unwrap();
        assert_eq!(stored.status, TimelineStatus::Completed);
        assert_eq!(stored.events, 0);

        assert!(delete_timeline(&storage, &t.id).unwrap());
        assert!(!delete_timeline(&storage, &t.id).unwrap());
        assert!(load_timelines(&storage).unwrap().is_empty());
    }

    #[test]
    fn reads_dashboard_entries_and_rejects_garbage() {
        let storage = LocalStorage::in_memory();
        storage
            .set_item(
                keys::TIMELINES,
                r#"[{"id": "9", "name": "Imported", "description": "", "events": 2,
                     "lastUpdated": "2025-01-01", "status": "active"}]"#,
            )
            .unwrap();
        assert_eq!(load_timelines(&storage).unwrap()[0].events, 2);

        storage.set_item(keys::TIMELINES, r#"{"id": "9"}"#).unwrap();
        assert!(matches!(
            load_timelines(&storage),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
