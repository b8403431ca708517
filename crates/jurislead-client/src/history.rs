//! Activity history: remote first, the on-device legacy array when the
//! backend cannot be used.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use jurislead_core::{ActivityRecord, ActivityStatus, ActivityTypeOption, NewActivity};
use jurislead_store::legacy::{self, LegacyHistoryItem};
use jurislead_store::{LocalStorage, StoreError};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{ActivityList, ClearOutcome, HistoryAnalytics};
use crate::{ApiClient, ApiError};

/// Filters and paging for the remote activity list.
///
/// Unset and empty values are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub activity_type: Option<String>,
    pub status: Option<ActivityStatus>,
    /// Backend period keyword such as `today`, `week` or `month`.
    pub period: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl HistoryQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                params.push((key, v));
            }
        };
        push("page", self.page.map(|p| p.to_string()));
        push("page_size", self.page_size.map(|p| p.to_string()));
        push("activity_type", self.activity_type.clone());
        push("status", self.status.map(|s| s.as_str().to_string()));
        push("period", self.period.clone());
        push("search", self.search.clone());
        push(
            "date_from",
            self.date_from.map(|d| d.format("%Y-%m-%d").to_string()),
        );
        push("date_to", self.date_to.map(|d| d.format("%Y-%m-%d").to_string()));
        params
    }
}

/// Where a history page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySource {
    Remote,
    /// The remote call failed; these records were converted from the
    /// on-device array.
    LocalFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub results: Vec<ActivityRecord>,
    pub count: u64,
    pub source: HistorySource,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The remote call failed and so did reading the local fallback.
    #[error("{remote}; local history unavailable: {local}")]
    Unavailable { remote: ApiError, local: StoreError },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct HistoryService {
    api: Arc<ApiClient>,
    storage: Arc<LocalStorage>,
}

impl HistoryService {
    pub fn new(api: Arc<ApiClient>, storage: Arc<LocalStorage>) -> Self {
        Self { api, storage }
    }

    pub async fn load(&self, query: &HistoryQuery) -> Result<HistoryPage, HistoryError> {
        self.load_at(query, Utc::now()).await
    }

    /// [`load`](Self::load) with an explicit clock for the fallback's
    /// relative times.
    pub async fn load_at(
        &self,
        query: &HistoryQuery,
        now: DateTime<Utc>,
    ) -> Result<HistoryPage, HistoryError> {
        match self.api.list_activities(query).await {
            Ok(ActivityList { results, count, .. }) => Ok(HistoryPage {
                results,
                count,
                source: HistorySource::Remote,
            }),
            Err(remote) => {
                warn!(error = %remote, "remote history unavailable, using local history");
                match legacy::load_legacy_history(&self.storage, now) {
                    Ok(results) => Ok(HistoryPage {
                        count: results.len() as u64,
                        results,
                        source: HistorySource::LocalFallback,
                    }),
                    Err(local) => Err(HistoryError::Unavailable { remote, local }),
                }
            }
        }
    }

    /// Save an activity remotely; when that fails, keep `fallback` in the
    /// on-device array instead. Returns where it ended up.
    pub async fn record_activity(
        &self,
        activity: &NewActivity,
        fallback: &LegacyHistoryItem,
    ) -> Result<HistorySource, HistoryError> {
        match self.api.create_activity(activity).await {
            Ok(record) => {
                info!(id = %record.id, kind = %record.activity_type, "activity recorded");
                Ok(HistorySource::Remote)
            }
            Err(e) => {
                warn!(error = %e, "remote history save failed, saving on this device");
                legacy::push_legacy_item(&self.storage, fallback)?;
                Ok(HistorySource::LocalFallback)
            }
        }
    }

    pub async fn activity_types(&self) -> Result<Vec<ActivityTypeOption>, ApiError> {
        self.api.activity_types().await
    }

    pub async fn clear(&self, days: Option<u32>) -> Result<ClearOutcome, ApiError> {
        self.api.clear_history(days).await
    }

    pub async fn export(&self, query: &HistoryQuery) -> Result<Vec<ActivityRecord>, ApiError> {
        self.api.export_history(query).await
    }

    pub async fn analytics(&self) -> Result<HistoryAnalytics, ApiError> {
        self.api.analytics().await
    }
}

/// Where a local delete found the entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deletion {
    /// Was in the fetched page.
    pub in_view: bool,
    /// Was in the on-device `juris-history` array.
    pub on_device: bool,
}

impl Deletion {
    pub fn found(&self) -> bool {
        self.in_view || self.on_device
    }
}

/// Activity-type grouping used by the history filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActivityBucket {
    #[default]
    All,
    /// Case, document, and IPC analyses.
    Analysis,
    /// Document summaries.
    Summary,
    /// One exact activity type.
    Type(String),
}

impl ActivityBucket {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | "all" => Self::All,
            "analysis" => Self::Analysis,
            "summary" => Self::Summary,
            other => Self::Type(other.to_string()),
        }
    }

    pub fn contains(&self, activity_type: &str) -> bool {
        match self {
            Self::All => true,
            Self::Analysis => matches!(
                activity_type,
                "case_analysis" | "document_analysis" | "ipc_analysis"
            ),
            Self::Summary => activity_type == "document_summarization",
            Self::Type(t) => t == activity_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Case-insensitive substring of the title or description.
    pub search: Option<String>,
    pub bucket: ActivityBucket,
    pub status: Option<ActivityStatus>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &ActivityRecord) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.title.to_lowercase().contains(&term)
                    || record.description.to_lowercase().contains(&term)
            }
        };
        search_ok
            && self.bucket.contains(&record.activity_type)
            && self.status.is_none_or(|s| s == record.status)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total: usize,
    pub successful: usize,
    pub analyses: usize,
    pub summaries: usize,
    pub this_month: usize,
}

/// A fetched page held for client-side filtering and deletion.
#[derive(Debug, Clone)]
pub struct HistoryView {
    page: HistoryPage,
}

impl HistoryView {
    pub fn new(page: HistoryPage) -> Self {
        Self { page }
    }

    pub fn source(&self) -> HistorySource {
        self.page.source
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.page.results
    }

    pub fn filtered<'a>(&'a self, filter: &'a HistoryFilter) -> impl Iterator<Item = &'a ActivityRecord> {
        self.page.results.iter().filter(move |r| filter.matches(r))
    }

    pub fn find(&self, id: &str) -> Option<&ActivityRecord> {
        self.page.results.iter().find(|r| r.id == id)
    }

    /// Drop a record from this view and from the on-device array.
    ///
    /// Nothing is sent to the backend.
    pub fn delete(&mut self, id: &str, storage: &LocalStorage) -> Result<Deletion, StoreError> {
        let before = self.page.results.len();
        self.page.results.retain(|r| r.id != id);
        let in_view = self.page.results.len() != before;
        if in_view {
            self.page.count = self.page.count.saturating_sub(1);
        }
        let on_device = legacy::remove_legacy_item(storage, id)?;
        info!(id, in_view, on_device, "deleted history entry locally");
        Ok(Deletion { in_view, on_device })
    }

    pub fn stats(&self, now: DateTime<Utc>) -> HistoryStats {
        let records = &self.page.results;
        let in_month = |r: &&ActivityRecord| {
            DateTime::parse_from_rfc3339(&r.created_at).is_ok_and(|t| {
                let t = t.with_timezone(&Utc);
                t.year() == now.year() && t.month() == now.month()
            })
        };
        HistoryStats {
            total: records.len(),
            successful: records
                .iter()
                .filter(|r| r.status == ActivityStatus::Success)
                .count(),
            analyses: records
                .iter()
                .filter(|r| ActivityBucket::Analysis.contains(&r.activity_type))
                .count(),
            summaries: records
                .iter()
                .filter(|r| ActivityBucket::Summary.contains(&r.activity_type))
                .count(),
            this_month: records.iter().filter(in_month).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiConfig, StorageSession};
    use chrono::TimeZone;
    use jurislead_core::keys;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn frozen_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn service(base: &str, storage: Arc<LocalStorage>) -> HistoryService {
        let mut config = ApiConfig::new(base);
        config.timeout = Duration::from_secs(5);
        let api = ApiClient::new(config, Arc::new(StorageSession::new(storage.clone())));
        HistoryService::new(Arc::new(api), storage)
    }

    fn seed_legacy(storage: &LocalStorage) {
        storage
            .set_json(
                keys::HISTORY,
                &json!([
                    {"id": "1", "type": "analysis", "title": "Phone theft",
                     "timestamp": "2025-06-08T12:00:00Z", "status": "completed",
                     "data": {"file": "fir.pdf"}},
                    {"id": "2", "type": "summary", "title": "Lease summary",
                     "timestamp": "2025-06-10T09:00:00Z", "status": "processing"},
                    {"id": "3", "type": "analysis", "title": "No timestamp"}
                ]),
            )
            .unwrap();
    }

    fn record(id: &str, kind: &str, title: &str, status: ActivityStatus, created: &str) -> ActivityRecord {
        serde_json::from_value(json!({
            "id": id,
            "activity_type": kind,
            "title": title,
            "description": format!("{title} details"),
            "status": status.as_str(),
            "created_at": created
        }))
        .unwrap()
    }

    #[test]
    fn query_params_skip_empty() {
        let q = HistoryQuery {
            page: Some(2),
            page_size: Some(20),
            activity_type: Some(String::new()),
            status: Some(ActivityStatus::Failed),
            search: Some("  ".into()),
            date_from: NaiveDate::from_ymd_opt(2025, 6, 1),
            ..Default::default()
        };
        assert_eq!(
            q.to_params(),
            vec![
                ("page", "2".to_string()),
                ("page_size", "20".to_string()),
                ("status", "failed".to_string()),
                ("date_from", "2025-06-01".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn remote_page_when_backend_answers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/history/activities/"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "id": "r1", "activity_type": "case_analysis", "title": "Remote",
                    "description": "", "status": "success",
                    "created_at": "2025-06-10T10:00:00Z", "time_ago": "2 hours ago"
                }],
                "count": 1,
                "next": null,
                "previous": null,
                "summary": {"total_activities": 1, "activity_breakdown": [], "status_breakdown": []}
            })))
            .mount(&server)
            .await;
        let storage = Arc::new(LocalStorage::in_memory());
        seed_legacy(&storage);
        let svc = service(&server.uri(), storage);
        let page = svc
            .load_at(
                &HistoryQuery {
                    page: Some(1),
                    ..Default::default()
                },
                frozen_now(),
            )
            .await
            .unwrap();
        assert_eq!(page.source, HistorySource::Remote);
        assert_eq!(page.results[0].id, "r1");
    }

    #[tokio::test]
    async fn falls_back_to_local_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/history/activities/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "no auth"})))
            .mount(&server)
            .await;
        let storage = Arc::new(LocalStorage::in_memory());
        seed_legacy(&storage);
        let svc = service(&server.uri(), storage);

        let page = svc.load_at(&HistoryQuery::default(), frozen_now()).await.unwrap();
        assert_eq!(page.source, HistorySource::LocalFallback);
        assert_eq!(page.count, 2);
        let first = &page.results[0];
        assert_eq!(first.activity_type, "case_analysis");
        assert_eq!(first.status, ActivityStatus::Success);
        assert_eq!(first.time_ago, "2 days ago");
        assert_eq!(first.file_name.as_deref(), Some("fir.pdf"));
        let second = &page.results[1];
        assert_eq!(second.activity_type, "document_summarization");
        assert_eq!(second.status, ActivityStatus::Pending);
        assert_eq!(second.time_ago, "3 hours ago");
    }

    #[tokio::test]
    async fn fallback_with_corrupt_store_reports_both_failures() {
        let storage = Arc::new(LocalStorage::in_memory());
        storage.set_item(keys::HISTORY, r#"{"not": "an array"}"#).unwrap();
        let svc = service("http://127.0.0.1:1", storage);
        let err = svc
            .load_at(&HistoryQuery::default(), frozen_now())
            .await
            .unwrap_err();
        match err {
            HistoryError::Unavailable { remote, local } => {
                assert_eq!(remote.status(), Some(0));
                assert!(matches!(local, StoreError::Corrupt { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn record_activity_falls_back_to_device() {
        let storage = Arc::new(LocalStorage::in_memory());
        let svc = service("http://127.0.0.1:1", storage.clone());
        let legacy_item = LegacyHistoryItem {
            id: "1718000000000".into(),
            kind: "analysis".into(),
            title: "Bike theft".into(),
            timestamp: "2025-06-10T12:00:00Z".into(),
            data: None,
            status: Some("completed".into()),
        };
        let new = NewActivity {
            activity_type: "case_analysis".into(),
            title: "Bike theft".into(),
            ..Default::default()
        };
        let source = svc.record_activity(&new, &legacy_item).await.unwrap();
        assert_eq!(source, HistorySource::LocalFallback);
        let stored = legacy::read_legacy_array(&storage).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["title"], "Bike theft");
    }

    #[test]
    fn buckets() {
        assert!(ActivityBucket::parse("all").contains("lawyer_search"));
        assert!(ActivityBucket::parse("analysis").contains("document_analysis"));
        assert!(!ActivityBucket::parse("analysis").contains("document_summarization"));
        assert!(ActivityBucket::parse("summary").contains("document_summarization"));
        assert!(ActivityBucket::parse("lawyer_search").contains("lawyer_search"));
        assert!(!ActivityBucket::parse("lawyer_search").contains("case_analysis"));
    }

    #[test]
    fn filter_by_search_bucket_and_status() {
        let view = HistoryView::new(HistoryPage {
            results: vec![
                record("1", "case_analysis", "Phone theft", ActivityStatus::Success, "2025-06-01T00:00:00Z"),
                record("2", "document_summarization", "Lease", ActivityStatus::Success, "2025-05-01T00:00:00Z"),
                record("3", "case_analysis", "Assault", ActivityStatus::Failed, "2025-06-02T00:00:00Z"),
            ],
            count: 3,
            source: HistorySource::Remote,
        });
        let ids = |f: &HistoryFilter| -> Vec<String> { view.filtered(f).map(|r| r.id.clone()).collect() };

        assert_eq!(ids(&HistoryFilter::default()), vec!["1", "2", "3"]);
        let theft = HistoryFilter {
            search: Some("THEFT".into()),
            ..Default::default()
        };
        assert_eq!(ids(&theft), vec!["1"]);
        // Description text is searched too.
        let details = HistoryFilter {
            search: Some("lease details".into()),
            ..Default::default()
        };
        assert_eq!(ids(&details), vec!["2"]);
        let failed_analyses = HistoryFilter {
            bucket: ActivityBucket::Analysis,
            status: Some(ActivityStatus::Failed),
            ..Default::default()
        };
        assert_eq!(ids(&failed_analyses), vec!["3"]);

        let stats = view.stats(frozen_now());
        assert_eq!(
            stats,
            HistoryStats {
                total: 3,
                successful: 2,
                analyses: 2,
                summaries: 1,
                this_month: 2,
            }
        );
    }

    #[test]
    fn delete_is_local_only() {
        let storage = LocalStorage::in_memory();
        seed_legacy(&storage);
        let converted = legacy::load_legacy_history(&storage, frozen_now()).unwrap();
        let mut view = HistoryView::new(HistoryPage {
            count: converted.len() as u64,
            results: converted,
            source: HistorySource::LocalFallback,
        });

        let gone = view.delete("1", &storage).unwrap();
        assert_eq!(
            gone,
            Deletion {
                in_view: true,
                on_device: true
            }
        );
        assert!(view.find("1").is_none());
        assert_eq!(view.records().len(), 1);
        let raw = legacy::read_legacy_array(&storage).unwrap();
        assert!(raw.iter().all(|v| v["id"] != "1"));
        // The malformed entry is left alone.
        assert_eq!(raw.len(), 2);

        assert!(!view.delete("missing", &storage).unwrap().found());
    }

    #[tokio::test]
    async fn delete_reaches_device_copy_missing_from_remote_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/history/activities/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"results": [], "count": 0})),
            )
            .mount(&server)
            .await;
        let storage = Arc::new(LocalStorage::in_memory());
        seed_legacy(&storage);
        let page = service(&server.uri(), storage.clone())
            .load_at(&HistoryQuery::default(), frozen_now())
            .await
            .unwrap();
        assert_eq!(page.source, HistorySource::Remote);
        let mut view = HistoryView::new(page);

        let gone = view.delete("1", &storage).unwrap();
        assert!(!gone.in_view);
        assert!(gone.on_device);
        assert!(gone.found());
        let raw = legacy::read_legacy_array(&storage).unwrap();
        assert!(raw.iter().all(|v| v["id"] != "1"));
    }
}
