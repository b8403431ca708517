//! Request and response shapes of the backend that only the client needs.

use std::collections::BTreeMap;

use jurislead_core::{ActivityRecord, UserProfile, UserRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Account type being signed into.
    pub user_role: UserRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoogleLoginRequest {
    pub access_token: String,
    pub user_role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

/// Payload of a successful login or Google login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginSession {
    pub tokens: Tokens,
    pub user: UserProfile,
    #[serde(default)]
    pub session_key: String,
    /// Only sent by Google login.
    #[serde(default)]
    pub is_new_user: bool,
}

/// Payload of a token refresh. The refresh token is only present when the
/// backend rotates it.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedTokens {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub services: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrFileInfo {
    pub name: String,
    pub size_mb: f64,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrMetadata {
    pub word_count: u64,
    pub character_count: u64,
    #[serde(default)]
    pub image_size: Option<ImageSize>,
    #[serde(default)]
    pub file_info: Option<OcrFileInfo>,
}

/// Text recognised in an uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    pub extracted_text: String,
    /// Percentage, 0 to 100.
    pub confidence: f64,
    pub metadata: OcrMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document_type: String,
    pub simple_summary: String,
    pub detailed_summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub parties_involved: Vec<String>,
    #[serde(default)]
    pub important_dates: Vec<String>,
    #[serde(default)]
    pub legal_implications: String,
    #[serde(default)]
    pub action_required: String,
    #[serde(default)]
    pub urgency_level: String,
    #[serde(default)]
    pub language_complexity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: DocumentSummary,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub activity_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistorySummary {
    #[serde(default)]
    pub total_activities: u64,
    #[serde(default)]
    pub activity_breakdown: Vec<TypeCount>,
    #[serde(default)]
    pub status_breakdown: Vec<StatusCount>,
}

/// One page of the remote activity list.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityList {
    pub results: Vec<ActivityRecord>,
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub summary: HistorySummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClearOutcome {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub deleted_count: u64,
}

/// Aggregate counters the backend keeps per user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserAnalytics {
    #[serde(default)]
    pub total_analyses: u64,
    #[serde(default)]
    pub total_documents_processed: u64,
    #[serde(default)]
    pub total_cases_created: u64,
    #[serde(default)]
    pub total_lawyer_searches: u64,
    #[serde(default)]
    pub total_legal_research: u64,
    #[serde(default)]
    pub total_time_spent_minutes: u64,
    #[serde(default)]
    pub last_activity_date: Option<String>,
    #[serde(default)]
    pub total_files_uploaded: u64,
    #[serde(default)]
    pub total_file_size_mb: f64,
    #[serde(default)]
    pub monthly_analyses: u64,
    #[serde(default)]
    pub monthly_documents: u64,
    #[serde(default)]
    pub monthly_cases: u64,
    #[serde(default)]
    pub updated_at: String,
}

/// Activity count for one day of the last week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    #[serde(rename = "created_at__date")]
    pub date: String,
    pub count: u64,
}

/// Payload of `GET /auth/history/analytics/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryAnalytics {
    pub analytics: UserAnalytics,
    #[serde(default)]
    pub recent_trend: Vec<DailyCount>,
    /// Up to five most frequent activity types.
    #[serde(default)]
    pub top_activities: Vec<TypeCount>,
}
