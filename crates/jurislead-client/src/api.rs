//! REST client for the Juris-Lead backend.
//!
//! One method per backend operation. Requests carry the session's bearer
//! token when there is one. Analysis can take minutes, so ordinary calls
//! use the long timeout from [`ApiConfig`]; health checks use the short one.

use std::sync::Arc;
use std::time::Duration;

use jurislead_core::{
    ActivityRecord, ActivityTypeOption, AnalysisRequest, AnalysisResponse, NewActivity,
    UserProfile,
};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::error_message;
use crate::history::HistoryQuery;
use crate::models::{
    ActivityList, ClearOutcome, GoogleLoginRequest, HealthStatus, HistoryAnalytics, LoginRequest,
    LoginSession, OcrResult, RefreshedTokens, SummaryResponse,
};
use crate::upload::{Upload, UploadKind};
use crate::{ApiConfig, ApiError, SessionStore};

pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: Arc<dyn SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    // ── Transport ──

    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, ApiError> {
        let mut req = self.http.request(method, url);
        if let Some(token) = self.session.access_token().await? {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    /// Send and return the status with the body parsed as JSON, if it is JSON.
    async fn send(
        &self,
        req: RequestBuilder,
        timeout: Duration,
    ) -> Result<(reqwest::StatusCode, Option<Value>, String), ApiError> {
        let resp = req
            .timeout(timeout)
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        let status = resp.status();
        let text = resp.text().await.map_err(ApiError::from_transport)?;
        let body = serde_json::from_str(&text).ok();
        Ok((status, body, text))
    }

    /// Send, check the status, and return the JSON body.
    ///
    /// `failure` is the message used when a non-2xx body carries none of
    /// its own.
    async fn call(
        &self,
        req: RequestBuilder,
        timeout: Duration,
        failure: &str,
    ) -> Result<Value, ApiError> {
        let (status, body, text) = self.send(req, timeout).await?;
        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| format!("{failure}: {}", status.as_u16()));
            warn!(status = status.as_u16(), %message, "backend rejected request");
            return Err(ApiError::Rejected {
                status: Some(status.as_u16()),
                message,
                details: body,
            });
        }
        body.ok_or_else(|| ApiError::MalformedResponse {
            message: "Invalid response format from server".to_string(),
            details: Some(Value::String(text)),
        })
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        timeout: Duration,
        failure: &str,
    ) -> Result<T, ApiError> {
        let body = self.call(req, timeout, failure).await?;
        decode(body)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        failure: &str,
    ) -> Result<Value, ApiError> {
        let req = self.request(Method::POST, url).await?.json(body);
        self.call(req, self.config.timeout, failure).await
    }

    // ── Health ──

    /// Probe the analysis service. Any failure, including a degraded
    /// status code, is reported as unreachable.
    pub async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let url = self.config.url(&self.config.endpoints.health);
        let result: Result<HealthStatus, ApiError> = match self.request(Method::GET, &url).await {
            Ok(req) => {
                self.call_json(req, self.config.health_timeout, "Health check failed")
                    .await
            }
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            warn!(error = %e, "health check failed");
            ApiError::Unreachable {
                message: "Unable to connect to analysis service".to_string(),
                details: Some(Value::String(e.to_string())),
            }
        })
    }

    // ── Auth ──

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginSession, ApiError> {
        let url = self.config.url(&self.config.endpoints.login);
        let body = self.post_json(&url, request, "Login failed").await?;
        let session: LoginSession = unwrap_envelope(body, "Login failed")?;
        self.session.store_login(&session.tokens, &session.user).await?;
        info!(user = %session.user.id, role = %session.user.user_role, "logged in");
        Ok(session)
    }

    pub async fn google_login(&self, request: &GoogleLoginRequest) -> Result<LoginSession, ApiError> {
        let url = self.config.url(&self.config.endpoints.google_login);
        let body = self.post_json(&url, request, "Google login failed").await?;
        let session: LoginSession = unwrap_envelope(body, "Google login failed")?;
        self.session.store_login(&session.tokens, &session.user).await?;
        info!(
            user = %session.user.id,
            new_user = session.is_new_user,
            "logged in with Google"
        );
        Ok(session)
    }

    /// Tell the backend, then clear the local session whatever it said.
    pub async fn logout(&self) {
        let url = self.config.url(&self.config.endpoints.logout);
        let outcome = match self.request(Method::POST, &url).await {
            Ok(req) => self.call(req, self.config.timeout, "Logout failed").await,
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            warn!(error = %e, "logout request failed, clearing session locally");
        }
        if let Err(e) = self.session.clear().await {
            warn!(error = %e, "failed to clear local session");
        }
        info!("logged out");
    }

    /// Fetch the profile and refresh the stored copy.
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        let url = self.config.url(&self.config.endpoints.profile);
        let req = self.request(Method::GET, &url).await?;
        let body = self
            .call(req, self.config.timeout, "Failed to fetch profile")
            .await?;
        let profile: UserProfile = unwrap_envelope(body, "Failed to fetch profile")?;
        self.session.store_profile(&profile).await?;
        Ok(profile)
    }

    /// Exchange the refresh token for a new access token.
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let Some(refresh) = self.session.refresh_token().await? else {
            return Err(ApiError::AuthRequired(
                "No refresh token available; please log in again".to_string(),
            ));
        };
        let url = self.config.url(&self.config.endpoints.token_refresh);
        let body = self
            .post_json(&url, &json!({ "refresh": refresh }), "Token refresh failed")
            .await?;
        // Accept both a bare `{access, refresh?}` body and the usual envelope.
        let tokens: RefreshedTokens = if body.get("status").is_some() {
            unwrap_envelope(body, "Token refresh failed")?
        } else {
            decode(body)?
        };
        self.session.store_access_token(&tokens.access).await?;
        if let Some(rotated) = &tokens.refresh {
            self.session.store_refresh_token(rotated).await?;
        }
        debug!(rotated = tokens.refresh.is_some(), "access token refreshed");
        Ok(tokens.access)
    }

    // ── Analysis ──

    /// Submit an incident for analysis. Requires a signed-in session and a
    /// reachable service.
    pub async fn analyze_case(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, ApiError> {
        if !self.session.is_authenticated().await? {
            return Err(ApiError::AuthRequired(
                "Authentication required for case analysis".to_string(),
            ));
        }
        self.health_check().await?;

        let url = self.config.url(&self.config.endpoints.analyze);
        info!(
            chars = request.case_description.len(),
            user_type = ?request.user_type,
            "submitting case for analysis"
        );
        let req = self.request(Method::POST, &url).await?.json(request);
        let resp: AnalysisResponse = self
            .call_json(req, self.config.timeout, "Analysis failed")
            .await?;
        info!(
            sections = resp.applicable_ipc_sections.len(),
            severity = resp.severity.as_deref().unwrap_or("unknown"),
            "analysis complete"
        );
        Ok(resp)
    }

    /// Run OCR on an image. The image is validated locally first.
    pub async fn extract_text_from_image(&self, upload: Upload) -> Result<OcrResult, ApiError> {
        crate::upload::validate(&upload.name, upload.size(), UploadKind::Image)?;
        if !self.session.is_authenticated().await? {
            return Err(ApiError::AuthRequired(
                "Image text extraction requires authentication".to_string(),
            ));
        }
        let url = self.config.url(&self.config.endpoints.extract_text);
        debug!(file = %upload.name, bytes = upload.size(), "uploading image for OCR");
        let form = upload.into_form("image")?;
        let req = self.request(Method::POST, &url).await?.multipart(form);
        let body = self
            .call(req, self.config.timeout, "Failed to extract text from image")
            .await?;
        unwrap_optional_envelope(body, "Failed to extract text from image")
    }

    pub async fn summarize_document(&self, upload: Upload) -> Result<SummaryResponse, ApiError> {
        crate::upload::validate(&upload.name, upload.size(), UploadKind::Document)?;
        let url = self.config.url(&self.config.endpoints.summarize);
        debug!(file = %upload.name, bytes = upload.size(), "uploading document for summary");
        let form = upload.into_form("file")?;
        let req = self.request(Method::POST, &url).await?.multipart(form);
        let body = self
            .call(req, self.config.timeout, "Document summarization failed")
            .await?;
        unwrap_optional_envelope(body, "Document summarization failed")
    }

    // ── History ──

    pub async fn list_activities(&self, query: &HistoryQuery) -> Result<ActivityList, ApiError> {
        let url = self.config.activities_url("");
        let req = self
            .request(Method::GET, &url)
            .await?
            .query(&query.to_params());
        self.call_json(req, self.config.timeout, "Failed to fetch history")
            .await
    }

    pub async fn activity_types(&self) -> Result<Vec<ActivityTypeOption>, ApiError> {
        let url = self.config.activities_url("types/");
        let req = self.request(Method::GET, &url).await?;
        let body = self
            .call(req, self.config.timeout, "Failed to fetch activity types")
            .await?;
        unwrap_envelope(body, "Failed to fetch activity types")
    }

    /// Delete remote history, all of it or only entries older than `days`.
    pub async fn clear_history(&self, days: Option<u32>) -> Result<ClearOutcome, ApiError> {
        let url = self.config.activities_url("clear/");
        let mut req = self.request(Method::DELETE, &url).await?;
        if let Some(days) = days {
            req = req.query(&[("days", days)]);
        }
        let body = self
            .call(req, self.config.timeout, "Failed to clear history")
            .await?;
        let outcome: ClearOutcome = decode(body)?;
        info!(deleted = outcome.deleted_count, ?days, "history cleared");
        Ok(outcome)
    }

    pub async fn export_history(&self, query: &HistoryQuery) -> Result<Vec<ActivityRecord>, ApiError> {
        let url = self.config.activities_url("export/");
        let req = self
            .request(Method::GET, &url)
            .await?
            .query(&query.to_params());
        let body = self
            .call(req, self.config.timeout, "Failed to export history")
            .await?;
        unwrap_envelope(body, "Failed to export history")
    }

    /// Usage counters, the last week's daily activity, and the most
    /// frequent activity types.
    pub async fn analytics(&self) -> Result<HistoryAnalytics, ApiError> {
        let url = self.config.url(&self.config.endpoints.analytics);
        let req = self.request(Method::GET, &url).await?;
        let body = self
            .call(req, self.config.timeout, "Failed to fetch analytics")
            .await?;
        unwrap_envelope(body, "Failed to fetch analytics")
    }

    pub async fn create_activity(&self, activity: &NewActivity) -> Result<ActivityRecord, ApiError> {
        let url = self.config.activities_url("create/");
        let body = self
            .post_json(&url, activity, "Failed to create activity record")
            .await?;
        unwrap_optional_envelope(body, "Failed to create activity record")
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body.clone()).map_err(|e| ApiError::MalformedResponse {
        message: format!("Invalid response format from server: {e}"),
        details: Some(body),
    })
}

/// Unwrap `{"status": "success", "data": ...}`. Any other status is a
/// rejection carrying the backend's message.
fn unwrap_envelope<T: DeserializeOwned>(body: Value, failure: &str) -> Result<T, ApiError> {
    if body.get("status").and_then(Value::as_str) != Some("success") {
        return Err(ApiError::Rejected {
            status: None,
            message: error_message(&body).unwrap_or_else(|| failure.to_string()),
            details: Some(body),
        });
    }
    let Some(data) = body.get("data").cloned() else {
        return Err(ApiError::MalformedResponse {
            message: "Invalid response format from server: missing data".to_string(),
            details: Some(body),
        });
    };
    decode(data)
}

/// Like [`unwrap_envelope`] for endpoints that may answer with the payload
/// directly or under `data`.
fn unwrap_optional_envelope<T: DeserializeOwned>(body: Value, failure: &str) -> Result<T, ApiError> {
    if body.get("status").is_some() {
        return unwrap_envelope(body, failure);
    }
    if let Some(data) = body.get("data").filter(|d| d.is_object()).cloned() {
        return decode(data);
    }
    decode(body)
}
