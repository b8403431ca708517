use std::time::Duration;

use jurislead_core::Config;

/// Endpoint paths relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub analyze: String,
    pub health: String,
    pub login: String,
    pub google_login: String,
    pub logout: String,
    pub profile: String,
    pub token_refresh: String,
    pub extract_text: String,
    pub summarize: String,
    pub activities: String,
    pub analytics: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            analyze: "/leads/analyze-case/".into(),
            health: "/leads/health/".into(),
            login: "/auth/login/".into(),
            google_login: "/auth/google-login/".into(),
            logout: "/auth/logout/".into(),
            profile: "/auth/profile/".into(),
            token_refresh: "/auth/token/refresh/".into(),
            extract_text: "/legal/extract-text/".into(),
            summarize: "/legal/summarize-document/".into(),
            activities: "/auth/history/activities/".into(),
            analytics: "/auth/history/analytics/".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:8001/api/v1`.
    pub base_url: String,
    /// Applied to every request except health checks.
    pub timeout: Duration,
    pub health_timeout: Duration,
    pub endpoints: Endpoints,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self::from(&Config {
            api_base_url: base_url.to_string(),
            ..Config::default()
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of a sub-resource of the activity collection, e.g. `"types/"`.
    pub(crate) fn activities_url(&self, sub: &str) -> String {
        format!("{}{}{}", self.base_url, self.endpoints.activities, sub)
    }
}

impl From<&Config> for ApiConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            health_timeout: config.health_timeout,
            endpoints: Endpoints::default(),
        }
    }
}
