//! Subcommand handlers. Each one stands in for a page of the web front end.

pub mod account;
pub mod analyze;
pub mod explore;
pub mod history;
pub mod summarize;
pub mod timeline;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Utc;
use jurislead_client::{
    Access, ApiClient, ApiConfig, AuthContext, HistoryService, StorageSession,
};
use jurislead_core::Config;
use jurislead_store::LocalStorage;

/// Shared handles for one invocation.
pub struct App {
    pub storage: Arc<LocalStorage>,
    pub api: Arc<ApiClient>,
}

impl App {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let storage = LocalStorage::open_persistent(&config.storage_path).with_context(|| {
            format!("opening local storage {}", config.storage_path.display())
        })?;
        let storage = Arc::new(storage);
        let session = Arc::new(StorageSession::new(storage.clone()));
        let api = Arc::new(ApiClient::new(ApiConfig::from(config), session));
        Ok(Self { storage, api })
    }

    pub fn history(&self) -> HistoryService {
        HistoryService::new(self.api.clone(), self.storage.clone())
    }

    /// Auth state with the stored session restored.
    pub async fn auth(&self) -> anyhow::Result<AuthContext> {
        let mut auth = AuthContext::new(self.api.clone());
        auth.initialize().await.context("restoring session")?;
        Ok(auth)
    }
}

/// Write a report to `output`, or to `default_name` in the working directory.
pub fn write_download(output: Option<&Path>, default_name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let path = output.map_or_else(|| PathBuf::from(default_name), Path::to_path_buf);
    std::fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Fail with the refusal message unless `access` is granted.
pub fn require(access: Access) -> anyhow::Result<()> {
    match access.message() {
        Some((heading, body)) => bail!("{heading}: {body}"),
        None if access.is_granted() => Ok(()),
        None => bail!("session is still loading"),
    }
}
