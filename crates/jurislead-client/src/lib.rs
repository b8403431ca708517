//! Client side of the Juris-Lead backend.
//!
//! [`ApiClient`] speaks the REST API and owns the session through a
//! [`SessionStore`]. [`auth::AuthContext`] and [`history::HistoryService`]
//! build the signed-in state and the activity log on top of it.

mod api;
pub mod auth;
mod config;
mod error;
pub mod history;
pub mod models;
mod session;
pub mod transform;
pub mod upload;

pub use api::ApiClient;
pub use auth::{Access, AuthContext};
pub use config::{ApiConfig, Endpoints};
pub use error::ApiError;
pub use history::{
    ActivityBucket, Deletion, HistoryError, HistoryFilter, HistoryPage, HistoryQuery, HistoryService,
    HistorySource, HistoryStats, HistoryView,
};
pub use session::{SessionStore, StorageSession};
pub use transform::transform_analysis_response;
pub use upload::{Upload, UploadKind};
