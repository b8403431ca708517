//! Storage layer: file-backed local storage and the legacy history array.

mod error;
pub use error::StoreError;

mod local;
pub use local::LocalStorage;

pub mod legacy;
pub mod timelines;
pub use legacy::{
    LegacyHistoryItem, RestoredAnalysis, convert_legacy, load_legacy_history, restore_analysis,
    time_ago,
};
