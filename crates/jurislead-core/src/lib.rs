pub mod activity;
pub mod analysis;
pub mod config;
pub mod ipc;
pub mod keys;
pub mod profile;
pub mod sort_key;
pub mod timeline;

pub use activity::{ActivityRecord, ActivityStatus, ActivityTypeOption, NewActivity};
pub use analysis::{
    AnalysisRequest, AnalysisResponse, AnalysisResult, BackendSection, ContactMethod, Section,
    Severity, UrgencyLevel, UserType,
};
pub use config::{Config, ConfigError};
pub use ipc::{IpcSection, SectionSeverity};
pub use profile::{UserProfile, UserRole};
pub use sort_key::{normalize_section, section_number};
pub use timeline::{
    CaseTimeline, EventKind, Importance, NewEvent, TimelineBrief, TimelineEvent, TimelineStatus,
};
