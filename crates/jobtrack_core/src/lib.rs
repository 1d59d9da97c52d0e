//! Core domain logic for the job application tracker.
//! This crate is the single source of truth for record invariants, reminder
//! classification and collection statistics.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod reminder;
pub mod repo;
pub mod search;
pub mod service;
pub mod stats;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::TrackerConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::application::{
    ApplicationDraft, ApplicationId, ApplicationStatus, ApplicationValidationError,
    JobApplication,
};
pub use notify::{
    Notification, NotificationLevel, NotificationSink, NullSink, RecordingSink,
    DEFAULT_NOTIFICATION_DURATION_MS,
};
pub use reminder::{
    classify, follow_up_reminder, reminders_for, FollowUpReminder, ReminderTier,
    REMINDER_WINDOW_DAYS,
};
pub use repo::application_store::{
    ApplicationStore, MemoryApplicationStore, SqliteApplicationStore, StoreError, StoreResult,
    DEFAULT_STORAGE_KEY,
};
pub use search::filter_applications;
pub use service::application_service::{
    ApplicationService, ApplicationState, ServiceError, ServiceResult,
};
pub use stats::{
    collection_stats, status_distribution, weekly_timeline, CollectionStats, StatusCount,
    WeekBucket, TIMELINE_WEEKS,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
