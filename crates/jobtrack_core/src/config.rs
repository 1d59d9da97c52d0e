//! Tracker configuration.
//!
//! # Responsibility
//! - Collect the few tunables a host application may override.
//! - Provide defaults matching stock tracker behavior.

use crate::logging::default_log_level;
use crate::notify::DEFAULT_NOTIFICATION_DURATION_MS;
use crate::repo::application_store::DEFAULT_STORAGE_KEY;

/// Host-provided settings for one tracker instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Key the collection is stored under in the key-value store.
    pub storage_key: String,
    /// Display duration attached to every emitted notification.
    pub notification_duration_ms: u32,
    /// Level passed to [`crate::init_logging`] by hosts that log to file.
    pub log_level: &'static str,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            notification_duration_ms: DEFAULT_NOTIFICATION_DURATION_MS,
            log_level: default_log_level(),
        }
    }
}
