//! Notification contract consumed by the service layer.
//!
//! # Responsibility
//! - Describe user-facing notifications without owning their display.
//! - Provide an in-memory sink for tests and headless callers.
//!
//! # Invariants
//! - Sinks are fire-and-forget; a sink can never fail a mutation.

use std::fmt::{Display, Formatter};

/// Default on-screen duration for notifications, in milliseconds.
pub const DEFAULT_NOTIFICATION_DURATION_MS: u32 = 5_000;

/// Severity tier used by the display layer to pick styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

impl Display for NotificationLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One message handed to the display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: Option<String>,
    pub duration_ms: u32,
}

impl Notification {
    /// Creates a notification without description.
    pub fn new(level: NotificationLevel, title: impl Into<String>, duration_ms: u32) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
            duration_ms,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Receiver for notifications emitted by the service.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

impl<N: NotificationSink + ?Sized> NotificationSink for &mut N {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _notification: Notification) {}
}

/// Sink that keeps every notification in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    notifications: Vec<Notification>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Returns and forgets everything recorded so far.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
