//! Follow-up reminder classification.
//!
//! # Responsibility
//! - Classify a follow-up date relative to an explicit `now`.
//! - Carry the company name and formatted date a caller needs to build a
//!   notification, without reading the clock or touching any UI.
//!
//! # Invariants
//! - Classification is total and side-effect free.
//! - `now` itself is upcoming, not overdue; `now + 3 days` is outside the
//!   upcoming window.

use crate::model::application::{ApplicationId, JobApplication};
use crate::notify::{Notification, NotificationLevel};
use chrono::{DateTime, Duration, Utc};

/// Width of the upcoming window, in days from `now`.
pub const REMINDER_WINDOW_DAYS: i64 = 3;

const REMINDER_DATE_FORMAT: &str = "%b %-d, %Y";

/// Classification tier of one follow-up date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderTier {
    None,
    Upcoming,
    Overdue,
}

/// Classifies `follow_up` relative to `now`.
///
/// - absent -> `None`
/// - strictly before `now` -> `Overdue`
/// - in `[now, now + 3 days)` -> `Upcoming`
/// - otherwise -> `None`
pub fn classify(now: DateTime<Utc>, follow_up: Option<DateTime<Utc>>) -> ReminderTier {
    let Some(follow_up) = follow_up else {
        return ReminderTier::None;
    };

    if follow_up < now {
        ReminderTier::Overdue
    } else if follow_up < now + Duration::days(REMINDER_WINDOW_DAYS) {
        ReminderTier::Upcoming
    } else {
        ReminderTier::None
    }
}

/// A classified follow-up that warrants a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpReminder {
    pub tier: ReminderTier,
    pub application_id: ApplicationId,
    pub company_name: String,
    pub follow_up_date: DateTime<Utc>,
    /// `follow_up_date` rendered as `Jun 8, 2024`.
    pub formatted_date: String,
}

impl FollowUpReminder {
    /// Renders the notification shown for this reminder.
    ///
    /// Returns `None` for `ReminderTier::None`; that tier is never shown.
    pub fn to_notification(&self, duration_ms: u32) -> Option<Notification> {
        let notification = match self.tier {
            ReminderTier::None => return None,
            ReminderTier::Overdue => Notification::new(
                NotificationLevel::Error,
                format!("Overdue follow-up for {}", self.company_name),
                duration_ms,
            )
            .with_description(format!(
                "You were supposed to follow up on {}",
                self.formatted_date
            )),
            ReminderTier::Upcoming => Notification::new(
                NotificationLevel::Info,
                format!("Follow-up soon for {}", self.company_name),
                duration_ms,
            )
            .with_description(format!("Follow-up date is on {}", self.formatted_date)),
        };
        Some(notification)
    }
}

/// Classifies one record; returns `None` when nothing should be shown.
pub fn follow_up_reminder(
    now: DateTime<Utc>,
    application: &JobApplication,
) -> Option<FollowUpReminder> {
    let follow_up_date = application.follow_up_date?;
    match classify(now, Some(follow_up_date)) {
        ReminderTier::None => None,
        tier => Some(FollowUpReminder {
            tier,
            application_id: application.id,
            company_name: application.company_name.clone(),
            follow_up_date,
            formatted_date: format_reminder_date(follow_up_date),
        }),
    }
}

/// Classifies a whole collection, keeping collection order.
pub fn reminders_for(now: DateTime<Utc>, applications: &[JobApplication]) -> Vec<FollowUpReminder> {
    applications
        .iter()
        .filter_map(|application| follow_up_reminder(now, application))
        .collect()
}

pub fn format_reminder_date(date: DateTime<Utc>) -> String {
    date.format(REMINDER_DATE_FORMAT).to_string()
}
