//! Read-only statistics over the application collection.
//!
//! # Responsibility
//! - Count applications per status for the distribution chart.
//! - Count submissions per trailing 7-day window for the timeline chart.
//!
//! # Invariants
//! - Distribution always has one entry per status, in canonical order.
//! - Timeline always has exactly `TIMELINE_WEEKS` buckets, oldest first.
//! - Buckets are contiguous, non-overlapping calendar-day ranges; a record
//!   lands in at most one bucket.
//! - A record dated after `now` is never counted.
//! - Nothing is cached; every call recomputes from the slice it is given.

use crate::model::application::{ApplicationStatus, JobApplication};
use chrono::{DateTime, Days, NaiveDate, Utc};

/// Number of trailing weekly buckets in the timeline.
pub const TIMELINE_WEEKS: u32 = 4;

const DAYS_PER_WEEK: u64 = 7;
const RANGE_DATE_FORMAT: &str = "%b %-d";

/// Count of applications in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
}

/// One trailing 7-day window of the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    /// `Week 1` (oldest) .. `Week 4` (ending today).
    pub label: String,
    /// First calendar day covered, inclusive.
    pub start: NaiveDate,
    /// Last calendar day covered, inclusive.
    pub end: NaiveDate,
    pub count: usize,
}

impl WeekBucket {
    /// Tooltip text such as `Jun 4 - Jun 10`.
    pub fn range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format(RANGE_DATE_FORMAT),
            self.end.format(RANGE_DATE_FORMAT)
        )
    }

    fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Both chart projections for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStats {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub timeline: Vec<WeekBucket>,
}

/// Counts applications per status, zero counts included.
pub fn status_distribution(applications: &[JobApplication]) -> Vec<StatusCount> {
    ApplicationStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: applications
                .iter()
                .filter(|application| application.status == status)
                .count(),
        })
        .collect()
}

/// Counts submissions per trailing week anchored on the UTC day of `now`.
///
/// Bucket `i` (0 = most recent) covers days `[today - 7i - 6, today - 7i]`.
/// Records dated after `now` or before the oldest bucket are not counted,
/// even when they fall on the same calendar day as `now`.
pub fn weekly_timeline(now: DateTime<Utc>, applications: &[JobApplication]) -> Vec<WeekBucket> {
    let today = now.date_naive();
    let mut buckets: Vec<WeekBucket> = (0..u64::from(TIMELINE_WEEKS))
        .rev()
        .filter_map(|weeks_back| {
            let end = today.checked_sub_days(Days::new(weeks_back * DAYS_PER_WEEK))?;
            let start = end.checked_sub_days(Days::new(DAYS_PER_WEEK - 1))?;
            Some(WeekBucket {
                label: format!("Week {}", u64::from(TIMELINE_WEEKS) - weeks_back),
                start,
                end,
                count: 0,
            })
        })
        .collect();

    for application in applications {
        if application.date_applied > now {
            continue;
        }
        let day = application.date_applied.date_naive();
        if let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.contains(day)) {
            bucket.count += 1;
        }
    }

    buckets
}

/// Computes distribution and timeline together.
pub fn collection_stats(now: DateTime<Utc>, applications: &[JobApplication]) -> CollectionStats {
    CollectionStats {
        total: applications.len(),
        by_status: status_distribution(applications),
        timeline: weekly_timeline(now, applications),
    }
}
