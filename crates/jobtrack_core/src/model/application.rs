//! Job application domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted by the tracker.
//! - Define draft input and validation rules for create/update paths.
//!
//! # Invariants
//! - `id` is stable, never nil and never reused for another application.
//! - `company_name` and `role` are non-empty after trimming.
//! - `follow_up_date` has no ordering constraint relative to `date_applied`.
//!
//! # See also
//! - docs/architecture/data-model.md

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one job application.
pub type ApplicationId = Uuid;

/// Pipeline stage of one application.
///
/// Declaration order is the canonical display order used by statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Offer,
    Rejected,
    /// Serialized as `Follow-up` to match stored data.
    #[serde(rename = "Follow-up")]
    FollowUp,
}

impl ApplicationStatus {
    /// All statuses in canonical order.
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::FollowUp,
    ];

    /// Human-facing label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interviewing => "Interviewing",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
            Self::FollowUp => "Follow-up",
        }
    }
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failures for application drafts and records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationValidationError {
    MissingCompanyName,
    MissingRole,
    MissingDateApplied,
    MissingStatus,
    NilId,
}

impl Display for ApplicationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCompanyName => write!(f, "company name is required"),
            Self::MissingRole => write!(f, "role is required"),
            Self::MissingDateApplied => write!(f, "date applied is required"),
            Self::MissingStatus => write!(f, "status is required"),
            Self::NilId => write!(f, "application id must not be nil"),
        }
    }
}

impl Error for ApplicationValidationError {}

/// Canonical persisted record for one job application.
///
/// Field names serialize in camelCase and absent optional fields are omitted,
/// so one stored array stays readable by earlier versions of the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: ApplicationId,
    pub company_name: String,
    pub role: String,
    #[serde(with = "iso8601")]
    pub date_applied: DateTime<Utc>,
    pub status: ApplicationStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "iso8601::option"
    )]
    pub follow_up_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl JobApplication {
    /// Creates a record with a freshly generated id and no optional fields.
    pub fn new(
        company_name: impl Into<String>,
        role: impl Into<String>,
        date_applied: DateTime<Utc>,
        status: ApplicationStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_name: company_name.into(),
            role: role.into(),
            date_applied,
            status,
            follow_up_date: None,
            notes: None,
        }
    }

    /// Validates record-level invariants.
    ///
    /// # Errors
    /// - `NilId` when `id` is nil.
    /// - `MissingCompanyName`/`MissingRole` when either is blank.
    pub fn validate(&self) -> Result<(), ApplicationValidationError> {
        if self.id.is_nil() {
            return Err(ApplicationValidationError::NilId);
        }
        if self.company_name.trim().is_empty() {
            return Err(ApplicationValidationError::MissingCompanyName);
        }
        if self.role.trim().is_empty() {
            return Err(ApplicationValidationError::MissingRole);
        }
        Ok(())
    }
}

/// Form input for a new application, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationDraft {
    pub company_name: String,
    pub role: String,
    pub date_applied: Option<DateTime<Utc>>,
    pub status: Option<ApplicationStatus>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl ApplicationDraft {
    /// Creates a draft with status pre-set to `Applied`.
    pub fn new(
        company_name: impl Into<String>,
        role: impl Into<String>,
        date_applied: DateTime<Utc>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            role: role.into(),
            date_applied: Some(date_applied),
            status: Some(ApplicationStatus::Applied),
            follow_up_date: None,
            notes: None,
        }
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_follow_up(mut self, follow_up_date: DateTime<Utc>) -> Self {
        self.follow_up_date = Some(follow_up_date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validates required fields and builds a record under `id`.
    ///
    /// Empty notes are normalized to `None`. No other field is rewritten.
    ///
    /// # Errors
    /// Returns the first missing required field, checked in form order.
    pub fn into_application(
        self,
        id: ApplicationId,
    ) -> Result<JobApplication, ApplicationValidationError> {
        if self.company_name.trim().is_empty() {
            return Err(ApplicationValidationError::MissingCompanyName);
        }
        if self.role.trim().is_empty() {
            return Err(ApplicationValidationError::MissingRole);
        }
        let date_applied = self
            .date_applied
            .ok_or(ApplicationValidationError::MissingDateApplied)?;
        let status = self.status.ok_or(ApplicationValidationError::MissingStatus)?;

        let application = JobApplication {
            id,
            company_name: self.company_name,
            role: self.role,
            date_applied,
            status,
            follow_up_date: self.follow_up_date,
            notes: self.notes.filter(|notes| !notes.is_empty()),
        };
        application.validate()?;
        Ok(application)
    }
}

/// ISO-8601 instant encoding with millisecond precision and `Z` suffix.
///
/// Reads any RFC 3339 string, including offsets other than UTC.
mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        DateTime::parse_from_rfc3339(raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(|err| format!("invalid ISO-8601 instant `{raw}`: {err}"))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}
