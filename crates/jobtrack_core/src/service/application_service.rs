//! Application use-case service.
//!
//! # Responsibility
//! - Own the in-memory collection and expose add/update/delete/search.
//! - Persist the full collection through the record store after every
//!   mutation.
//! - Classify follow-ups on load and on single-record writes, and hand the
//!   resulting notifications to the sink.
//!
//! # Invariants
//! - A mutation is committed to memory only after its save succeeded; a
//!   failed save leaves the snapshot and revision untouched.
//! - `id` values are unique within the collection and never rewritten.
//! - "now" is read from the injected clock, never from ambient state.

use crate::clock::Clock;
use crate::config::TrackerConfig;
use crate::model::application::{
    ApplicationDraft, ApplicationId, ApplicationValidationError, JobApplication,
};
use crate::notify::{Notification, NotificationLevel, NotificationSink};
use crate::reminder::{follow_up_reminder, reminders_for, FollowUpReminder};
use crate::repo::application_store::{ApplicationStore, StoreError};
use crate::search::filter_applications;
use crate::stats::{collection_stats, CollectionStats};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for application use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Required field missing or blank; nothing was changed.
    Validation(ApplicationValidationError),
    /// Update target does not exist.
    NotFound(ApplicationId),
    /// Persistence failed; the in-memory collection was not changed.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "application not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ApplicationValidationError> for ServiceError {
    fn from(value: ApplicationValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Current collection plus a revision bumped on every committed mutation.
///
/// Views compare `revision` to decide whether to re-render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationState {
    applications: Vec<JobApplication>,
    revision: u64,
}

impl ApplicationState {
    pub fn applications(&self) -> &[JobApplication] {
        &self.applications
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn replace(&mut self, applications: Vec<JobApplication>) {
        self.applications = applications;
        self.revision += 1;
    }
}

/// Orchestrates the collection, its store, and follow-up notifications.
pub struct ApplicationService<S: ApplicationStore, N: NotificationSink, C: Clock> {
    store: S,
    sink: N,
    clock: C,
    config: TrackerConfig,
    state: ApplicationState,
}

impl<S: ApplicationStore, N: NotificationSink, C: Clock> ApplicationService<S, N, C> {
    /// Creates a service with default configuration and an empty state.
    ///
    /// Call [`Self::load_all`] to populate the state from the store.
    pub fn new(store: S, sink: N, clock: C) -> Self {
        Self::with_config(store, sink, clock, TrackerConfig::default())
    }

    pub fn with_config(store: S, sink: N, clock: C, config: TrackerConfig) -> Self {
        Self {
            store,
            sink,
            clock,
            config,
            state: ApplicationState::default(),
        }
    }

    /// Reads the full collection and emits the startup reminder batch.
    ///
    /// # Errors
    /// - `Store` when the stored value cannot be read or decoded; the
    ///   previous state is kept.
    pub fn load_all(&mut self) -> ServiceResult<Vec<FollowUpReminder>> {
        let started_at = Instant::now();
        let applications = match self.store.load() {
            Ok(applications) => applications,
            Err(err) => {
                error!(
                    "event=applications_load module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let reminders = reminders_for(self.clock.now(), &applications);
        self.state.replace(applications);
        for reminder in &reminders {
            self.emit_reminder(reminder);
        }

        info!(
            "event=applications_load module=service status=ok count={} reminders={} duration_ms={}",
            self.state.applications.len(),
            reminders.len(),
            started_at.elapsed().as_millis()
        );
        Ok(reminders)
    }

    /// Validates `draft`, assigns a fresh id, appends and persists.
    ///
    /// # Errors
    /// - `Validation` when a required field is missing; nothing is stored.
    /// - `Store` when persisting fails; the collection is unchanged.
    pub fn add(&mut self, draft: ApplicationDraft) -> ServiceResult<JobApplication> {
        let application = draft.into_application(self.fresh_id())?;

        let mut next = self.state.applications.clone();
        next.push(application.clone());
        self.commit("application_add", next)?;

        info!(
            "event=application_add module=service status=ok id={} status_value={}",
            application.id, application.status
        );
        self.notify_success("Application added successfully");
        if application.follow_up_date.is_some() {
            self.check_follow_up(&application);
        }
        Ok(application)
    }

    /// Replaces the stored record with the same id, keeping its position.
    ///
    /// # Errors
    /// - `Validation` when the record breaks model invariants.
    /// - `NotFound` when no record has `application.id`.
    /// - `Store` when persisting fails; the collection is unchanged.
    pub fn update(&mut self, application: JobApplication) -> ServiceResult<JobApplication> {
        application.validate()?;

        let Some(position) = self.position_of(application.id) else {
            debug!(
                "event=application_update module=service status=not_found id={}",
                application.id
            );
            return Err(ServiceError::NotFound(application.id));
        };

        let mut next = self.state.applications.clone();
        next[position] = application.clone();
        self.commit("application_update", next)?;

        info!(
            "event=application_update module=service status=ok id={}",
            application.id
        );
        self.notify_success("Application updated successfully");
        if application.follow_up_date.is_some() {
            self.check_follow_up(&application);
        }
        Ok(application)
    }

    /// Removes the record with `id` and persists the result.
    ///
    /// Deleting an unknown id is not an error: the collection is rewritten
    /// unchanged and `false` is returned.
    ///
    /// # Errors
    /// - `Store` when persisting fails; the collection is unchanged.
    pub fn delete(&mut self, id: ApplicationId) -> ServiceResult<bool> {
        let next: Vec<JobApplication> = self
            .state
            .applications
            .iter()
            .filter(|application| application.id != id)
            .cloned()
            .collect();
        let removed = next.len() != self.state.applications.len();
        self.commit("application_delete", next)?;

        info!("event=application_delete module=service status=ok id={id} removed={removed}");
        self.notify_success("Application deleted successfully");
        Ok(removed)
    }

    /// Case-insensitive search on company name or role. Blank returns all.
    pub fn search(&self, term: &str) -> Vec<JobApplication> {
        filter_applications(&self.state.applications, term)
    }

    pub fn get(&self, id: ApplicationId) -> Option<&JobApplication> {
        self.state
            .applications
            .iter()
            .find(|application| application.id == id)
    }

    /// Current collection in insertion order.
    pub fn snapshot(&self) -> &[JobApplication] {
        &self.state.applications
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    /// Distribution and timeline for the current collection at `clock.now()`.
    pub fn stats(&self) -> CollectionStats {
        collection_stats(self.clock.now(), &self.state.applications)
    }

    /// Removes every stored record and empties the in-memory collection.
    pub fn clear_all(&mut self) -> ServiceResult<()> {
        self.store.clear()?;
        self.state.replace(Vec::new());
        info!("event=applications_clear module=service status=ok");
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut N {
        &mut self.sink
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    fn commit(&mut self, event: &'static str, next: Vec<JobApplication>) -> ServiceResult<()> {
        let started_at = Instant::now();
        if let Err(err) = self.store.save(&next) {
            error!(
                "event={event} module=service status=error error_code=store_save_failed count={} duration_ms={} error={}",
                next.len(),
                started_at.elapsed().as_millis(),
                err
            );
            self.sink.notify(
                Notification::new(
                    NotificationLevel::Error,
                    "Failed to save applications",
                    self.config.notification_duration_ms,
                )
                .with_description(err.to_string()),
            );
            return Err(err.into());
        }

        debug!(
            "event=store_save module=service status=ok count={} duration_ms={}",
            next.len(),
            started_at.elapsed().as_millis()
        );
        self.state.replace(next);
        Ok(())
    }

    fn check_follow_up(&mut self, application: &JobApplication) {
        if let Some(reminder) = follow_up_reminder(self.clock.now(), application) {
            self.emit_reminder(&reminder);
        }
    }

    fn emit_reminder(&mut self, reminder: &FollowUpReminder) {
        debug!(
            "event=follow_up_reminder module=service tier={:?} id={}",
            reminder.tier, reminder.application_id
        );
        if let Some(notification) = reminder.to_notification(self.config.notification_duration_ms) {
            self.sink.notify(notification);
        }
    }

    fn notify_success(&mut self, title: &str) {
        self.sink.notify(Notification::new(
            NotificationLevel::Success,
            title,
            self.config.notification_duration_ms,
        ));
    }

    fn position_of(&self, id: ApplicationId) -> Option<usize> {
        self.state
            .applications
            .iter()
            .position(|application| application.id == id)
    }

    fn fresh_id(&self) -> ApplicationId {
        loop {
            let id = Uuid::new_v4();
            if self.position_of(id).is_none() {
                return id;
            }
        }
    }
}
