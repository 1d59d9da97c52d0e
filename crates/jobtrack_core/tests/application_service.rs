use chrono::{DateTime, Duration, TimeZone, Utc};
use jobtrack_core::db::open_db_in_memory;
use jobtrack_core::{
    ApplicationDraft, ApplicationService, ApplicationStatus, ApplicationStore,
    ApplicationValidationError, FixedClock, JobApplication, MemoryApplicationStore,
    NotificationLevel, RecordingSink, ReminderTier, ServiceError, SqliteApplicationStore,
    StoreError, TrackerConfig,
};
use uuid::Uuid;

type MemoryService<'a> =
    ApplicationService<&'a mut MemoryApplicationStore, RecordingSink, FixedClock>;

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn now() -> DateTime<Utc> {
    at(2024, 6, 10)
}

fn tracker(store: &mut MemoryApplicationStore) -> MemoryService<'_> {
    ApplicationService::new(store, RecordingSink::new(), FixedClock::new(now()))
}

fn draft(company: &str, role: &str) -> ApplicationDraft {
    ApplicationDraft::new(company, role, at(2024, 6, 9))
}

#[test]
fn add_then_load_round_trips_record() {
    let mut store = MemoryApplicationStore::new();
    let added = {
        let mut service = tracker(&mut store);
        service
            .add(
                draft("Acme", "Engineer")
                    .with_status(ApplicationStatus::Interviewing)
                    .with_notes("second round"),
            )
            .unwrap()
    };
    assert!(!added.id.is_nil());

    let mut reloaded = tracker(&mut store);
    reloaded.load_all().unwrap();
    assert_eq!(reloaded.snapshot(), &[added]);
}

#[test]
fn add_emits_success_notification() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    service.add(draft("Acme", "Engineer")).unwrap();

    let notifications = service.sink().notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Success);
    assert_eq!(notifications[0].title, "Application added successfully");
    assert_eq!(notifications[0].duration_ms, 5_000);
}

#[test]
fn add_with_near_follow_up_emits_reminder_after_success() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    service
        .add(draft("Acme", "Engineer").with_follow_up(at(2024, 6, 12)))
        .unwrap();

    let notifications = service.sink().notifications();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[1].level, NotificationLevel::Info);
    assert_eq!(notifications[1].title, "Follow-up soon for Acme");
    assert_eq!(
        notifications[1].description.as_deref(),
        Some("Follow-up date is on Jun 12, 2024")
    );
}

#[test]
fn add_rejects_missing_fields_without_mutation() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);

    let err = service.add(draft("Acme", "  ")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ApplicationValidationError::MissingRole)
    ));
    assert!(service.snapshot().is_empty());
    assert_eq!(service.state().revision(), 0);
    assert!(service.sink().notifications().is_empty());
    drop(service);
    assert_eq!(store.save_count(), 0);
}

#[test]
fn update_replaces_in_place_and_persists() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    let first = service.add(draft("Acme", "Engineer")).unwrap();
    let second = service.add(draft("Globex", "Analyst")).unwrap();

    let mut edited = first.clone();
    edited.status = ApplicationStatus::Offer;
    edited.notes = Some("verbal offer".to_string());
    service.update(edited.clone()).unwrap();

    assert_eq!(service.snapshot(), &[edited.clone(), second.clone()]);
    assert_eq!(service.store().load().unwrap(), vec![edited, second]);
}

#[test]
fn update_unknown_id_fails_and_leaves_state() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    service.add(draft("Acme", "Engineer")).unwrap();
    let revision = service.state().revision();

    let stranger = JobApplication::new("Initech", "Tester", now(), ApplicationStatus::Applied);
    let err = service.update(stranger.clone()).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == stranger.id));
    assert_eq!(service.state().revision(), revision);
    assert_eq!(service.snapshot().len(), 1);
}

#[test]
fn update_clearing_follow_up_emits_no_reminder() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    let added = service
        .add(draft("Acme", "Engineer").with_follow_up(at(2024, 6, 8)))
        .unwrap();
    service.sink_mut().drain();

    let mut edited = added;
    edited.follow_up_date = None;
    service.update(edited).unwrap();

    let notifications = service.sink().notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Application updated successfully");
}

#[test]
fn update_with_overdue_follow_up_emits_error_reminder() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    let added = service.add(draft("Acme", "Engineer")).unwrap();
    service.sink_mut().drain();

    let mut edited = added;
    edited.status = ApplicationStatus::FollowUp;
    edited.follow_up_date = Some(at(2024, 6, 8));
    service.update(edited).unwrap();

    let notifications = service.sink().notifications();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[1].level, NotificationLevel::Error);
    assert_eq!(notifications[1].title, "Overdue follow-up for Acme");
    assert_eq!(
        notifications[1].description.as_deref(),
        Some("You were supposed to follow up on Jun 8, 2024")
    );
}

#[test]
fn delete_is_idempotent() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    let first = service.add(draft("Acme", "Engineer")).unwrap();
    let second = service.add(draft("Globex", "Analyst")).unwrap();

    assert!(service.delete(first.id).unwrap());
    let after_once = service.snapshot().to_vec();
    assert!(!service.delete(first.id).unwrap());

    assert_eq!(service.snapshot(), after_once.as_slice());
    assert_eq!(service.snapshot(), &[second.clone()]);
    assert_eq!(service.store().load().unwrap(), vec![second]);
}

#[test]
fn search_matches_company_or_role_case_insensitively() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    let acme = service.add(draft("Acme Corp", "Backend Engineer")).unwrap();
    let globex = service.add(draft("Globex", "Data Engineer")).unwrap();
    service.add(draft("Initech", "Analyst")).unwrap();

    assert_eq!(service.search("").len(), 3);
    assert_eq!(service.search("acme"), vec![acme.clone()]);
    assert_eq!(service.search("ENGINEER"), vec![acme, globex]);
    assert!(service.search("umbrella").is_empty());
}

#[test]
fn failed_save_keeps_previous_snapshot() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    let kept = service.add(draft("Acme", "Engineer")).unwrap();
    service.sink_mut().drain();
    let revision = service.state().revision();

    service.store_mut().fail_next_save("quota exceeded");
    let err = service.add(draft("Globex", "Analyst")).unwrap_err();

    assert!(matches!(err, ServiceError::Store(StoreError::Unavailable(_))));
    assert_eq!(service.snapshot(), &[kept]);
    assert_eq!(service.state().revision(), revision);

    let notifications = service.sink().notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
    assert_eq!(notifications[0].title, "Failed to save applications");
}

#[test]
fn load_all_emits_reminder_batch_in_collection_order() {
    let mut store = MemoryApplicationStore::new();
    let seeded = {
        let mut service = tracker(&mut store);
        let overdue = service
            .add(draft("Acme", "Engineer").with_follow_up(at(2024, 6, 8)))
            .unwrap();
        let upcoming = service
            .add(draft("Globex", "Analyst").with_follow_up(at(2024, 6, 12)))
            .unwrap();
        let distant = service
            .add(draft("Initech", "Tester").with_follow_up(at(2024, 6, 20)))
            .unwrap();
        service.add(draft("Umbrella", "Chemist")).unwrap();
        vec![overdue, upcoming, distant]
    };

    let mut service = tracker(&mut store);
    let reminders = service.load_all().unwrap();

    assert_eq!(reminders.len(), 2);
    assert_eq!(reminders[0].application_id, seeded[0].id);
    assert_eq!(reminders[0].tier, ReminderTier::Overdue);
    assert_eq!(reminders[1].application_id, seeded[1].id);
    assert_eq!(reminders[1].tier, ReminderTier::Upcoming);

    let levels: Vec<NotificationLevel> = service
        .sink()
        .notifications()
        .iter()
        .map(|notification| notification.level)
        .collect();
    assert_eq!(levels, vec![NotificationLevel::Error, NotificationLevel::Info]);
    assert_eq!(service.snapshot().len(), 4);
}

#[test]
fn load_all_uses_clock_at_call_time() {
    let mut store = MemoryApplicationStore::new();
    {
        let mut service = tracker(&mut store);
        service
            .add(draft("Acme", "Engineer").with_follow_up(at(2024, 6, 20)))
            .unwrap();
    }

    let mut service = tracker(&mut store);
    assert!(service.load_all().unwrap().is_empty());

    service.clock_mut().set(at(2024, 6, 18));
    let reminders = service.load_all().unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].tier, ReminderTier::Upcoming);
}

#[test]
fn load_all_reports_corrupted_store() {
    let mut store = MemoryApplicationStore::with_raw("{broken");
    let mut service = tracker(&mut store);

    let err = service.load_all().unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::InvalidData(_))));
    assert!(service.snapshot().is_empty());
}

#[test]
fn stats_reflect_current_collection() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    service
        .add(draft("Acme", "Engineer").with_status(ApplicationStatus::Offer))
        .unwrap();
    service
        .add(ApplicationDraft::new("Globex", "Analyst", now() - Duration::days(40)))
        .unwrap();

    let stats = service.stats();
    assert_eq!(stats.total, 2);
    let offer = stats
        .by_status
        .iter()
        .find(|entry| entry.status == ApplicationStatus::Offer)
        .unwrap();
    assert_eq!(offer.count, 1);
    let timeline_total: usize = stats.timeline.iter().map(|bucket| bucket.count).sum();
    assert_eq!(timeline_total, 1);
}

#[test]
fn clear_all_empties_store_and_state() {
    let mut store = MemoryApplicationStore::new();
    let mut service = tracker(&mut store);
    service.add(draft("Acme", "Engineer")).unwrap();

    service.clear_all().unwrap();
    assert!(service.snapshot().is_empty());
    drop(service);
    assert!(store.raw().is_none());
}

#[test]
fn sqlite_backed_service_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let added = {
        let store = SqliteApplicationStore::new(&conn);
        let mut service =
            ApplicationService::new(store, RecordingSink::new(), FixedClock::new(now()));
        service.load_all().unwrap();
        service.add(draft("Acme", "Engineer")).unwrap()
    };

    let store = SqliteApplicationStore::new(&conn);
    let mut service =
        ApplicationService::new(store, RecordingSink::new(), FixedClock::new(now()));
    service.load_all().unwrap();
    assert_eq!(service.get(added.id), Some(&added));
    assert_eq!(service.get(Uuid::new_v4()), None);
}

#[test]
fn configured_duration_applies_to_every_notification() {
    let mut store = MemoryApplicationStore::new();
    let config = TrackerConfig {
        notification_duration_ms: 8_000,
        ..TrackerConfig::default()
    };
    let mut service = ApplicationService::with_config(
        &mut store,
        RecordingSink::new(),
        FixedClock::new(now()),
        config,
    );
    service
        .add(draft("Acme", "Engineer").with_follow_up(at(2024, 6, 11)))
        .unwrap();

    let notifications = service.sink().notifications();
    assert_eq!(notifications.len(), 2);
    assert!(notifications
        .iter()
        .all(|notification| notification.duration_ms == 8_000));
}
