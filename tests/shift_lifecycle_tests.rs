use std::collections::HashMap;

use chrono::NaiveDate;
use fake::Fake;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use carepoint::AppError;
use carepoint::database::models::{
    AuditAction, AuditFilter, AuditLogEntry, AvailabilityQuery, CreateShiftInput, DayOfWeek,
    NewAuditEntry, NewNotification, Notification, Recurrence, Shift, ShiftStatus,
    ShiftTemplateInput, TemplateStatus, UpdateShiftInput,
};
use carepoint::database::store::{AuditStore, NotificationStore, StoreError, StoreResult};
use carepoint::services::{AuditRecorder, ConnectionRegistry, Dispatcher, Notifier, ShiftService};

mod common;
use common::{TestContext, at};

fn shift_input(client_id: Uuid, staff_id: Option<Uuid>, start: u32, end: u32) -> CreateShiftInput {
    CreateShiftInput {
        client_id,
        staff_id,
        start_time: at(start),
        end_time: at(end),
    }
}

fn notifications_for(all: &[Notification], staff_id: Uuid) -> Vec<&Notification> {
    all.iter().filter(|n| n.recipient_id == staff_id).collect()
}

fn actions(log: &[AuditLogEntry]) -> Vec<&str> {
    log.iter().map(|e| e.action.as_str()).collect()
}

#[tokio::test]
async fn scheduling_walkthrough() {
    let ctx = TestContext::new();
    let admin = ctx.admin();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;
    let shifts = &ctx.state.shifts;

    // Unstaffed shift starts pending and notifies nobody.
    let day = shifts
        .create(&admin, shift_input(client, None, 9, 17))
        .await
        .unwrap();
    ctx.settle().await;
    assert_eq!(day.status, ShiftStatus::Pending);
    assert_eq!(day.staff_id, None);
    assert!(ctx.store.notifications().await.is_empty());

    // Assigning notifies the staff member once and audits once.
    let assigned = shifts.assign(&admin, day.id, staff).await.unwrap();
    ctx.settle().await;
    assert_eq!(assigned.status, ShiftStatus::Assigned);
    assert_eq!(assigned.staff_id, Some(staff));
    let notes = ctx.store.notifications().await;
    assert_eq!(notifications_for(&notes, staff).len(), 1);
    let log = ctx.store.audit_log().await;
    assert_eq!(
        log.iter()
            .filter(|e| e.action == AuditAction::ASSIGN_SHIFT)
            .count(),
        1
    );

    // An overlapping shift cannot take the same staff member.
    let overlapping = shifts
        .create(&admin, shift_input(client, None, 10, 11))
        .await
        .unwrap();
    ctx.settle().await;
    let notes_before = ctx.store.notifications().await.len();
    let err = shifts.assign(&admin, overlapping.id, staff).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
    ctx.settle().await;
    assert_eq!(shifts.get(overlapping.id).await.unwrap(), overlapping);
    assert_eq!(ctx.store.notifications().await.len(), notes_before);

    // A later shift the same day is fine.
    let evening = shifts
        .create(&admin, shift_input(client, None, 18, 20))
        .await
        .unwrap();
    let evening = shifts.assign(&admin, evening.id, staff).await.unwrap();
    assert_eq!(evening.status, ShiftStatus::Assigned);

    // Cancelling tells the staff member and frees the window.
    let cancelled = shifts.cancel(&admin, day.id).await.unwrap();
    ctx.settle().await;
    assert_eq!(cancelled.status, ShiftStatus::Cancelled);
    let notes = ctx.store.notifications().await;
    let last = notifications_for(&notes, staff).into_iter().last().unwrap();
    assert_eq!(last.title, "Shift Cancelled");

    let report = shifts
        .availability(&AvailabilityQuery {
            staff_id: staff,
            start_time: at(9),
            end_time: at(17),
            exclude_shift_id: None,
        })
        .await
        .unwrap();
    assert!(report.available);
    assert!(report.conflicts.is_empty());
}

#[tokio::test]
async fn cancelling_twice_emits_once() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;
    let shift = ctx
        .state
        .shifts
        .create(&ctx.admin(), shift_input(client, Some(staff), 9, 17))
        .await
        .unwrap();

    ctx.state.shifts.cancel(&ctx.admin(), shift.id).await.unwrap();
    let again = ctx.state.shifts.cancel(&ctx.admin(), shift.id).await.unwrap();
    ctx.settle().await;

    assert_eq!(again.status, ShiftStatus::Cancelled);
    let cancellations = ctx
        .store
        .notifications()
        .await
        .into_iter()
        .filter(|n| n.title == "Shift Cancelled")
        .count();
    assert_eq!(cancellations, 1);
    let log = ctx.store.audit_log().await;
    assert_eq!(actions(&log), vec![AuditAction::CREATE_SHIFT, AuditAction::CANCEL_SHIFT]);
}

#[tokio::test]
async fn created_shift_reads_back_unchanged() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;

    let created = ctx
        .state
        .shifts
        .create(&ctx.admin(), shift_input(client, Some(staff), 7, 15))
        .await
        .unwrap();
    let fetched = ctx.state.shifts.get(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.client_id, client);
    assert_eq!(fetched.staff_id, Some(staff));
    assert_eq!((fetched.start_time, fetched.end_time), (at(7), at(15)));
    assert_eq!(fetched.status, ShiftStatus::Assigned);
    assert_eq!(fetched.created_by, ctx.admin_id);
}

#[tokio::test]
async fn invalid_creates_are_rejected_before_persisting() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let shifts = &ctx.state.shifts;

    let err = shifts
        .create(&ctx.admin(), shift_input(client, None, 17, 9))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = shifts
        .create(&ctx.admin(), shift_input(client, None, 9, 9))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = shifts
        .create(&ctx.admin(), shift_input(Uuid::new_v4(), None, 9, 17))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = shifts
        .create(&ctx.admin(), shift_input(client, Some(Uuid::new_v4()), 9, 17))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    ctx.settle().await;
    assert!(ctx.store.shifts().await.is_empty());
    assert!(ctx.store.audit_log().await.is_empty());
}

#[tokio::test]
async fn concurrent_assignments_for_one_staff_member_let_exactly_one_win() {
    let ctx = TestContext::new();
    let admin = ctx.admin();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;
    let shifts = &ctx.state.shifts;

    let first = shifts
        .create(&admin, shift_input(client, None, 9, 17))
        .await
        .unwrap();
    let second = shifts
        .create(&admin, shift_input(client, None, 12, 20))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        shifts.assign(&admin, first.id, staff),
        shifts.assign(&admin, second.id, staff)
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(AppError::Conflict(_))))
    );

    let held: Vec<Shift> = shifts
        .staff_history(staff)
        .await
        .unwrap()
        .into_iter()
        .filter(|s| s.status == ShiftStatus::Assigned)
        .collect();
    assert_eq!(held.len(), 1);
}

#[tokio::test]
async fn reassignment_notifies_both_staff_members() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let first = ctx.store.add_staff().await;
    let second = ctx.store.add_staff().await;

    let shift = ctx
        .state
        .shifts
        .create(&ctx.admin(), shift_input(client, Some(first), 9, 17))
        .await
        .unwrap();
    ctx.state
        .shifts
        .assign(&ctx.admin(), shift.id, second)
        .await
        .unwrap();
    ctx.settle().await;

    let notes = ctx.store.notifications().await;
    let first_titles: Vec<_> = notifications_for(&notes, first)
        .iter()
        .map(|n| n.title.as_str())
        .collect();
    let second_titles: Vec<_> = notifications_for(&notes, second)
        .iter()
        .map(|n| n.title.as_str())
        .collect();
    assert_eq!(first_titles, vec!["New Shift Assigned", "Shift Unassigned"]);
    assert_eq!(second_titles, vec!["Shift Assigned"]);
}

#[tokio::test]
async fn terminal_shifts_refuse_assignment() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;
    let shifts = &ctx.state.shifts;

    let shift = shifts
        .create(&ctx.admin(), shift_input(client, None, 9, 17))
        .await
        .unwrap();
    shifts.cancel(&ctx.admin(), shift.id).await.unwrap();

    let err = shifts.assign(&ctx.admin(), shift.id, staff).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = shifts
        .assign(&ctx.admin(), Uuid::new_v4(), staff)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn terminal_shifts_refuse_edits() {
    let ctx = TestContext::new();
    let admin = ctx.admin();
    let client = ctx.store.add_client().await;
    let worked = ctx.store.add_staff().await;
    let other = ctx.store.add_staff().await;
    let shifts = &ctx.state.shifts;

    let cancelled = shifts
        .create(&admin, shift_input(client, Some(worked), 9, 17))
        .await
        .unwrap();
    let cancelled = shifts.cancel(&admin, cancelled.id).await.unwrap();

    let completed = shifts
        .create(&admin, shift_input(client, Some(worked), 18, 20))
        .await
        .unwrap();
    let completed = shifts.complete(&admin, completed.id).await.unwrap();
    ctx.settle().await;
    let notes_before = ctx.store.notifications().await.len();

    for shift in [&cancelled, &completed] {
        let err = shifts
            .edit(
                &admin,
                shift.id,
                UpdateShiftInput {
                    staff_id: Some(other),
                    start_time: Some(at(6)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");
        assert_eq!(&shifts.get(shift.id).await.unwrap(), shift);
    }

    ctx.settle().await;
    let notes = ctx.store.notifications().await;
    assert_eq!(notes.len(), notes_before);
    assert!(notifications_for(&notes, other).is_empty());
    assert!(
        !actions(&ctx.store.audit_log().await).contains(&AuditAction::UPDATE_SHIFT)
    );
}

#[tokio::test]
async fn completion_requires_an_assigned_shift() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;
    let shifts = &ctx.state.shifts;

    let pending = shifts
        .create(&ctx.admin(), shift_input(client, None, 9, 17))
        .await
        .unwrap();
    let err = shifts.complete(&ctx.admin(), pending.id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    shifts.assign(&ctx.admin(), pending.id, staff).await.unwrap();
    let done = shifts.complete(&ctx.admin(), pending.id).await.unwrap();
    assert_eq!(done.status, ShiftStatus::Completed);
    assert_eq!(done.staff_id, Some(staff));

    let err = shifts.cancel(&ctx.admin(), pending.id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    // A completed shift still occupies the staff member.
    let clash = shifts
        .create(&ctx.admin(), shift_input(client, Some(staff), 16, 18))
        .await
        .unwrap_err();
    assert!(matches!(clash, AppError::Conflict(_)));

    ctx.settle().await;
    let completions = ctx
        .store
        .audit_log()
        .await
        .into_iter()
        .filter(|e| e.action == AuditAction::COMPLETE_SHIFT)
        .count();
    assert_eq!(completions, 1);
    let titles: Vec<_> = ctx
        .store
        .notifications()
        .await
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(titles, vec!["Shift Assigned".to_string()]);
}

#[tokio::test]
async fn unassign_returns_shift_to_pending() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;
    let shifts = &ctx.state.shifts;

    let shift = shifts
        .create(&ctx.admin(), shift_input(client, Some(staff), 9, 17))
        .await
        .unwrap();
    let open = shifts.unassign(&ctx.admin(), shift.id).await.unwrap();
    assert_eq!(open.status, ShiftStatus::Pending);
    assert_eq!(open.staff_id, None);

    let err = shifts.unassign(&ctx.admin(), shift.id).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    ctx.settle().await;
    let notes = ctx.store.notifications().await;
    assert_eq!(notes.last().unwrap().title, "Shift Unassigned");
    let log = ctx.store.audit_log().await;
    assert_eq!(
        actions(&log),
        vec![AuditAction::CREATE_SHIFT, AuditAction::UNASSIGN_SHIFT]
    );
}

#[tokio::test]
async fn edit_rechecks_availability_when_the_window_moves() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;
    let shifts = &ctx.state.shifts;

    shifts
        .create(&ctx.admin(), shift_input(client, Some(staff), 9, 12))
        .await
        .unwrap();
    let afternoon = shifts
        .create(&ctx.admin(), shift_input(client, Some(staff), 13, 17))
        .await
        .unwrap();

    let err = shifts
        .edit(
            &ctx.admin(),
            afternoon.id,
            UpdateShiftInput {
                start_time: Some(at(11)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Shrinking within its own window never conflicts with itself.
    let edited = shifts
        .edit(
            &ctx.admin(),
            afternoon.id,
            UpdateShiftInput {
                start_time: Some(at(12)),
                end_time: Some(at(16)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!((edited.start_time, edited.end_time), (at(12), at(16)));

    let err = shifts
        .edit(
            &ctx.admin(),
            afternoon.id,
            UpdateShiftInput {
                end_time: Some(at(10)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    ctx.settle().await;
    let updates = ctx
        .store
        .notifications()
        .await
        .into_iter()
        .filter(|n| n.title == "Shift Updated")
        .count();
    assert_eq!(updates, 1);
}

#[tokio::test]
async fn edit_staffing_a_pending_shift_assigns_it() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;
    let replacement = ctx.store.add_staff().await;
    let shifts = &ctx.state.shifts;

    let shift = shifts
        .create(&ctx.admin(), shift_input(client, None, 9, 17))
        .await
        .unwrap();
    let staffed = shifts
        .edit(
            &ctx.admin(),
            shift.id,
            UpdateShiftInput {
                staff_id: Some(staff),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(staffed.status, ShiftStatus::Assigned);

    shifts
        .edit(
            &ctx.admin(),
            shift.id,
            UpdateShiftInput {
                staff_id: Some(replacement),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    ctx.settle().await;

    let notes = ctx.store.notifications().await;
    let replaced: Vec<_> = notifications_for(&notes, staff)
        .iter()
        .map(|n| n.title.as_str())
        .collect();
    assert_eq!(replaced, vec!["Shift Updated", "Shift Unassigned"]);
    assert_eq!(notifications_for(&notes, replacement).len(), 1);

    let err = shifts
        .edit(&ctx.admin(), shift.id, UpdateShiftInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn delete_cancels_then_removes() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;
    let shifts = &ctx.state.shifts;

    let shift = shifts
        .create(&ctx.admin(), shift_input(client, Some(staff), 9, 17))
        .await
        .unwrap();
    let removed = shifts.delete(&ctx.admin(), shift.id).await.unwrap();
    ctx.settle().await;

    assert_eq!(removed.status, ShiftStatus::Cancelled);
    assert!(matches!(
        shifts.get(shift.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    let notes = ctx.store.notifications().await;
    assert_eq!(notes.last().unwrap().title, "Shift Cancelled");
    let log = ctx.store.audit_log().await;
    assert_eq!(
        actions(&log),
        vec![
            AuditAction::CREATE_SHIFT,
            AuditAction::CANCEL_SHIFT,
            AuditAction::DELETE_SHIFT
        ]
    );

    let err = shifts.delete(&ctx.admin(), shift.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[derive(Clone)]
struct Offline;

impl NotificationStore for Offline {
    async fn insert_notification(&self, _: &NewNotification) -> StoreResult<Notification> {
        Err(StoreError::Unavailable("notification service down".to_string()))
    }

    async fn list_notifications(&self, _: Uuid, _: bool) -> StoreResult<Vec<Notification>> {
        Ok(vec![])
    }

    async fn mark_notification_read(&self, _: Uuid, _: Uuid) -> StoreResult<Option<Notification>> {
        Ok(None)
    }
}

impl AuditStore for Offline {
    async fn append_audit(&self, _: &NewAuditEntry) -> StoreResult<AuditLogEntry> {
        Err(StoreError::Unavailable("audit service down".to_string()))
    }

    async fn query_audit(&self, _: &AuditFilter) -> StoreResult<(i64, Vec<AuditLogEntry>)> {
        Ok((0, vec![]))
    }
}

#[tokio::test]
async fn side_effect_failures_never_fail_the_transition() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;

    let effects = Dispatcher::spawn(
        Notifier::new(Offline, ConnectionRegistry::new()),
        AuditRecorder::new(Offline),
    );
    let shifts = ShiftService::new(ctx.store.clone(), effects.clone());

    let shift = shifts
        .create(&ctx.admin(), shift_input(client, None, 9, 17))
        .await
        .unwrap();
    let assigned = shifts.assign(&ctx.admin(), shift.id, staff).await.unwrap();
    let cancelled = shifts.cancel(&ctx.admin(), shift.id).await.unwrap();
    effects.flush().await;

    assert_eq!(assigned.status, ShiftStatus::Assigned);
    assert_eq!(cancelled.status, ShiftStatus::Cancelled);
    assert_eq!(
        ctx.store.shifts().await.first().map(|s| s.status),
        Some(ShiftStatus::Cancelled)
    );
}

#[tokio::test]
async fn live_staff_receive_the_push() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let staff = ctx.store.add_staff().await;
    let mut rx = ctx.realtime.subscribe(staff).await;

    ctx.state
        .shifts
        .create(&ctx.admin(), shift_input(client, Some(staff), 9, 17))
        .await
        .unwrap();
    ctx.settle().await;

    let pushed = rx.recv().await.unwrap();
    assert_eq!(pushed.event, "newShift");
    assert_eq!(pushed.payload["shift"]["staffId"], staff.to_string());
}

#[tokio::test]
async fn no_staff_member_is_ever_double_booked() {
    let ctx = TestContext::new();
    let admin = ctx.admin();
    let shifts = &ctx.state.shifts;
    let client = ctx.store.add_client().await;
    let mut staff = Vec::new();
    for _ in 0..3 {
        staff.push(ctx.store.add_staff().await);
    }

    let mut created = Vec::new();
    for _ in 0..60 {
        let start: u32 = (0u32..20).fake();
        let length: u32 = (1u32..4).fake();
        let pick: usize = (0..staff.len()).fake();
        let input = shift_input(client, Some(staff[pick]), start, start + length);
        match shifts.create(&admin, input).await {
            Ok(shift) => created.push(shift.id),
            Err(AppError::Conflict(_)) => {
                let shift = shifts
                    .create(&admin, shift_input(client, None, start, start + length))
                    .await
                    .unwrap();
                created.push(shift.id);
            }
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    for _ in 0..120 {
        let target = created[(0..created.len()).fake::<usize>()];
        let who = staff[(0..staff.len()).fake::<usize>()];
        let result = match (0u8..5).fake::<u8>() {
            0 => shifts.assign(&admin, target, who).await.map(|_| ()),
            1 => shifts.cancel(&admin, target).await.map(|_| ()),
            2 => shifts.complete(&admin, target).await.map(|_| ()),
            3 => shifts.unassign(&admin, target).await.map(|_| ()),
            _ => {
                let start: u32 = (0u32..20).fake();
                shifts
                    .edit(
                        &admin,
                        target,
                        UpdateShiftInput {
                            start_time: Some(at(start)),
                            end_time: Some(at(start + 2)),
                            ..Default::default()
                        },
                    )
                    .await
                    .map(|_| ())
            }
        };
        if let Err(e) = result {
            assert!(
                matches!(e, AppError::Conflict(_) | AppError::BadRequest(_)),
                "unexpected error: {e:?}"
            );
        }
    }

    let all = ctx.store.shifts().await;
    let mut by_staff: HashMap<Uuid, Vec<&Shift>> = HashMap::new();
    for shift in &all {
        match shift.status {
            ShiftStatus::Pending => assert_eq!(shift.staff_id, None),
            ShiftStatus::Assigned => assert!(shift.staff_id.is_some()),
            _ => {}
        }
        if let (Some(staff_id), true) = (shift.staff_id, shift.status.occupies_staff()) {
            by_staff.entry(staff_id).or_default().push(shift);
        }
    }
    for held in by_staff.values() {
        for (i, a) in held.iter().enumerate() {
            for b in &held[i + 1..] {
                assert!(
                    !a.overlaps(b.start_time, b.end_time),
                    "double booking: {} and {}",
                    a.window(),
                    b.window()
                );
            }
        }
    }
}

#[tokio::test]
async fn templates_generate_pending_shifts_on_their_weekday() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;
    let templates = &ctx.state.templates;

    let night = templates
        .create(
            &ctx.admin(),
            ShiftTemplateInput {
                client_id: client,
                start_time: chrono::NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
                end_time: chrono::NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                day_of_week: DayOfWeek::Monday,
                recurrence: Recurrence::Weekly,
                status: TemplateStatus::Active,
            },
        )
        .await
        .unwrap();

    let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let shift = templates
        .generate(&ctx.admin(), night.id, monday)
        .await
        .unwrap();
    assert_eq!(shift.status, ShiftStatus::Pending);
    assert_eq!(shift.client_id, client);
    assert_eq!(shift.start_time, at(22));
    assert_eq!(shift.end_time.to_rfc3339(), "2025-03-11T06:00:00+00:00");

    let tuesday = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
    let err = templates
        .generate(&ctx.admin(), night.id, tuesday)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    templates.delete(&ctx.admin(), night.id).await.unwrap();
    let err = templates
        .generate(&ctx.admin(), night.id, monday)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    ctx.settle().await;
    let log = ctx.store.audit_log().await;
    assert_eq!(
        actions(&log),
        vec![
            AuditAction::CREATE_TEMPLATE,
            AuditAction::CREATE_SHIFT,
            AuditAction::DELETE_TEMPLATE
        ]
    );
}

#[tokio::test]
async fn inactive_templates_do_not_generate() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;

    let template = ctx
        .state
        .templates
        .create(
            &ctx.admin(),
            ShiftTemplateInput {
                client_id: client,
                start_time: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: chrono::NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                day_of_week: DayOfWeek::Monday,
                recurrence: Recurrence::Weekly,
                status: TemplateStatus::Inactive,
            },
        )
        .await
        .unwrap();

    let err = ctx
        .state
        .templates
        .generate(
            &ctx.admin(),
            template.id,
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(ctx.store.shifts().await.is_empty());
}

#[tokio::test]
async fn recurrence_does_not_restrict_generation() {
    let ctx = TestContext::new();
    let client = ctx.store.add_client().await;

    let template = ctx
        .state
        .templates
        .create(
            &ctx.admin(),
            ShiftTemplateInput {
                client_id: client,
                start_time: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: chrono::NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                day_of_week: DayOfWeek::Monday,
                recurrence: Recurrence::Biweekly,
                status: TemplateStatus::Active,
            },
        )
        .await
        .unwrap();

    for day in [10, 17, 24] {
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let shift = ctx
            .state
            .templates
            .generate(&ctx.admin(), template.id, date)
            .await
            .unwrap();
        assert_eq!(shift.start_time.date_naive(), date);
    }
    assert_eq!(ctx.store.shifts().await.len(), 3);
}
