//! Shift lifecycle: `pending -> assigned -> completed | cancelled`.
//!
//! Every transition that can occupy a staff member runs its availability
//! check and its write inside one store transaction. Notifications and audit
//! entries are handed to the [`Dispatcher`] only after that transaction has
//! committed, so a failed transition never emits either.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::{
    AuditAction, AvailabilityQuery, AvailabilityReport, CreateShiftInput, NewShift, Shift,
    ShiftEvent, ShiftFilter, ShiftStatus, ShiftUpdate, UpdateShiftInput,
};
use crate::database::store::{ShiftStore, ShiftTransaction};
use crate::error::AppError;
use crate::services::audit::AuditRecord;
use crate::services::availability;
use crate::services::dispatcher::Dispatcher;
use crate::services::notifier::Notice;

/// The administrator performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub correlation_id: Option<String>,
}

impl Actor {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            correlation_id: None,
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: Option<String>) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    pub(crate) fn audit(&self, action: &'static str, details: String) -> AuditRecord {
        AuditRecord::shift(self.id, action, details).with_correlation(self.correlation_id.as_deref())
    }
}

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::BadRequest(
            "end_time must be after start_time".to_string(),
        ));
    }
    Ok(())
}

/// Checks `staff_id` exists and is free for `[start, end)`, holding the staff
/// lock until the transaction ends.
async fn ensure_available<T: ShiftTransaction>(
    tx: &mut T,
    staff_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_shift_id: Option<Uuid>,
) -> Result<(), AppError> {
    if !tx.staff_exists(staff_id).await? {
        return Err(AppError::not_found("Staff", staff_id));
    }
    tx.lock_staff(staff_id).await?;

    let clashes = availability::conflicts(tx, staff_id, start, end, exclude_shift_id).await?;
    if let Some(clash) = clashes.first() {
        return Err(AppError::Conflict(format!(
            "Staff {} is already booked for shift {} ({})",
            staff_id,
            clash.id,
            clash.window()
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ShiftService<S> {
    store: S,
    effects: Dispatcher,
}

impl<S: ShiftStore> ShiftService<S> {
    pub fn new(store: S, effects: Dispatcher) -> Self {
        Self { store, effects }
    }

    pub fn effects(&self) -> &Dispatcher {
        &self.effects
    }

    pub async fn get(&self, id: Uuid) -> Result<Shift, AppError> {
        self.store
            .get_shift(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))
    }

    pub async fn list(&self, filter: &ShiftFilter) -> Result<Vec<Shift>, AppError> {
        Ok(self.store.list_shifts(filter).await?)
    }

    pub async fn staff_history(&self, staff_id: Uuid) -> Result<Vec<Shift>, AppError> {
        Ok(self.store.staff_history(staff_id).await?)
    }

    /// Read-only availability lookup; the transaction is rolled back.
    pub async fn availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityReport, AppError> {
        validate_window(query.start_time, query.end_time)?;

        let mut tx = self.store.begin().await?;
        if !tx.staff_exists(query.staff_id).await? {
            return Err(AppError::not_found("Staff", query.staff_id));
        }
        let conflicts = availability::conflicts(
            &mut tx,
            query.staff_id,
            query.start_time,
            query.end_time,
            query.exclude_shift_id,
        )
        .await?;

        Ok(AvailabilityReport {
            staff_id: query.staff_id,
            available: conflicts.is_empty(),
            conflicts,
        })
    }

    pub async fn create(&self, actor: &Actor, input: CreateShiftInput) -> Result<Shift, AppError> {
        validate_window(input.start_time, input.end_time)?;

        let mut tx = self.store.begin().await?;
        if !tx.client_exists(input.client_id).await? {
            return Err(AppError::not_found("Client", input.client_id));
        }
        if let Some(staff_id) = input.staff_id {
            ensure_available(&mut tx, staff_id, input.start_time, input.end_time, None).await?;
        }

        let shift = tx
            .insert_shift(&NewShift {
                client_id: input.client_id,
                staff_id: input.staff_id,
                start_time: input.start_time,
                end_time: input.end_time,
                status: if input.staff_id.is_some() {
                    ShiftStatus::Assigned
                } else {
                    ShiftStatus::Pending
                },
                created_by: actor.id,
            })
            .await?;
        tx.commit().await?;

        log::info!("Shift {} created by {} ({})", shift.id, actor.id, shift.status);

        self.effects.audit(actor.audit(
            AuditAction::CREATE_SHIFT,
            format!("Created shift {} for client {}", shift.id, shift.client_id),
        ));
        if let Some(staff_id) = shift.staff_id {
            self.effects
                .notify(Notice::shift(ShiftEvent::CREATED, staff_id, &shift));
        }

        Ok(shift)
    }

    pub async fn assign(&self, actor: &Actor, id: Uuid, staff_id: Uuid) -> Result<Shift, AppError> {
        let mut tx = self.store.begin().await?;
        let shift = tx
            .lock_shift(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))?;
        if shift.status.is_terminal() {
            return Err(AppError::BadRequest(format!(
                "Cannot assign staff to a {} shift",
                shift.status
            )));
        }

        ensure_available(&mut tx, staff_id, shift.start_time, shift.end_time, Some(id)).await?;

        let updated = tx
            .update_shift(
                id,
                &ShiftUpdate {
                    staff_id: Some(staff_id),
                    status: ShiftStatus::Assigned,
                    ..shift.to_update()
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))?;
        tx.commit().await?;

        log::info!("Shift {} assigned to {} by {}", id, staff_id, actor.id);

        self.effects.audit(actor.audit(
            AuditAction::ASSIGN_SHIFT,
            format!("Assigned staff {} to shift {}", staff_id, id),
        ));
        self.effects
            .notify(Notice::shift(ShiftEvent::ASSIGNED, staff_id, &updated));
        if let Some(previous) = shift.staff_id.filter(|p| *p != staff_id) {
            self.effects
                .notify(Notice::shift(ShiftEvent::UNASSIGNED, previous, &updated));
        }

        Ok(updated)
    }

    pub async fn unassign(&self, actor: &Actor, id: Uuid) -> Result<Shift, AppError> {
        let mut tx = self.store.begin().await?;
        let shift = tx
            .lock_shift(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))?;
        let Some(previous) = shift.staff_id.filter(|_| shift.status == ShiftStatus::Assigned) else {
            return Err(AppError::BadRequest(format!(
                "Only assigned shifts can be unassigned; shift {} is {}",
                id, shift.status
            )));
        };

        let updated = tx
            .update_shift(
                id,
                &ShiftUpdate {
                    staff_id: None,
                    status: ShiftStatus::Pending,
                    ..shift.to_update()
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))?;
        tx.commit().await?;

        log::info!("Shift {} unassigned from {} by {}", id, previous, actor.id);

        self.effects.audit(actor.audit(
            AuditAction::UNASSIGN_SHIFT,
            format!("Removed staff {} from shift {}", previous, id),
        ));
        self.effects
            .notify(Notice::shift(ShiftEvent::UNASSIGNED, previous, &updated));

        Ok(updated)
    }

    pub async fn edit(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: UpdateShiftInput,
    ) -> Result<Shift, AppError> {
        if patch.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let mut tx = self.store.begin().await?;
        let shift = tx
            .lock_shift(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))?;
        if shift.status.is_terminal() {
            return Err(AppError::BadRequest(format!(
                "Shift {} is {} and can no longer be edited",
                id, shift.status
            )));
        }

        let mut next = shift.to_update();
        if let Some(client_id) = patch.client_id {
            next.client_id = client_id;
        }
        if let Some(start) = patch.start_time {
            next.start_time = start;
        }
        if let Some(end) = patch.end_time {
            next.end_time = end;
        }
        if let Some(staff_id) = patch.staff_id {
            next.staff_id = Some(staff_id);
            if next.status == ShiftStatus::Pending {
                next.status = ShiftStatus::Assigned;
            }
        }
        validate_window(next.start_time, next.end_time)?;

        if next.client_id != shift.client_id && !tx.client_exists(next.client_id).await? {
            return Err(AppError::not_found("Client", next.client_id));
        }

        let window_changed =
            next.start_time != shift.start_time || next.end_time != shift.end_time;
        let staff_changed = next.staff_id != shift.staff_id;
        // A staffed, non-terminal shift is always `assigned` here.
        if let Some(staff_id) = next.staff_id.filter(|_| window_changed || staff_changed) {
            ensure_available(&mut tx, staff_id, next.start_time, next.end_time, Some(id)).await?;
        }

        let updated = tx
            .update_shift(id, &next)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))?;
        tx.commit().await?;

        log::info!("Shift {} updated by {}", id, actor.id);

        self.effects.audit(actor.audit(
            AuditAction::UPDATE_SHIFT,
            format!("Updated shift {} ({})", id, updated.window()),
        ));
        if let Some(staff_id) = updated.staff_id {
            self.effects
                .notify(Notice::shift(ShiftEvent::UPDATED, staff_id, &updated));
        }
        if let Some(replaced) = shift.staff_id.filter(|p| Some(*p) != updated.staff_id) {
            self.effects
                .notify(Notice::shift(ShiftEvent::UNASSIGNED, replaced, &updated));
        }

        Ok(updated)
    }

    /// Cancelling an already-cancelled shift returns it unchanged and emits
    /// nothing.
    pub async fn cancel(&self, actor: &Actor, id: Uuid) -> Result<Shift, AppError> {
        let mut tx = self.store.begin().await?;
        let shift = tx
            .lock_shift(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))?;
        match shift.status {
            ShiftStatus::Cancelled => return Ok(shift),
            ShiftStatus::Completed => {
                return Err(AppError::BadRequest(format!(
                    "Shift {} is completed and cannot be cancelled",
                    id
                )));
            }
            ShiftStatus::Pending | ShiftStatus::Assigned => {}
        }

        let updated = tx
            .update_shift(
                id,
                &ShiftUpdate {
                    status: ShiftStatus::Cancelled,
                    ..shift.to_update()
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))?;
        tx.commit().await?;

        log::info!("Shift {} cancelled by {}", id, actor.id);

        self.effects.audit(actor.audit(
            AuditAction::CANCEL_SHIFT,
            format!("Cancelled shift {}", id),
        ));
        if let Some(staff_id) = updated.staff_id {
            self.effects
                .notify(Notice::shift(ShiftEvent::CANCELLED, staff_id, &updated));
        }

        Ok(updated)
    }

    /// Cancels the shift (notifying its staff) and then removes the record.
    /// Completed shifts skip the cancel step.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<Shift, AppError> {
        let shift = self.get(id).await?;
        let removed = if shift.status == ShiftStatus::Completed {
            shift
        } else {
            self.cancel(actor, id).await?
        };

        let mut tx = self.store.begin().await?;
        if !tx.delete_shift(id).await? {
            return Err(AppError::not_found("Shift", id));
        }
        tx.commit().await?;

        log::info!("Shift {} deleted by {}", id, actor.id);

        self.effects.audit(actor.audit(
            AuditAction::DELETE_SHIFT,
            format!("Deleted shift {}", id),
        ));

        Ok(removed)
    }

    pub async fn complete(&self, actor: &Actor, id: Uuid) -> Result<Shift, AppError> {
        let mut tx = self.store.begin().await?;
        let shift = tx
            .lock_shift(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))?;
        if shift.status != ShiftStatus::Assigned {
            return Err(AppError::BadRequest(format!(
                "Only assigned shifts can be completed; shift {} is {}",
                id, shift.status
            )));
        }

        let updated = tx
            .update_shift(
                id,
                &ShiftUpdate {
                    status: ShiftStatus::Completed,
                    ..shift.to_update()
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Shift", id))?;
        tx.commit().await?;

        log::info!("Shift {} completed, recorded by {}", id, actor.id);

        self.effects.audit(actor.audit(
            AuditAction::COMPLETE_SHIFT,
            format!("Completed shift {}", id),
        ));

        Ok(updated)
    }
}
