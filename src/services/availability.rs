//! Staff availability checks.
//!
//! Both functions read through an open [`ShiftTransaction`] so the answer
//! holds for the write that follows in the same transaction.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::Shift;
use crate::database::store::{ShiftTransaction, StoreResult};

/// Shifts that would collide with `staff_id` working `[start, end)`.
pub async fn conflicts<T: ShiftTransaction>(
    tx: &mut T,
    staff_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_shift_id: Option<Uuid>,
) -> StoreResult<Vec<Shift>> {
    let held = tx
        .find_by_staff_and_window(staff_id, start, end, exclude_shift_id)
        .await?;

    // Half-open windows: a shift ending at `start` is not a clash.
    let clashes: Vec<Shift> = held
        .into_iter()
        .filter(|s| s.status.occupies_staff() && s.overlaps(start, end))
        .collect();

    log::debug!(
        "Availability for staff {} in {} - {}: {} conflicting shift(s)",
        staff_id,
        start,
        end,
        clashes.len()
    );
    Ok(clashes)
}

/// Yes/no form of [`conflicts`].
pub async fn is_available<T: ShiftTransaction>(
    tx: &mut T,
    staff_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_shift_id: Option<Uuid>,
) -> StoreResult<bool> {
    Ok(conflicts(tx, staff_id, start, end, exclude_shift_id)
        .await?
        .is_empty())
}
