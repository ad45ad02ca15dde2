use chrono::{Duration, NaiveDateTime};

use crate::models::cancellation::{CancellationKind, CancellationOutcome, CancellationPolicy};

/// Refund and penalty for cancelling a slot starting at `slot_start` at the
/// instant `cancelled_at`. Both are wall-clock times local to the field.
///
/// Cancelling at or after the slot start counts as a no-show. Before that, a
/// lead time of at least the free window refunds everything and anything
/// shorter pays the late penalty. An inactive policy always refunds in full.
pub fn evaluate_cancellation(
    policy: &CancellationPolicy,
    slot_start: NaiveDateTime,
    cancelled_at: NaiveDateTime,
) -> CancellationOutcome {
    let lead = slot_start - cancelled_at;

    let (kind, penalty) = if !policy.is_active {
        (CancellationKind::Free, 0.0)
    } else if lead <= Duration::zero() {
        (CancellationKind::NoShow, policy.no_show_penalty_percent)
    } else if lead >= Duration::hours(i64::from(policy.free_cancellation_hours)) {
        (CancellationKind::Free, 0.0)
    } else {
        (CancellationKind::Late, policy.late_cancellation_penalty_percent)
    };

    let penalty_percent = penalty.clamp(0.0, 100.0);
    CancellationOutcome {
        kind,
        refund_percent: 100.0 - penalty_percent,
        penalty_percent,
        refund_processing_days: policy.refund_processing_days,
    }
}
