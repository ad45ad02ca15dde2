use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{KickoffError, KickoffResult};

pub const DEFAULT_FREE_CANCELLATION_HOURS: i32 = 24;
pub const DEFAULT_LATE_CANCELLATION_PENALTY_PERCENT: f64 = 50.0;
pub const DEFAULT_NO_SHOW_PENALTY_PERCENT: f64 = 100.0;
pub const DEFAULT_REFUND_PROCESSING_DAYS: i32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPolicy {
    pub policy_id: i64,
    pub field_id: i64,
    pub free_cancellation_hours: i32,
    pub late_cancellation_penalty_percent: f64,
    pub no_show_penalty_percent: f64,
    pub refund_processing_days: i32,
    pub policy_description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner-editable part of a policy. `Default` yields the terms a field gets
/// before its owner sets any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationPolicyInput {
    pub free_cancellation_hours: i32,
    pub late_cancellation_penalty_percent: f64,
    pub no_show_penalty_percent: f64,
    pub refund_processing_days: i32,
    #[serde(default)]
    pub policy_description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for CancellationPolicyInput {
    fn default() -> Self {
        Self {
            free_cancellation_hours: DEFAULT_FREE_CANCELLATION_HOURS,
            late_cancellation_penalty_percent: DEFAULT_LATE_CANCELLATION_PENALTY_PERCENT,
            no_show_penalty_percent: DEFAULT_NO_SHOW_PENALTY_PERCENT,
            refund_processing_days: DEFAULT_REFUND_PROCESSING_DAYS,
            policy_description: None,
            is_active: true,
        }
    }
}

impl CancellationPolicyInput {
    pub fn validate(&self) -> KickoffResult<()> {
        if self.free_cancellation_hours < 0 {
            return Err(KickoffError::Validation(
                "Free cancellation hours must not be negative".to_string(),
            ));
        }
        if self.refund_processing_days < 0 {
            return Err(KickoffError::Validation(
                "Refund processing days must not be negative".to_string(),
            ));
        }
        for (label, percent) in [
            ("Late cancellation penalty", self.late_cancellation_penalty_percent),
            ("No-show penalty", self.no_show_penalty_percent),
        ] {
            if !(0.0..=100.0).contains(&percent) {
                return Err(KickoffError::Validation(format!(
                    "{} must be between 0 and 100 percent",
                    label
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancellationKind {
    Free,
    Late,
    NoShow,
}

/// What the billing side should do about a cancellation. Percentages are of
/// the booking price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationOutcome {
    pub kind: CancellationKind,
    pub refund_percent: f64,
    pub penalty_percent: f64,
    pub refund_processing_days: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationQuoteQuery {
    pub at: Option<NaiveDateTime>,
}
