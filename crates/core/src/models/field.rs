use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::text_enum;
use crate::errors::{KickoffError, KickoffResult};

/// Moderation state of a field. Only `Verified` fields take bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldStatus {
    Pending,
    Verified,
    Rejected,
    PendingRevision,
}

text_enum!(FieldStatus {
    Pending,
    Verified,
    Rejected,
    PendingRevision,
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldProfile {
    pub field_id: i64,
    pub owner_id: i64,
    pub field_name: String,
    pub description: Option<String>,
    pub location: String,
    pub default_price_per_hour: f64,
    pub capacity: Option<i32>,
    pub status: FieldStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FieldProfile {
    pub fn is_bookable(&self) -> bool {
        self.status == FieldStatus::Verified
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFieldRequest {
    pub field_name: String,
    pub description: Option<String>,
    pub location: String,
    pub default_price_per_hour: f64,
    pub capacity: Option<i32>,
}

impl CreateFieldRequest {
    pub fn validate(&self) -> KickoffResult<()> {
        if self.field_name.trim().is_empty() {
            return Err(KickoffError::Validation(
                "Field name must not be empty".to_string(),
            ));
        }
        if self.location.trim().is_empty() {
            return Err(KickoffError::Validation(
                "Location must not be empty".to_string(),
            ));
        }
        if !self.default_price_per_hour.is_finite() || self.default_price_per_hour < 0.0 {
            return Err(KickoffError::Validation(
                "Default price per hour must be a non-negative number".to_string(),
            ));
        }
        if matches!(self.capacity, Some(capacity) if capacity <= 0) {
            return Err(KickoffError::Validation(
                "Capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldStatusRequest {
    pub status: FieldStatus,
    pub rejection_reason: Option<String>,
}

/// Partial update of a field's profile. Absent members keep their current
/// value. Moderation status is not touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldRequest {
    pub field_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub default_price_per_hour: Option<f64>,
    pub capacity: Option<i32>,
}

impl UpdateFieldRequest {
    pub fn validate(&self) -> KickoffResult<()> {
        if matches!(&self.field_name, Some(name) if name.trim().is_empty()) {
            return Err(KickoffError::Validation(
                "Field name must not be empty".to_string(),
            ));
        }
        if matches!(&self.location, Some(location) if location.trim().is_empty()) {
            return Err(KickoffError::Validation(
                "Location must not be empty".to_string(),
            ));
        }
        if matches!(self.default_price_per_hour, Some(price) if !price.is_finite() || price < 0.0) {
            return Err(KickoffError::Validation(
                "Default price per hour must be a non-negative number".to_string(),
            ));
        }
        if matches!(self.capacity, Some(capacity) if capacity <= 0) {
            return Err(KickoffError::Validation(
                "Capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies the present members to `field`.
    pub fn apply_to(self, field: &mut FieldProfile) {
        if let Some(name) = self.field_name {
            field.field_name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            field.description = Some(description);
        }
        if let Some(location) = self.location {
            field.location = location.trim().to_string();
        }
        if let Some(price) = self.default_price_per_hour {
            field.default_price_per_hour = price;
        }
        if let Some(capacity) = self.capacity {
            field.capacity = Some(capacity);
        }
    }
}

pub const DEFAULT_SEARCH_LIMIT: i64 = 20;
pub const MAX_SEARCH_LIMIT: i64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSearchQuery {
    pub q: Option<String>,
    pub location: Option<String>,
    pub limit: Option<i64>,
}

/// A validated search over verified fields. Blank terms match everything.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSearch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub limit: i64,
}

impl TryFrom<FieldSearchQuery> for FieldSearch {
    type Error = KickoffError;

    fn try_from(query: FieldSearchQuery) -> KickoffResult<Self> {
        let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(KickoffError::Validation(format!(
                "Limit must be between 1 and {}",
                MAX_SEARCH_LIMIT
            )));
        }
        let term = |value: Option<String>| {
            value
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Ok(Self {
            name: term(query.q),
            location: term(query.location),
            limit,
        })
    }
}

impl FieldSearch {
    /// Verified fields whose name and location contain the terms, ignoring
    /// case.
    pub fn matches(&self, field: &FieldProfile) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| {
            needle
                .as_ref()
                .is_none_or(|needle| haystack.to_lowercase().contains(&needle.to_lowercase()))
        };

        field.status == FieldStatus::Verified
            && contains(&field.field_name, &self.name)
            && contains(&field.location, &self.location)
    }
}
