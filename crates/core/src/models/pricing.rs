use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::text_enum;
use crate::errors::{KickoffError, KickoffResult};
use crate::interval::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

text_enum!(DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
});

impl From<Weekday> for DayOfWeek {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRule {
    pub pricing_rule_id: i64,
    pub field_id: i64,
    pub name: String,
    /// Empty means the rule applies on every day.
    #[serde(default)]
    pub day_of_week: Vec<DayOfWeek>,
    #[serde(flatten)]
    pub range: TimeRange,
    pub price_per_hour: f64,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingRule {
    pub fn applies_on(&self, day: DayOfWeek) -> bool {
        self.day_of_week.is_empty() || self.day_of_week.contains(&day)
    }
}

/// One rule of a `PUT /fields/{id}/pricing` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRuleInput {
    pub name: String,
    #[serde(default)]
    pub day_of_week: Option<Vec<DayOfWeek>>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price_per_hour: f64,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A validated rule ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPricingRule {
    pub name: String,
    pub day_of_week: Vec<DayOfWeek>,
    pub range: TimeRange,
    pub price_per_hour: f64,
    pub priority: i32,
    pub is_active: bool,
}

impl TryFrom<PricingRuleInput> for NewPricingRule {
    type Error = KickoffError;

    fn try_from(input: PricingRuleInput) -> KickoffResult<Self> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(KickoffError::Validation(
                "Pricing rule name must not be empty".to_string(),
            ));
        }
        if !input.price_per_hour.is_finite() || input.price_per_hour < 0.0 {
            return Err(KickoffError::Validation(format!(
                "Pricing rule '{}' must have a non-negative price",
                name
            )));
        }
        let range = TimeRange::from_times(input.start_time, input.end_time).map_err(|e| {
            KickoffError::Validation(format!("Pricing rule '{}': {}", name, e))
        })?;

        let mut day_of_week = input.day_of_week.unwrap_or_default();
        day_of_week.sort_by_key(|day| *day as u8);
        day_of_week.dedup();

        Ok(Self {
            name,
            day_of_week,
            range,
            price_per_hour: input.price_per_hour,
            priority: input.priority,
            is_active: input.is_active,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Price of one requested slot and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub field_id: i64,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub range: TimeRange,
    pub hourly_rate: f64,
    pub hours: f64,
    pub total_price: f64,
    /// `None` when the field's default price applied.
    pub pricing_rule_id: Option<i64>,
    pub rule_name: Option<String>,
}
