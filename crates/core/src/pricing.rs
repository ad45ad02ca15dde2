//! Hourly price resolution against a field's rule set.
//!
//! A rule applies to a requested slot when it is active, its weekday set is
//! empty or contains the slot's weekday, and its window fully contains the
//! slot. Partial overlap never applies a rule. Among applicable rules the
//! highest priority wins and equal priorities go to the lowest rule id. With
//! no applicable rule the field's default hourly price is used.

use std::cmp::Ordering;

use crate::errors::KickoffResult;
use crate::interval::Interval;
use crate::models::field::FieldProfile;
use crate::models::pricing::{DayOfWeek, NewPricingRule, PriceQuote, PricingRule, PricingRuleInput};

pub fn select_rule<'a>(rules: &'a [PricingRule], interval: &Interval) -> Option<&'a PricingRule> {
    let day = DayOfWeek::from(interval.weekday());
    rules
        .iter()
        .filter(|rule| rule.is_active && rule.applies_on(day) && rule.range.contains(&interval.range))
        .max_by(|a, b| rank(a, b))
}

fn rank(a: &PricingRule, b: &PricingRule) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.pricing_rule_id.cmp(&a.pricing_rule_id))
}

pub fn resolve_price(field: &FieldProfile, rules: &[PricingRule], interval: &Interval) -> PriceQuote {
    let rule = select_rule(rules, interval);
    let hourly_rate = rule.map_or(field.default_price_per_hour, |rule| rule.price_per_hour);
    let hours = interval.range.duration_hours();

    PriceQuote {
        field_id: field.field_id,
        date: interval.date,
        range: interval.range,
        hourly_rate,
        hours,
        total_price: round_cents(hourly_rate * hours),
        pricing_rule_id: rule.map(|rule| rule.pricing_rule_id),
        rule_name: rule.map(|rule| rule.name.clone()),
    }
}

/// Validates a full replacement rule set, reporting the first bad rule.
pub fn validate_rules(inputs: Vec<PricingRuleInput>) -> KickoffResult<Vec<NewPricingRule>> {
    inputs.into_iter().map(NewPricingRule::try_from).collect()
}

/// Display order for rule listings: strongest rule first.
pub fn sort_rules(rules: &mut [PricingRule]) {
    rules.sort_by(|a, b| rank(b, a));
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
