use kickoff_core::errors::KickoffResult;
use kickoff_core::interval::Interval;
use kickoff_core::models::{
    identity::Caller,
    pricing::{PriceQuote, PricingRule, PricingRuleInput, QuoteQuery},
};
use kickoff_core::pricing::{resolve_price, validate_rules};

use super::fields::{get_field, get_owned_field};
use crate::ApiState;

pub async fn list_rules(state: &ApiState, field_id: i64) -> KickoffResult<Vec<PricingRule>> {
    get_field(state, field_id).await?;
    state.store.list_pricing_rules(field_id).await
}

pub async fn replace_rules(
    state: &ApiState,
    caller: &Caller,
    field_id: i64,
    inputs: Vec<PricingRuleInput>,
) -> KickoffResult<Vec<PricingRule>> {
    get_owned_field(state, caller, field_id).await?;
    let rules = validate_rules(inputs)?;

    state.store.replace_pricing_rules(field_id, rules).await
}

pub async fn quote(state: &ApiState, field_id: i64, query: QuoteQuery) -> KickoffResult<PriceQuote> {
    let field = get_field(state, field_id).await?;
    let interval = Interval::new(query.date, query.start_time, query.end_time)?;
    let rules = state.store.list_pricing_rules(field_id).await?;

    Ok(resolve_price(&field, &rules, &interval))
}
