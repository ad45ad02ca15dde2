use axum::{
    extract::{Path, State},
    Json,
};
use kickoff_core::models::pricing::{PricingRule, PricingRuleInput};
use std::sync::Arc;

use crate::{
    middleware::{auth::AuthenticatedCaller, error_handling::AppError},
    services, ApiState,
};

#[axum::debug_handler]
pub async fn list_rules(
    State(state): State<Arc<ApiState>>,
    Path(field_id): Path<i64>,
) -> Result<Json<Vec<PricingRule>>, AppError> {
    Ok(Json(services::pricing::list_rules(&state, field_id).await?))
}

#[axum::debug_handler]
pub async fn replace_rules(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(field_id): Path<i64>,
    Json(payload): Json<Vec<PricingRuleInput>>,
) -> Result<Json<Vec<PricingRule>>, AppError> {
    let rules = services::pricing::replace_rules(&state, &caller, field_id, payload).await?;
    Ok(Json(rules))
}
