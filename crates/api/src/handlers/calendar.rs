use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use kickoff_core::availability::CalendarQuery;
use kickoff_core::models::calendar::{BlockSlotRequest, CalendarEntry, CalendarSlot};
use std::sync::Arc;

use crate::{
    middleware::{auth::AuthenticatedCaller, error_handling::AppError},
    services, ApiState,
};

#[axum::debug_handler]
pub async fn get_calendar(
    State(state): State<Arc<ApiState>>,
    Path(field_id): Path<i64>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Vec<CalendarEntry>>, AppError> {
    let entries = services::calendar::get_calendar(&state, field_id, query).await?;
    Ok(Json(entries))
}

#[axum::debug_handler]
pub async fn block_slot(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(field_id): Path<i64>,
    Json(payload): Json<BlockSlotRequest>,
) -> Result<(StatusCode, Json<CalendarSlot>), AppError> {
    let slot = services::calendar::block_slot(&state, &caller, field_id, payload).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

#[axum::debug_handler]
pub async fn unblock_slot(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(calendar_id): Path<i64>,
) -> Result<Json<CalendarSlot>, AppError> {
    let slot = services::calendar::unblock_slot(&state, &caller, calendar_id).await?;
    Ok(Json(slot))
}
