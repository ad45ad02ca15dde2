use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use kickoff_core::models::{
    cancellation::{CancellationPolicy, CancellationPolicyInput},
    field::{
        CreateFieldRequest, FieldProfile, FieldSearchQuery, UpdateFieldRequest,
        UpdateFieldStatusRequest,
    },
    pricing::{PriceQuote, QuoteQuery},
    MessageResponse,
};
use std::sync::Arc;

use crate::{
    middleware::{auth::AuthenticatedCaller, error_handling::AppError},
    services, ApiState,
};

#[axum::debug_handler]
pub async fn create_field(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(payload): Json<CreateFieldRequest>,
) -> Result<(StatusCode, Json<FieldProfile>), AppError> {
    let field = services::fields::create_field(&state, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(field)))
}

#[axum::debug_handler]
pub async fn get_field(
    State(state): State<Arc<ApiState>>,
    Path(field_id): Path<i64>,
) -> Result<Json<FieldProfile>, AppError> {
    Ok(Json(services::fields::get_field(&state, field_id).await?))
}

#[axum::debug_handler]
pub async fn list_my_fields(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<Json<Vec<FieldProfile>>, AppError> {
    Ok(Json(services::fields::list_my_fields(&state, &caller).await?))
}

#[axum::debug_handler]
pub async fn update_field(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(field_id): Path<i64>,
    Json(payload): Json<UpdateFieldRequest>,
) -> Result<Json<FieldProfile>, AppError> {
    let field = services::fields::update_field(&state, &caller, field_id, payload).await?;
    Ok(Json(field))
}

#[axum::debug_handler]
pub async fn delete_field(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(field_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(
        services::fields::delete_field(&state, &caller, field_id).await?,
    ))
}

#[axum::debug_handler]
pub async fn search_fields(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<FieldSearchQuery>,
) -> Result<Json<Vec<FieldProfile>>, AppError> {
    Ok(Json(services::fields::search_fields(&state, query).await?))
}

#[axum::debug_handler]
pub async fn update_field_status(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(field_id): Path<i64>,
    Json(payload): Json<UpdateFieldStatusRequest>,
) -> Result<Json<FieldProfile>, AppError> {
    let field = services::fields::update_field_status(&state, &caller, field_id, payload).await?;
    Ok(Json(field))
}

#[axum::debug_handler]
pub async fn quote(
    State(state): State<Arc<ApiState>>,
    Path(field_id): Path<i64>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<PriceQuote>, AppError> {
    Ok(Json(services::pricing::quote(&state, field_id, query).await?))
}

#[axum::debug_handler]
pub async fn get_cancellation_policy(
    State(state): State<Arc<ApiState>>,
    Path(field_id): Path<i64>,
) -> Result<Json<CancellationPolicy>, AppError> {
    Ok(Json(
        services::cancellation::get_policy(&state, field_id).await?,
    ))
}

#[axum::debug_handler]
pub async fn update_cancellation_policy(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(field_id): Path<i64>,
    Json(payload): Json<CancellationPolicyInput>,
) -> Result<Json<CancellationPolicy>, AppError> {
    let policy =
        services::cancellation::update_policy(&state, &caller, field_id, payload).await?;
    Ok(Json(policy))
}
