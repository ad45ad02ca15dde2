use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use kickoff_core::models::{
    booking::{BookingListQuery, BookingRequest, CancelBookingResponse, CreateBookingRequest},
    cancellation::{CancellationOutcome, CancellationQuoteQuery},
};
use std::sync::Arc;

use crate::{
    middleware::{auth::AuthenticatedCaller, error_handling::AppError},
    services, ApiState,
};

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingRequest>), AppError> {
    let booking = services::bookings::create_booking(&state, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingRequest>, AppError> {
    let booking = services::bookings::get_booking_for(&state, &caller, booking_id).await?;
    Ok(Json(booking))
}

#[axum::debug_handler]
pub async fn list_field_bookings(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(field_id): Path<i64>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingRequest>>, AppError> {
    let bookings =
        services::bookings::list_for_field(&state, &caller, field_id, query.status).await?;
    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn list_team_bookings(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(team_id): Path<i64>,
) -> Result<Json<Vec<BookingRequest>>, AppError> {
    let bookings = services::bookings::list_for_team(&state, &caller, team_id).await?;
    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn approve_booking(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingRequest>, AppError> {
    Ok(Json(
        services::bookings::approve(&state, &caller, booking_id).await?,
    ))
}

#[axum::debug_handler]
pub async fn reject_booking(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingRequest>, AppError> {
    Ok(Json(
        services::bookings::reject(&state, &caller, booking_id).await?,
    ))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(booking_id): Path<i64>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    Ok(Json(
        services::bookings::cancel(&state, &caller, booking_id).await?,
    ))
}

#[axum::debug_handler]
pub async fn cancellation_quote(
    State(state): State<Arc<ApiState>>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(booking_id): Path<i64>,
    Query(query): Query<CancellationQuoteQuery>,
) -> Result<Json<CancellationOutcome>, AppError> {
    let outcome =
        services::cancellation::quote_cancellation(&state, &caller, booking_id, query.at).await?;
    Ok(Json(outcome))
}
