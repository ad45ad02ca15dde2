use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/bookings", post(handlers::bookings::create_booking))
        .route("/bookings/:id", get(handlers::bookings::get_booking))
        .route(
            "/bookings/field/:field_id",
            get(handlers::bookings::list_field_bookings),
        )
        .route(
            "/bookings/team/:team_id",
            get(handlers::bookings::list_team_bookings),
        )
        .route(
            "/bookings/:id/approve",
            put(handlers::bookings::approve_booking),
        )
        .route("/bookings/:id/reject", put(handlers::bookings::reject_booking))
        .route("/bookings/:id/cancel", put(handlers::bookings::cancel_booking))
        .route(
            "/bookings/:id/cancellation-quote",
            get(handlers::bookings::cancellation_quote),
        )
}
