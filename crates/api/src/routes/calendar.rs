use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/fields/:id/calendar", get(handlers::calendar::get_calendar))
        .route(
            "/fields/:id/calendar/block",
            post(handlers::calendar::block_slot),
        )
        .route(
            "/fields/calendar/:calendar_id/unblock",
            put(handlers::calendar::unblock_slot),
        )
}
