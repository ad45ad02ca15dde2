use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/fields", post(handlers::fields::create_field))
        .route("/fields/my-fields", get(handlers::fields::list_my_fields))
        .route(
            "/fields/:id",
            get(handlers::fields::get_field)
                .put(handlers::fields::update_field)
                .delete(handlers::fields::delete_field),
        )
        .route("/fields/:id/status", put(handlers::fields::update_field_status))
        .route("/fields/:id/quote", get(handlers::fields::quote))
        .route(
            "/fields/:id/pricing",
            get(handlers::pricing::list_rules).put(handlers::pricing::replace_rules),
        )
        .route(
            "/fields/:id/cancellation-policy",
            get(handlers::fields::get_cancellation_policy)
                .put(handlers::fields::update_cancellation_policy),
        )
        .route("/search/fields", get(handlers::fields::search_fields))
}
