use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use kickoff_api::middleware::auth::{USER_ID_HEADER, USER_ROLE_HEADER};
use kickoff_api::services::notifications::TracingNotifier;
use kickoff_api::{router, ApiState};
use kickoff_core::collaborators::TeamDirectory;
use kickoff_core::models::{
    booking::BookingRequest, field::FieldProfile, identity::UserRole,
};
use kickoff_db::{MemoryStore, Store};
use serde_json::json;

pub const OWNER: i64 = 10;
pub const MODERATOR: i64 = 20;
pub const PLAYER: i64 = 30;
pub const TEAM: i64 = 300;

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub server: TestServer,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let server = server_for(store.clone(), store.clone());
        Self { store, server }
    }

    /// A field owned by [`OWNER`], approved by [`MODERATOR`].
    pub async fn verified_field(&self) -> FieldProfile {
        let created = as_caller(self.server.post("/fields"), OWNER, UserRole::FieldOwner)
            .json(&json!({
                "fieldName": "Riverside Pitch",
                "location": "North Park",
                "defaultPricePerHour": 50.0,
                "capacity": 22
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let field: FieldProfile = created.json();

        as_caller(
            self.server.put(&format!("/fields/{}/status", field.field_id)),
            MODERATOR,
            UserRole::Moderator,
        )
        .json(&json!({ "status": "Verified" }))
        .await
        .json()
    }

    /// Files a booking as [`PLAYER`] for [`TEAM`], enrolling the player first.
    pub async fn request_booking(
        &self,
        field_id: i64,
        date: &str,
        start: &str,
        end: &str,
    ) -> BookingRequest {
        self.store.add_team_member(TEAM, PLAYER).await;
        let response = as_caller(self.server.post("/bookings"), PLAYER, UserRole::TeamLeader)
            .json(&json!({
                "fieldId": field_id,
                "teamId": TEAM,
                "date": date,
                "startTime": start,
                "endTime": end
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    pub async fn approve(&self, booking_id: i64) -> BookingRequest {
        let response = as_caller(
            self.server.put(&format!("/bookings/{}/approve", booking_id)),
            OWNER,
            UserRole::FieldOwner,
        )
        .await;
        response.assert_status(StatusCode::OK);
        response.json()
    }
}

pub fn server_for(store: Arc<dyn Store>, teams: Arc<dyn TeamDirectory>) -> TestServer {
    let state = Arc::new(ApiState {
        store,
        teams,
        notifier: Arc::new(TracingNotifier),
        calendar_max_days: 62,
    });
    TestServer::new(router(state)).unwrap()
}

/// Attaches the identity headers the gateway would forward.
pub fn as_caller(request: TestRequest, user_id: i64, role: UserRole) -> TestRequest {
    request
        .add_header(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from(user_id),
        )
        .add_header(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_str(&role.to_string()).unwrap(),
        )
}
