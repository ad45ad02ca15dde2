use std::sync::Arc;

use axum::http::StatusCode;
use kickoff_api::middleware::error_handling::map_error;
use kickoff_core::errors::KickoffError;
use kickoff_core::models::identity::UserRole;
use kickoff_db::mock::{MockStore, MockTeamDirectory};
use rstest::rstest;
use serde_json::json;

use crate::test_utils::{as_caller, server_for, TestContext, OWNER, PLAYER, TEAM};

#[rstest]
#[case::not_found(KickoffError::NotFound("Field 1 not found".into()), StatusCode::NOT_FOUND)]
#[case::validation(KickoffError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case::invalid_state(KickoffError::InvalidState("final".into()), StatusCode::BAD_REQUEST)]
#[case::authentication(KickoffError::Authentication("who".into()), StatusCode::UNAUTHORIZED)]
#[case::forbidden(KickoffError::Forbidden("no".into()), StatusCode::FORBIDDEN)]
#[case::conflict(KickoffError::Conflict("taken".into()), StatusCode::CONFLICT)]
#[case::database(KickoffError::Database(eyre::eyre!("pool closed")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case::internal(KickoffError::Internal("oops".into()), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: KickoffError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_missing_identity_headers_are_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/fields")
        .json(&json!({
            "fieldName": "Anonymous",
            "location": "Nowhere",
            "defaultPricePerHour": 10.0
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("x-user-id"));
}

#[tokio::test]
async fn test_unknown_role_is_unauthorized() {
    let ctx = TestContext::new();

    ctx.server
        .get(&format!("/bookings/team/{}", TEAM))
        .add_header(
            axum::http::HeaderName::from_static("x-user-id"),
            axum::http::HeaderValue::from_static("30"),
        )
        .add_header(
            axum::http::HeaderName::from_static("x-user-role"),
            axum::http::HeaderValue::from_static("Superuser"),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_store_failures_surface_as_server_errors() {
    let mut store = MockStore::new();
    store
        .expect_get_field()
        .returning(|_| Err(KickoffError::Database(eyre::eyre!("connection reset"))));
    let server = server_for(Arc::new(store), Arc::new(MockTeamDirectory::new()));

    let response = server.get("/fields/1").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn test_team_directory_failures_abort_booking_requests() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;

    let mut teams = MockTeamDirectory::new();
    teams
        .expect_is_member()
        .times(1)
        .returning(|_, _| Err(KickoffError::Database(eyre::eyre!("team service unavailable"))));
    let server = server_for(ctx.store.clone(), Arc::new(teams));

    as_caller(server.post("/bookings"), PLAYER, UserRole::TeamLeader)
        .json(&json!({
            "fieldId": field.field_id,
            "teamId": TEAM,
            "date": "2024-06-01",
            "startTime": "18:00:00",
            "endTime": "19:00:00"
        }))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    // Nothing was stored
    let listed = as_caller(
        ctx.server.get(&format!("/bookings/field/{}", field.field_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .await
    .json::<Vec<serde_json::Value>>();
    assert!(listed.is_empty());
}
