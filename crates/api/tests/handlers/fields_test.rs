use axum::http::StatusCode;
use fake::{faker::company::en::CompanyName, Fake};
use kickoff_core::models::{
    booking::BookingRequest,
    cancellation::CancellationPolicy,
    field::{FieldProfile, FieldStatus},
    identity::UserRole,
    pricing::{PriceQuote, PricingRule},
    MessageResponse,
};
use kickoff_db::Store;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{as_caller, TestContext, MODERATOR, OWNER, PLAYER};

#[tokio::test]
async fn test_create_field_starts_pending() {
    let ctx = TestContext::new();
    let name: String = CompanyName().fake();

    let response = as_caller(ctx.server.post("/fields"), OWNER, UserRole::FieldOwner)
        .json(&json!({
            "fieldName": name,
            "location": "Harbour Road 4",
            "defaultPricePerHour": 45.0
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let field: FieldProfile = response.json();
    assert_eq!(field.field_name, name);
    assert_eq!(field.owner_id, OWNER);
    assert_eq!(field.status, FieldStatus::Pending);

    // Profiles are public
    let fetched: FieldProfile = ctx
        .server
        .get(&format!("/fields/{}", field.field_id))
        .await
        .json();
    assert_eq!(fetched, field);
}

#[tokio::test]
async fn test_create_field_requires_field_owner_role() {
    let ctx = TestContext::new();

    let response = as_caller(ctx.server.post("/fields"), PLAYER, UserRole::Player)
        .json(&json!({
            "fieldName": "Backyard",
            "location": "Somewhere",
            "defaultPricePerHour": 10.0
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_field_rejects_negative_price() {
    let ctx = TestContext::new();

    let response = as_caller(ctx.server.post("/fields"), OWNER, UserRole::FieldOwner)
        .json(&json!({
            "fieldName": "Backyard",
            "location": "Somewhere",
            "defaultPricePerHour": -1.0
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_field_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/fields/999").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_moderator_rejection_needs_a_reason() {
    let ctx = TestContext::new();
    let field: FieldProfile = as_caller(ctx.server.post("/fields"), OWNER, UserRole::FieldOwner)
        .json(&json!({
            "fieldName": "Old Mill",
            "location": "Mill Lane",
            "defaultPricePerHour": 30.0
        }))
        .await
        .json();
    let path = format!("/fields/{}/status", field.field_id);

    as_caller(ctx.server.put(&path), MODERATOR, UserRole::Moderator)
        .json(&json!({ "status": "Rejected" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Owners cannot moderate their own fields
    as_caller(ctx.server.put(&path), OWNER, UserRole::FieldOwner)
        .json(&json!({ "status": "Verified" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let rejected: FieldProfile = as_caller(ctx.server.put(&path), MODERATOR, UserRole::Moderator)
        .json(&json!({ "status": "Rejected", "rejectionReason": "No photos" }))
        .await
        .json();
    assert_eq!(rejected.status, FieldStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("No photos"));
}

#[tokio::test]
async fn test_weekend_peak_pricing() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;

    let rules: Vec<PricingRule> = as_caller(
        ctx.server.put(&format!("/fields/{}/pricing", field.field_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .json(&json!([{
        "name": "Peak",
        "dayOfWeek": ["Saturday", "Sunday"],
        "startTime": "17:00:00",
        "endTime": "21:00:00",
        "pricePerHour": 60.0,
        "priority": 10
    }]))
    .await
    .json();
    assert_eq!(rules.len(), 1);

    let quote_path = format!("/fields/{}/quote", field.field_id);

    // 2024-06-01 is a Saturday
    let peak: PriceQuote = ctx
        .server
        .get(&quote_path)
        .add_query_param("date", "2024-06-01")
        .add_query_param("startTime", "18:00:00")
        .add_query_param("endTime", "19:00:00")
        .await
        .json();
    assert_eq!(peak.hourly_rate, 60.0);
    assert_eq!(peak.total_price, 60.0);
    assert_eq!(peak.rule_name.as_deref(), Some("Peak"));

    let morning: PriceQuote = ctx
        .server
        .get(&quote_path)
        .add_query_param("date", "2024-06-01")
        .add_query_param("startTime", "10:00:00")
        .add_query_param("endTime", "11:00:00")
        .await
        .json();
    assert_eq!(morning.hourly_rate, 50.0);
    assert_eq!(morning.pricing_rule_id, None);
}

#[tokio::test]
async fn test_only_the_owner_replaces_pricing() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;

    as_caller(
        ctx.server.put(&format!("/fields/{}/pricing", field.field_id)),
        OWNER + 1,
        UserRole::FieldOwner,
    )
    .json(&json!([]))
    .await
    .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cancellation_policy_defaults_then_updates() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let path = format!("/fields/{}/cancellation-policy", field.field_id);

    let policy: CancellationPolicy = ctx.server.get(&path).await.json();
    assert_eq!(policy.free_cancellation_hours, 24);
    assert_eq!(policy.late_cancellation_penalty_percent, 50.0);
    assert!(policy.is_active);

    let updated: CancellationPolicy = as_caller(ctx.server.put(&path), OWNER, UserRole::FieldOwner)
        .json(&json!({
            "freeCancellationHours": 48,
            "lateCancellationPenaltyPercent": 25.0,
            "noShowPenaltyPercent": 100.0,
            "refundProcessingDays": 3
        }))
        .await
        .json();
    assert_eq!(updated.policy_id, policy.policy_id);
    assert_eq!(updated.free_cancellation_hours, 48);
    assert_eq!(updated.refund_processing_days, 3);

    as_caller(ctx.server.put(&path), OWNER, UserRole::FieldOwner)
        .json(&json!({
            "freeCancellationHours": 48,
            "lateCancellationPenaltyPercent": 140.0,
            "noShowPenaltyPercent": 100.0,
            "refundProcessingDays": 3
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_my_fields_lists_only_the_callers_fields() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let other = as_caller(ctx.server.post("/fields"), OWNER + 1, UserRole::FieldOwner)
        .json(&json!({
            "fieldName": "Harbour Pitch",
            "location": "Docklands",
            "defaultPricePerHour": 30.0
        }))
        .await;
    other.assert_status(StatusCode::CREATED);

    let response =
        as_caller(ctx.server.get("/fields/my-fields"), OWNER, UserRole::FieldOwner).await;

    response.assert_status(StatusCode::OK);
    let fields: Vec<FieldProfile> = response.json();
    assert_eq!(fields, vec![field]);

    let empty: Vec<FieldProfile> =
        as_caller(ctx.server.get("/fields/my-fields"), PLAYER, UserRole::Player)
            .await
            .json();
    assert!(empty.is_empty());

    ctx.server
        .get("/fields/my-fields")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_owner_updates_profile_without_touching_status() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;

    let response = as_caller(
        ctx.server.put(&format!("/fields/{}", field.field_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .json(&json!({ "fieldName": "Riverside Arena", "defaultPricePerHour": 65.0 }))
    .await;

    response.assert_status(StatusCode::OK);
    let updated: FieldProfile = response.json();
    assert_eq!(updated.field_name, "Riverside Arena");
    assert_eq!(updated.default_price_per_hour, 65.0);
    assert_eq!(updated.location, field.location);
    assert_eq!(updated.capacity, field.capacity);
    assert_eq!(updated.status, FieldStatus::Verified);
}

#[tokio::test]
async fn test_field_update_is_owner_only_and_validated() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let path = format!("/fields/{}", field.field_id);

    as_caller(ctx.server.put(&path), OWNER + 1, UserRole::FieldOwner)
        .json(&json!({ "fieldName": "Taken Over" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    as_caller(ctx.server.put(&path), OWNER, UserRole::FieldOwner)
        .json(&json!({ "capacity": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    as_caller(ctx.server.put("/fields/999"), OWNER, UserRole::FieldOwner)
        .json(&json!({ "fieldName": "Ghost" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let unchanged: FieldProfile = ctx.server.get(&path).await.json();
    assert_eq!(unchanged, field);
}

#[tokio::test]
async fn test_deleting_a_field_removes_its_bookings() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let booking: BookingRequest = ctx
        .request_booking(field.field_id, "2024-06-01", "18:00:00", "20:00:00")
        .await;
    ctx.approve(booking.booking_id).await;
    let path = format!("/fields/{}", field.field_id);

    as_caller(ctx.server.delete(&path), OWNER + 1, UserRole::FieldOwner)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = as_caller(ctx.server.delete(&path), OWNER, UserRole::FieldOwner).await;

    response.assert_status(StatusCode::OK);
    let message: MessageResponse = response.json();
    assert!(message.message.contains(&field.field_id.to_string()));

    ctx.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(ctx.store.get_booking(booking.booking_id).await.unwrap(), None);
    assert!(ctx
        .store
        .list_slots(field.field_id, None, None)
        .await
        .unwrap()
        .is_empty());

    as_caller(ctx.server.delete(&path), OWNER, UserRole::FieldOwner)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_returns_only_verified_matches() {
    let ctx = TestContext::new();
    let verified = ctx.verified_field().await;
    let pending = as_caller(ctx.server.post("/fields"), OWNER, UserRole::FieldOwner)
        .json(&json!({
            "fieldName": "Riverside Annex",
            "location": "North Park",
            "defaultPricePerHour": 20.0
        }))
        .await;
    pending.assert_status(StatusCode::CREATED);

    // Search is public
    let found: Vec<FieldProfile> = ctx
        .server
        .get("/search/fields")
        .add_query_param("q", "riverside")
        .await
        .json();
    assert_eq!(found, vec![verified.clone()]);

    let found: Vec<FieldProfile> = ctx
        .server
        .get("/search/fields")
        .add_query_param("location", "NORTH")
        .await
        .json();
    assert_eq!(found, vec![verified]);

    let found: Vec<FieldProfile> = ctx
        .server
        .get("/search/fields")
        .add_query_param("location", "Docklands")
        .await
        .json();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_search_limit_is_bounded() {
    let ctx = TestContext::new();

    ctx.server
        .get("/search/fields")
        .add_query_param("limit", 0)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    ctx.server
        .get("/search/fields")
        .add_query_param("limit", 101)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    ctx.server
        .get("/search/fields")
        .add_query_param("limit", 100)
        .await
        .assert_status(StatusCode::OK);
}
