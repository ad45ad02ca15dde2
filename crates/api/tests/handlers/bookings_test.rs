use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use kickoff_core::interval::TimeRange;
use kickoff_core::models::{
    booking::{BookingRequest, BookingStatus, BookingTransition, CancelBookingResponse},
    calendar::{CalendarSlot, CalendarStatus},
    cancellation::{CancellationKind, CancellationOutcome, CancellationPolicy},
    field::{FieldProfile, FieldStatus},
    identity::UserRole,
};
use kickoff_db::mock::{MockStore, MockTeamDirectory};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{as_caller, server_for, TestContext, OWNER, PLAYER, TEAM};

#[tokio::test]
async fn test_pending_fields_take_no_bookings() {
    let ctx = TestContext::new();
    ctx.store.add_team_member(TEAM, PLAYER).await;
    let field: FieldProfile = as_caller(ctx.server.post("/fields"), OWNER, UserRole::FieldOwner)
        .json(&json!({
            "fieldName": "Unreviewed",
            "location": "Elm Street",
            "defaultPricePerHour": 20.0
        }))
        .await
        .json();

    as_caller(ctx.server.post("/bookings"), PLAYER, UserRole::TeamLeader)
        .json(&json!({
            "fieldId": field.field_id,
            "teamId": TEAM,
            "date": "2024-06-01",
            "startTime": "18:00:00",
            "endTime": "19:00:00"
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_team_members_request_bookings() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;

    as_caller(ctx.server.post("/bookings"), PLAYER + 1, UserRole::TeamLeader)
        .json(&json!({
            "fieldId": field.field_id,
            "teamId": TEAM,
            "date": "2024-06-01",
            "startTime": "18:00:00",
            "endTime": "19:00:00"
        }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_inverted_interval_is_a_validation_error() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    ctx.store.add_team_member(TEAM, PLAYER).await;

    let response = as_caller(ctx.server.post("/bookings"), PLAYER, UserRole::TeamLeader)
        .json(&json!({
            "fieldId": field.field_id,
            "teamId": TEAM,
            "date": "2024-06-01",
            "startTime": "19:00:00",
            "endTime": "18:00:00"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlapping_requests_may_both_be_pending() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;

    let first = ctx
        .request_booking(field.field_id, "2024-06-01", "18:00:00", "20:00:00")
        .await;
    let second = ctx
        .request_booking(field.field_id, "2024-06-01", "19:00:00", "21:00:00")
        .await;

    assert_eq!(first.status, BookingStatus::Pending);
    assert_eq!(second.status, BookingStatus::Pending);
    assert_eq!(first.requester_id, PLAYER);

    let listed: Vec<BookingRequest> = as_caller(
        ctx.server.get(&format!("/bookings/field/{}", field.field_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .add_query_param("status", "Pending")
    .await
    .json();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn test_approval_materializes_the_slot() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let booking = ctx
        .request_booking(field.field_id, "2024-06-01", "18:00:00", "20:00:00")
        .await;

    // Only the field owner approves
    as_caller(
        ctx.server.put(&format!("/bookings/{}/approve", booking.booking_id)),
        PLAYER,
        UserRole::TeamLeader,
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let approved = ctx.approve(booking.booking_id).await;
    assert_eq!(approved.status, BookingStatus::Confirmed);
    assert!(approved.processed_at.is_some());

    let calendar: Vec<CalendarSlot> = ctx
        .server
        .get(&format!("/fields/{}/calendar", field.field_id))
        .add_query_param("start", "2024-06-01")
        .add_query_param("end", "2024-06-01")
        .await
        .json();
    let booked: Vec<_> = calendar
        .iter()
        .filter(|slot| slot.status == CalendarStatus::Booked)
        .collect();
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0].booking_id, Some(booking.booking_id));
}

#[test_log::test(tokio::test)]
async fn test_concurrent_approvals_confirm_exactly_one() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let first = ctx
        .request_booking(field.field_id, "2024-06-01", "18:00:00", "20:00:00")
        .await;
    let second = ctx
        .request_booking(field.field_id, "2024-06-01", "18:00:00", "20:00:00")
        .await;

    let approve = |booking_id: i64| {
        let request = as_caller(
            ctx.server.put(&format!("/bookings/{}/approve", booking_id)),
            OWNER,
            UserRole::FieldOwner,
        );
        async move { request.await.status_code() }
    };
    let (a, b) = tokio::join!(approve(first.booking_id), approve(second.booking_id));

    let mut statuses = vec![a, b];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);

    let mut confirmed = 0;
    for booking_id in [first.booking_id, second.booking_id] {
        let booking: BookingRequest = as_caller(
            ctx.server.get(&format!("/bookings/{}", booking_id)),
            PLAYER,
            UserRole::TeamLeader,
        )
        .await
        .json();
        match booking.status {
            BookingStatus::Confirmed => confirmed += 1,
            other => assert_eq!(other, BookingStatus::Pending),
        }
    }
    assert_eq!(confirmed, 1);
}

#[tokio::test]
async fn test_terminal_bookings_reject_further_actions() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let booking = ctx
        .request_booking(field.field_id, "2024-06-01", "18:00:00", "20:00:00")
        .await;

    let rejected: BookingRequest = as_caller(
        ctx.server.put(&format!("/bookings/{}/reject", booking.booking_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .await
    .json();
    assert_eq!(rejected.status, BookingStatus::Rejected);

    as_caller(
        ctx.server.put(&format!("/bookings/{}/approve", booking.booking_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);

    as_caller(
        ctx.server.put(&format!("/bookings/{}/cancel", booking.booking_id)),
        PLAYER,
        UserRole::TeamLeader,
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancelling_pending_booking_carries_no_terms() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let booking = ctx
        .request_booking(field.field_id, "2099-06-01", "18:00:00", "20:00:00")
        .await;

    let response: CancelBookingResponse = as_caller(
        ctx.server.put(&format!("/bookings/{}/cancel", booking.booking_id)),
        PLAYER,
        UserRole::TeamLeader,
    )
    .await
    .json();

    assert_eq!(response.booking.status, BookingStatus::Cancelled);
    assert_eq!(response.cancellation, None);
}

#[tokio::test]
async fn test_early_cancellation_is_free_and_frees_the_slot() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let booking = ctx
        .request_booking(field.field_id, "2099-06-01", "18:00:00", "20:00:00")
        .await;
    ctx.approve(booking.booking_id).await;

    // The owner cannot cancel on the team's behalf
    as_caller(
        ctx.server.put(&format!("/bookings/{}/cancel", booking.booking_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let response: CancelBookingResponse = as_caller(
        ctx.server.put(&format!("/bookings/{}/cancel", booking.booking_id)),
        PLAYER,
        UserRole::TeamLeader,
    )
    .await
    .json();

    assert_eq!(response.booking.status, BookingStatus::Cancelled);
    let outcome = response.cancellation.unwrap();
    assert_eq!(outcome.kind, CancellationKind::Free);
    assert_eq!(outcome.refund_percent, 100.0);
    assert_eq!(outcome.refund_processing_days, 7);

    let calendar: Vec<CalendarSlot> = ctx
        .server
        .get(&format!("/fields/{}/calendar", field.field_id))
        .add_query_param("start", "2099-06-01")
        .add_query_param("end", "2099-06-01")
        .await
        .json();
    assert!(calendar.iter().all(|slot| slot.status == CalendarStatus::Available));
    assert_eq!(calendar.len(), 16);
}

#[tokio::test]
async fn test_cancellation_quote_follows_policy_windows() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let booking = ctx
        .request_booking(field.field_id, "2099-06-01", "18:00:00", "20:00:00")
        .await;
    let quote_path = format!("/bookings/{}/cancellation-quote", booking.booking_id);

    // Only confirmed bookings carry terms
    as_caller(ctx.server.get(&quote_path), PLAYER, UserRole::TeamLeader)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.approve(booking.booking_id).await;

    let cases = [
        ("2099-05-30T18:00:00", CancellationKind::Free, 100.0),
        ("2099-06-01T12:00:00", CancellationKind::Late, 50.0),
        ("2099-06-01T18:00:00", CancellationKind::NoShow, 0.0),
    ];
    for (at, kind, refund) in cases {
        let outcome: CancellationOutcome = as_caller(ctx.server.get(&quote_path), PLAYER, UserRole::TeamLeader)
            .add_query_param("at", at)
            .await
            .json();
        assert_eq!(outcome.kind, kind, "quote at {}", at);
        assert_eq!(outcome.refund_percent, refund, "quote at {}", at);
    }

    // Quotes do not change the booking
    let booking: BookingRequest = as_caller(
        ctx.server.get(&format!("/bookings/{}", booking.booking_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .await
    .json();
    assert_eq!(booking.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn test_bookings_are_private_to_team_and_owner() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let booking = ctx
        .request_booking(field.field_id, "2024-06-01", "18:00:00", "20:00:00")
        .await;

    as_caller(
        ctx.server.get(&format!("/bookings/{}", booking.booking_id)),
        PLAYER + 1,
        UserRole::Player,
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let mine: Vec<BookingRequest> = as_caller(
        ctx.server.get(&format!("/bookings/team/{}", TEAM)),
        PLAYER,
        UserRole::TeamLeader,
    )
    .await
    .json();
    assert_eq!(mine, vec![booking]);

    as_caller(
        ctx.server.get(&format!("/bookings/team/{}", TEAM)),
        PLAYER + 1,
        UserRole::Player,
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    ctx.server
        .get("/bookings/404")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cancel_reports_terms_when_approved_after_the_read() {
    let now = Utc::now();
    let field = FieldProfile {
        field_id: 1,
        owner_id: OWNER,
        field_name: "Riverside Pitch".to_string(),
        description: None,
        location: "North Park".to_string(),
        default_price_per_hour: 50.0,
        capacity: None,
        status: FieldStatus::Verified,
        rejection_reason: None,
        created_at: now,
        updated_at: now,
    };
    let pending = BookingRequest {
        booking_id: 5,
        field_id: 1,
        team_id: TEAM,
        requester_id: PLAYER,
        date: NaiveDate::from_ymd_opt(2099, 6, 1).unwrap(),
        range: TimeRange::hours(18, 20).unwrap(),
        status: BookingStatus::Pending,
        notes: None,
        created_at: now,
        processed_at: None,
    };
    let cancelled = BookingRequest {
        status: BookingStatus::Cancelled,
        processed_at: Some(now),
        ..pending.clone()
    };
    let policy = CancellationPolicy {
        policy_id: 3,
        field_id: 1,
        free_cancellation_hours: 24,
        late_cancellation_penalty_percent: 50.0,
        no_show_penalty_percent: 100.0,
        refund_processing_days: 7,
        policy_description: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    // The booking still reads as Pending, but the owner approved it before
    // the cancel committed
    let mut store = MockStore::new();
    store
        .expect_get_booking()
        .returning(move |_| Ok(Some(pending.clone())));
    store
        .expect_get_field()
        .returning(move |_| Ok(Some(field.clone())));
    store
        .expect_get_or_create_cancellation_policy()
        .returning(move |_| Ok(policy.clone()));
    store
        .expect_transition_booking()
        .times(1)
        .returning(move |_, _, _| {
            Ok(BookingTransition {
                booking: cancelled.clone(),
                previous: BookingStatus::Confirmed,
            })
        });
    let server = server_for(Arc::new(store), Arc::new(MockTeamDirectory::new()));

    let response = as_caller(server.put("/bookings/5/cancel"), PLAYER, UserRole::TeamLeader).await;

    response.assert_status(StatusCode::OK);
    let response: CancelBookingResponse = response.json();
    assert_eq!(response.booking.status, BookingStatus::Cancelled);
    let outcome = response.cancellation.unwrap();
    assert_eq!(outcome.kind, CancellationKind::Free);
    assert_eq!(outcome.refund_percent, 100.0);
}
