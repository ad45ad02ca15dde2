use axum::http::StatusCode;
use chrono::NaiveTime;
use kickoff_core::models::{
    calendar::{CalendarSlot, CalendarStatus},
    identity::UserRole,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{as_caller, TestContext, OWNER};

fn at(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

async fn calendar_for(ctx: &TestContext, field_id: i64, start: &str, end: &str) -> Vec<CalendarSlot> {
    let response = ctx
        .server
        .get(&format!("/fields/{}/calendar", field_id))
        .add_query_param("start", start)
        .add_query_param("end", end)
        .await;
    response.assert_status(StatusCode::OK);
    response.json()
}

#[tokio::test]
async fn test_blocked_morning_is_projected_with_default_hours() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;

    let blocked = as_caller(
        ctx.server.post(&format!("/fields/{}/calendar/block", field.field_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .json(&json!({ "date": "2024-06-01", "startTime": "10:00:00", "endTime": "12:00:00" }))
    .await;
    blocked.assert_status(StatusCode::CREATED);
    let blocked: CalendarSlot = blocked.json();
    assert_eq!(blocked.status, CalendarStatus::Blocked);

    let calendar = calendar_for(&ctx, field.field_id, "2024-06-01", "2024-06-01").await;

    let stored: Vec<_> = calendar.iter().filter(|slot| slot.calendar_id > 0).collect();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].calendar_id, blocked.calendar_id);

    let available: Vec<_> = calendar
        .iter()
        .filter(|slot| slot.status == CalendarStatus::Available)
        .collect();
    // 06:00-10:00 and 12:00-22:00
    assert_eq!(available.len(), 14);
    assert!(available.iter().all(|slot| slot.calendar_id < 0));
    assert!(available
        .iter()
        .all(|slot| slot.range.end_time() <= at(10) || slot.range.start_time() >= at(12)));

    // Ordered by date then start time
    let starts: Vec<_> = calendar.iter().map(|slot| slot.range.start_time()).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[tokio::test]
async fn test_calendar_ids_are_stable_across_reads() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;

    let first = calendar_for(&ctx, field.field_id, "2024-06-01", "2024-06-02").await;
    let second = calendar_for(&ctx, field.field_id, "2024-06-02", "2024-06-02").await;

    assert_eq!(first.len(), 32);
    assert_eq!(&first[16..], &second[..]);
}

#[tokio::test]
async fn test_calendar_rejects_inverted_and_oversized_ranges() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let path = format!("/fields/{}/calendar", field.field_id);

    ctx.server
        .get(&path)
        .add_query_param("start", "2024-06-02")
        .add_query_param("end", "2024-06-01")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.server
        .get(&path)
        .add_query_param("start", "2024-01-01")
        .add_query_param("end", "2024-12-31")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlapping_block_conflicts() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let path = format!("/fields/{}/calendar/block", field.field_id);

    as_caller(ctx.server.post(&path), OWNER, UserRole::FieldOwner)
        .json(&json!({ "date": "2024-06-01", "startTime": "10:00:00", "endTime": "12:00:00" }))
        .await
        .assert_status(StatusCode::CREATED);

    as_caller(ctx.server.post(&path), OWNER, UserRole::FieldOwner)
        .json(&json!({
            "date": "2024-06-01",
            "startTime": "11:00:00",
            "endTime": "13:00:00",
            "status": "Maintenance"
        }))
        .await
        .assert_status(StatusCode::CONFLICT);

    // Touching intervals do not overlap
    as_caller(ctx.server.post(&path), OWNER, UserRole::FieldOwner)
        .json(&json!({
            "date": "2024-06-01",
            "startTime": "12:00:00",
            "endTime": "13:00:00",
            "status": "Maintenance"
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_block_requires_field_owner() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;

    as_caller(
        ctx.server.post(&format!("/fields/{}/calendar/block", field.field_id)),
        OWNER + 1,
        UserRole::FieldOwner,
    )
    .json(&json!({ "date": "2024-06-01", "startTime": "10:00:00", "endTime": "12:00:00" }))
    .await
    .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unblock_restores_default_availability() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;

    let blocked: CalendarSlot = as_caller(
        ctx.server.post(&format!("/fields/{}/calendar/block", field.field_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .json(&json!({ "date": "2024-06-01", "startTime": "06:00:00", "endTime": "22:00:00" }))
    .await
    .json();

    let unblock_path = format!("/fields/calendar/{}/unblock", blocked.calendar_id);
    as_caller(ctx.server.put(&unblock_path), OWNER, UserRole::FieldOwner)
        .await
        .assert_status(StatusCode::OK);

    let calendar = calendar_for(&ctx, field.field_id, "2024-06-01", "2024-06-01").await;
    assert_eq!(calendar.len(), 16);
    assert!(calendar.iter().all(|slot| slot.status == CalendarStatus::Available));

    // Already gone
    as_caller(ctx.server.put(&unblock_path), OWNER, UserRole::FieldOwner)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booked_slots_cannot_be_unblocked() {
    let ctx = TestContext::new();
    let field = ctx.verified_field().await;
    let booking = ctx
        .request_booking(field.field_id, "2024-06-01", "18:00:00", "20:00:00")
        .await;
    ctx.approve(booking.booking_id).await;

    let calendar = calendar_for(&ctx, field.field_id, "2024-06-01", "2024-06-01").await;
    let booked = calendar
        .iter()
        .find(|slot| slot.status == CalendarStatus::Booked)
        .unwrap();
    assert_eq!(booked.booking_id, Some(booking.booking_id));

    as_caller(
        ctx.server.put(&format!("/fields/calendar/{}/unblock", booked.calendar_id)),
        OWNER,
        UserRole::FieldOwner,
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);
}
