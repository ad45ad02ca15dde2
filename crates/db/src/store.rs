//! The persistence seam the service layer is written against.
//!
//! Each method is one unit of work: it either commits everything it writes or
//! nothing. Methods that write non-default calendar rows run the conflict
//! guard inside that unit of work.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use kickoff_core::booking::BookingAction;
use kickoff_core::errors::KickoffResult;
use kickoff_core::models::{
    booking::{BookingRequest, BookingStatus, BookingTransition, NewBooking},
    calendar::{CalendarSlot, NewCalendarSlot},
    cancellation::{CancellationPolicy, CancellationPolicyInput},
    field::{
        CreateFieldRequest, FieldProfile, FieldSearch, UpdateFieldRequest,
        UpdateFieldStatusRequest,
    },
    pricing::{NewPricingRule, PricingRule},
};

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_field(
        &self,
        owner_id: i64,
        request: CreateFieldRequest,
    ) -> KickoffResult<FieldProfile>;

    async fn get_field(&self, field_id: i64) -> KickoffResult<Option<FieldProfile>>;

    async fn update_field_status(
        &self,
        field_id: i64,
        update: UpdateFieldStatusRequest,
    ) -> KickoffResult<Option<FieldProfile>>;

    /// Fields owned by `owner_id`, oldest first.
    async fn list_fields_by_owner(&self, owner_id: i64) -> KickoffResult<Vec<FieldProfile>>;

    /// Applies a partial profile update. `None` when the field does not exist.
    async fn update_field(
        &self,
        field_id: i64,
        update: UpdateFieldRequest,
    ) -> KickoffResult<Option<FieldProfile>>;

    /// Deletes a field with its calendar, bookings, pricing rules and
    /// cancellation policy. Returns whether the field existed.
    async fn delete_field(&self, field_id: i64) -> KickoffResult<bool>;

    /// Verified fields matching `search`, ordered by id.
    async fn search_fields(&self, search: FieldSearch) -> KickoffResult<Vec<FieldProfile>>;

    /// Stored calendar rows of a field, ordered by date and start time.
    /// Bounds are inclusive and either may be open.
    async fn list_slots(
        &self,
        field_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> KickoffResult<Vec<CalendarSlot>>;

    async fn get_slot(&self, calendar_id: i64) -> KickoffResult<Option<CalendarSlot>>;

    /// Writes a calendar row unless it overlaps an existing row of the same
    /// field and date, in which case nothing is written and `Conflict` is
    /// returned.
    async fn insert_slot_guarded(&self, slot: NewCalendarSlot) -> KickoffResult<CalendarSlot>;

    /// Deletes a `Blocked` row and returns it. Any other status is
    /// `InvalidState`.
    async fn release_block(&self, calendar_id: i64) -> KickoffResult<CalendarSlot>;

    async fn list_pricing_rules(&self, field_id: i64) -> KickoffResult<Vec<PricingRule>>;

    /// Replaces the whole rule set of a field.
    async fn replace_pricing_rules(
        &self,
        field_id: i64,
        rules: Vec<NewPricingRule>,
    ) -> KickoffResult<Vec<PricingRule>>;

    /// Returns the field's policy, creating one with default terms first if
    /// the field has none.
    async fn get_or_create_cancellation_policy(
        &self,
        field_id: i64,
    ) -> KickoffResult<CancellationPolicy>;

    async fn update_cancellation_policy(
        &self,
        field_id: i64,
        input: CancellationPolicyInput,
    ) -> KickoffResult<CancellationPolicy>;

    async fn create_booking(&self, booking: NewBooking) -> KickoffResult<BookingRequest>;

    async fn get_booking(&self, booking_id: i64) -> KickoffResult<Option<BookingRequest>>;

    /// Newest first.
    async fn list_bookings_by_field(
        &self,
        field_id: i64,
        status: Option<BookingStatus>,
    ) -> KickoffResult<Vec<BookingRequest>>;

    /// Newest first.
    async fn list_bookings_by_team(&self, team_id: i64) -> KickoffResult<Vec<BookingRequest>>;

    /// Applies `action` to the booking's current status and its calendar
    /// effect. Approving materializes a `Booked` row through the conflict
    /// guard; cancelling a confirmed booking deletes that row. On any error
    /// the booking keeps its status.
    async fn transition_booking(
        &self,
        booking_id: i64,
        action: BookingAction,
        at: DateTime<Utc>,
    ) -> KickoffResult<BookingTransition>;
}
