use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockall::mock;

use crate::store::Store;
use kickoff_core::booking::BookingAction;
use kickoff_core::collaborators::TeamDirectory;
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

// Mock store for failure injection in tests
mock! {
    pub Store {}

    #[async_trait]
    impl Store for Store {
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

        async fn list_fields_by_owner(&self, owner_id: i64) -> KickoffResult<Vec<FieldProfile>>;

        async fn update_field(
            &self,
            field_id: i64,
            update: UpdateFieldRequest,
        ) -> KickoffResult<Option<FieldProfile>>;

        async fn delete_field(&self, field_id: i64) -> KickoffResult<bool>;

        async fn search_fields(&self, search: FieldSearch) -> KickoffResult<Vec<FieldProfile>>;

        async fn list_slots(
            &self,
            field_id: i64,
            start: Option<NaiveDate>,
            end: Option<NaiveDate>,
        ) -> KickoffResult<Vec<CalendarSlot>>;

        async fn get_slot(&self, calendar_id: i64) -> KickoffResult<Option<CalendarSlot>>;

        async fn insert_slot_guarded(&self, slot: NewCalendarSlot) -> KickoffResult<CalendarSlot>;

        async fn release_block(&self, calendar_id: i64) -> KickoffResult<CalendarSlot>;

        async fn list_pricing_rules(&self, field_id: i64) -> KickoffResult<Vec<PricingRule>>;

        async fn replace_pricing_rules(
            &self,
            field_id: i64,
            rules: Vec<NewPricingRule>,
        ) -> KickoffResult<Vec<PricingRule>>;

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

        async fn list_bookings_by_field(
            &self,
            field_id: i64,
            status: Option<BookingStatus>,
        ) -> KickoffResult<Vec<BookingRequest>>;

        async fn list_bookings_by_team(&self, team_id: i64) -> KickoffResult<Vec<BookingRequest>>;

        async fn transition_booking(
            &self,
            booking_id: i64,
            action: BookingAction,
            at: DateTime<Utc>,
        ) -> KickoffResult<BookingTransition>;
    }
}

mock! {
    pub TeamDirectory {}

    #[async_trait]
    impl TeamDirectory for TeamDirectory {
        async fn is_member(&self, team_id: i64, user_id: i64) -> KickoffResult<bool>;
    }
}
