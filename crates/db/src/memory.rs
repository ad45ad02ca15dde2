//! In-process [`Store`] used by tests and local runs without PostgreSQL.
//!
//! All state sits behind one `tokio::sync::Mutex`, so every trait method is
//! atomic with respect to the others, which gives the same guarantees the
//! PostgreSQL store gets from transactions and advisory locks.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::store::Store;
use kickoff_core::booking::{BookingAction, CalendarEffect};
use kickoff_core::collaborators::TeamDirectory;
use kickoff_core::errors::{KickoffError, KickoffResult};
use kickoff_core::guard;
use kickoff_core::models::{
    booking::{BookingRequest, BookingStatus, BookingTransition, NewBooking},
    calendar::{CalendarSlot, CalendarStatus, NewCalendarSlot},
    cancellation::{CancellationPolicy, CancellationPolicyInput},
    field::{
        CreateFieldRequest, FieldProfile, FieldSearch, FieldStatus, UpdateFieldRequest,
        UpdateFieldStatusRequest,
    },
    pricing::{NewPricingRule, PricingRule},
};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    fields: BTreeMap<i64, FieldProfile>,
    slots: BTreeMap<i64, CalendarSlot>,
    rules: BTreeMap<i64, PricingRule>,
    policies: BTreeMap<i64, CancellationPolicy>,
    bookings: BTreeMap<i64, BookingRequest>,
    members: HashSet<(i64, i64)>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn slots_on(&self, field_id: i64, date: NaiveDate) -> Vec<CalendarSlot> {
        self.slots
            .values()
            .filter(|slot| slot.field_id == field_id && slot.date == date)
            .cloned()
            .collect()
    }

    fn insert_guarded(&mut self, slot: NewCalendarSlot) -> KickoffResult<CalendarSlot> {
        guard::ensure_free(&self.slots_on(slot.field_id, slot.date), &slot.interval())?;

        let stored = CalendarSlot {
            calendar_id: self.next_id(),
            field_id: slot.field_id,
            date: slot.date,
            range: slot.range,
            status: slot.status,
            booking_id: slot.booking_id,
        };
        self.slots.insert(stored.calendar_id, stored.clone());
        Ok(stored)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a team membership, standing in for the team service.
    pub async fn add_team_member(&self, team_id: i64, user_id: i64) {
        self.state.lock().await.members.insert((team_id, user_id));
    }
}

fn newest_first(mut bookings: Vec<BookingRequest>) -> Vec<BookingRequest> {
    bookings.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then(b.booking_id.cmp(&a.booking_id))
    });
    bookings
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_field(
        &self,
        owner_id: i64,
        request: CreateFieldRequest,
    ) -> KickoffResult<FieldProfile> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let field = FieldProfile {
            field_id: state.next_id(),
            owner_id,
            field_name: request.field_name.trim().to_string(),
            description: request.description,
            location: request.location.trim().to_string(),
            default_price_per_hour: request.default_price_per_hour,
            capacity: request.capacity,
            status: FieldStatus::Pending,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };
        state.fields.insert(field.field_id, field.clone());
        Ok(field)
    }

    async fn get_field(&self, field_id: i64) -> KickoffResult<Option<FieldProfile>> {
        Ok(self.state.lock().await.fields.get(&field_id).cloned())
    }

    async fn update_field_status(
        &self,
        field_id: i64,
        update: UpdateFieldStatusRequest,
    ) -> KickoffResult<Option<FieldProfile>> {
        let mut state = self.state.lock().await;
        Ok(state.fields.get_mut(&field_id).map(|field| {
            field.status = update.status;
            field.rejection_reason = update.rejection_reason;
            field.updated_at = Utc::now();
            field.clone()
        }))
    }

    async fn list_fields_by_owner(&self, owner_id: i64) -> KickoffResult<Vec<FieldProfile>> {
        let state = self.state.lock().await;
        Ok(state
            .fields
            .values()
            .filter(|field| field.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    async fn update_field(
        &self,
        field_id: i64,
        update: UpdateFieldRequest,
    ) -> KickoffResult<Option<FieldProfile>> {
        let mut state = self.state.lock().await;
        Ok(state.fields.get_mut(&field_id).map(|field| {
            update.apply_to(field);
            field.updated_at = Utc::now();
            field.clone()
        }))
    }

    async fn delete_field(&self, field_id: i64) -> KickoffResult<bool> {
        let mut state = self.state.lock().await;
        if state.fields.remove(&field_id).is_none() {
            return Ok(false);
        }
        state.slots.retain(|_, slot| slot.field_id != field_id);
        state.bookings.retain(|_, booking| booking.field_id != field_id);
        state.rules.retain(|_, rule| rule.field_id != field_id);
        state.policies.retain(|_, policy| policy.field_id != field_id);
        Ok(true)
    }

    async fn search_fields(&self, search: FieldSearch) -> KickoffResult<Vec<FieldProfile>> {
        let state = self.state.lock().await;
        Ok(state
            .fields
            .values()
            .filter(|field| search.matches(field))
            .take(search.limit as usize)
            .cloned()
            .collect())
    }

    async fn list_slots(
        &self,
        field_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> KickoffResult<Vec<CalendarSlot>> {
        let state = self.state.lock().await;
        let mut slots: Vec<CalendarSlot> = state
            .slots
            .values()
            .filter(|slot| slot.field_id == field_id)
            .filter(|slot| start.map_or(true, |start| slot.date >= start))
            .filter(|slot| end.map_or(true, |end| slot.date <= end))
            .cloned()
            .collect();
        slots.sort_by_key(|slot| (slot.date, slot.range.start()));
        Ok(slots)
    }

    async fn get_slot(&self, calendar_id: i64) -> KickoffResult<Option<CalendarSlot>> {
        Ok(self.state.lock().await.slots.get(&calendar_id).cloned())
    }

    async fn insert_slot_guarded(&self, slot: NewCalendarSlot) -> KickoffResult<CalendarSlot> {
        self.state.lock().await.insert_guarded(slot)
    }

    async fn release_block(&self, calendar_id: i64) -> KickoffResult<CalendarSlot> {
        let mut state = self.state.lock().await;
        let slot = state
            .slots
            .get(&calendar_id)
            .ok_or_else(|| KickoffError::not_found("Calendar slot", calendar_id))?;

        if slot.status != CalendarStatus::Blocked {
            return Err(KickoffError::InvalidState(format!(
                "Calendar slot {} is {}, only Blocked slots can be unblocked",
                calendar_id, slot.status
            )));
        }

        state
            .slots
            .remove(&calendar_id)
            .ok_or_else(|| KickoffError::not_found("Calendar slot", calendar_id))
    }

    async fn list_pricing_rules(&self, field_id: i64) -> KickoffResult<Vec<PricingRule>> {
        let state = self.state.lock().await;
        let mut rules: Vec<PricingRule> = state
            .rules
            .values()
            .filter(|rule| rule.field_id == field_id)
            .cloned()
            .collect();
        kickoff_core::pricing::sort_rules(&mut rules);
        Ok(rules)
    }

    async fn replace_pricing_rules(
        &self,
        field_id: i64,
        rules: Vec<NewPricingRule>,
    ) -> KickoffResult<Vec<PricingRule>> {
        let mut state = self.state.lock().await;
        state.rules.retain(|_, rule| rule.field_id != field_id);

        let now = Utc::now();
        let mut stored = Vec::with_capacity(rules.len());
        for rule in rules {
            let rule = PricingRule {
                pricing_rule_id: state.next_id(),
                field_id,
                name: rule.name,
                day_of_week: rule.day_of_week,
                range: rule.range,
                price_per_hour: rule.price_per_hour,
                priority: rule.priority,
                is_active: rule.is_active,
                created_at: now,
                updated_at: now,
            };
            state.rules.insert(rule.pricing_rule_id, rule.clone());
            stored.push(rule);
        }
        Ok(stored)
    }

    async fn get_or_create_cancellation_policy(
        &self,
        field_id: i64,
    ) -> KickoffResult<CancellationPolicy> {
        let mut state = self.state.lock().await;
        if let Some(policy) = state.policies.get(&field_id) {
            return Ok(policy.clone());
        }

        let defaults = CancellationPolicyInput::default();
        let now = Utc::now();
        let policy = CancellationPolicy {
            policy_id: state.next_id(),
            field_id,
            free_cancellation_hours: defaults.free_cancellation_hours,
            late_cancellation_penalty_percent: defaults.late_cancellation_penalty_percent,
            no_show_penalty_percent: defaults.no_show_penalty_percent,
            refund_processing_days: defaults.refund_processing_days,
            policy_description: defaults.policy_description,
            is_active: defaults.is_active,
            created_at: now,
            updated_at: now,
        };
        state.policies.insert(field_id, policy.clone());
        Ok(policy)
    }

    async fn update_cancellation_policy(
        &self,
        field_id: i64,
        input: CancellationPolicyInput,
    ) -> KickoffResult<CancellationPolicy> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let existing = state
            .policies
            .get(&field_id)
            .map(|policy| (policy.policy_id, policy.created_at));
        let (policy_id, created_at) = match existing {
            Some(existing) => existing,
            None => (state.next_id(), now),
        };

        let policy = CancellationPolicy {
            policy_id,
            field_id,
            free_cancellation_hours: input.free_cancellation_hours,
            late_cancellation_penalty_percent: input.late_cancellation_penalty_percent,
            no_show_penalty_percent: input.no_show_penalty_percent,
            refund_processing_days: input.refund_processing_days,
            policy_description: input.policy_description,
            is_active: input.is_active,
            created_at,
            updated_at: now,
        };
        state.policies.insert(field_id, policy.clone());
        Ok(policy)
    }

    async fn create_booking(&self, booking: NewBooking) -> KickoffResult<BookingRequest> {
        let mut state = self.state.lock().await;
        let stored = BookingRequest {
            booking_id: state.next_id(),
            field_id: booking.field_id,
            team_id: booking.team_id,
            requester_id: booking.requester_id,
            date: booking.interval.date,
            range: booking.interval.range,
            status: BookingStatus::Pending,
            notes: booking.notes,
            created_at: Utc::now(),
            processed_at: None,
        };
        state.bookings.insert(stored.booking_id, stored.clone());
        Ok(stored)
    }

    async fn get_booking(&self, booking_id: i64) -> KickoffResult<Option<BookingRequest>> {
        Ok(self.state.lock().await.bookings.get(&booking_id).cloned())
    }

    async fn list_bookings_by_field(
        &self,
        field_id: i64,
        status: Option<BookingStatus>,
    ) -> KickoffResult<Vec<BookingRequest>> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state
                .bookings
                .values()
                .filter(|booking| booking.field_id == field_id)
                .filter(|booking| status.map_or(true, |status| booking.status == status))
                .cloned()
                .collect(),
        ))
    }

    async fn list_bookings_by_team(&self, team_id: i64) -> KickoffResult<Vec<BookingRequest>> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state
                .bookings
                .values()
                .filter(|booking| booking.team_id == team_id)
                .cloned()
                .collect(),
        ))
    }

    async fn transition_booking(
        &self,
        booking_id: i64,
        action: BookingAction,
        at: DateTime<Utc>,
    ) -> KickoffResult<BookingTransition> {
        let mut state = self.state.lock().await;
        let current = state
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or_else(|| KickoffError::not_found("Booking", booking_id))?;
        let transition = current.status.apply(action)?;

        match transition.effect {
            CalendarEffect::None => {}
            CalendarEffect::Materialize => {
                state.insert_guarded(NewCalendarSlot {
                    field_id: current.field_id,
                    date: current.date,
                    range: current.range,
                    status: CalendarStatus::Booked,
                    booking_id: Some(current.booking_id),
                })?;
            }
            CalendarEffect::Release => {
                state
                    .slots
                    .retain(|_, slot| slot.booking_id != Some(booking_id));
            }
        }

        let booking = BookingRequest {
            status: transition.to,
            processed_at: Some(at),
            ..current
        };
        state.bookings.insert(booking_id, booking.clone());

        tracing::info!(
            booking_id,
            from = %transition.from,
            to = %transition.to,
            "Booking transitioned"
        );

        Ok(BookingTransition {
            booking,
            previous: transition.from,
        })
    }
}

#[async_trait]
impl TeamDirectory for MemoryStore {
    async fn is_member(&self, team_id: i64, user_id: i64) -> KickoffResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .members
            .contains(&(team_id, user_id)))
    }
}
