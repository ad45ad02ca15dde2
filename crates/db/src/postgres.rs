use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::eyre;

use crate::repositories::{booking, calendar, cancellation, field, pricing, team};
use crate::store::Store;
use crate::DbPool;
use kickoff_core::booking::{BookingAction, CalendarEffect};
use kickoff_core::collaborators::TeamDirectory;
use kickoff_core::errors::{KickoffError, KickoffResult};
use kickoff_core::guard;
use kickoff_core::models::{
    booking::{BookingRequest, BookingStatus, BookingTransition, NewBooking},
    calendar::{CalendarSlot, CalendarStatus, NewCalendarSlot},
    cancellation::{CancellationPolicy, CancellationPolicyInput},
    field::{
        CreateFieldRequest, FieldProfile, FieldSearch, UpdateFieldRequest,
        UpdateFieldStatusRequest,
    },
    pricing::{NewPricingRule, PricingRule},
};

/// PostgreSQL-backed [`Store`]. Also answers team membership from the
/// `team_member` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// A unique index rejected the insert: someone else wrote an overlapping row
/// first.
fn unique_violation(report: &eyre::Report) -> bool {
    matches!(
        report.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}

fn into_fields(rows: Vec<crate::models::DbFieldProfile>) -> KickoffResult<Vec<FieldProfile>> {
    rows.into_iter()
        .map(|row| FieldProfile::try_from(row).map_err(KickoffError::Database))
        .collect()
}

fn into_slots(rows: Vec<crate::models::DbCalendarSlot>) -> KickoffResult<Vec<CalendarSlot>> {
    rows.into_iter()
        .map(|row| CalendarSlot::try_from(row).map_err(KickoffError::Database))
        .collect()
}

fn into_bookings(rows: Vec<crate::models::DbBookingRequest>) -> KickoffResult<Vec<BookingRequest>> {
    rows.into_iter()
        .map(|row| BookingRequest::try_from(row).map_err(KickoffError::Database))
        .collect()
}

fn db(error: sqlx::Error) -> KickoffError {
    KickoffError::Database(error.into())
}

#[async_trait]
impl Store for PgStore {
    async fn create_field(
        &self,
        owner_id: i64,
        request: CreateFieldRequest,
    ) -> KickoffResult<FieldProfile> {
        let row = field::create_field(&self.pool, owner_id, &request).await?;
        Ok(FieldProfile::try_from(row)?)
    }

    async fn get_field(&self, field_id: i64) -> KickoffResult<Option<FieldProfile>> {
        let row = field::get_field(&self.pool, field_id).await?;
        Ok(row.map(FieldProfile::try_from).transpose()?)
    }

    async fn update_field_status(
        &self,
        field_id: i64,
        update: UpdateFieldStatusRequest,
    ) -> KickoffResult<Option<FieldProfile>> {
        let row = field::update_field_status(
            &self.pool,
            field_id,
            update.status,
            update.rejection_reason.as_deref(),
        )
        .await?;
        Ok(row.map(FieldProfile::try_from).transpose()?)
    }

    async fn list_fields_by_owner(&self, owner_id: i64) -> KickoffResult<Vec<FieldProfile>> {
        let rows = field::list_fields_by_owner(&self.pool, owner_id).await?;
        into_fields(rows)
    }

    async fn update_field(
        &self,
        field_id: i64,
        update: UpdateFieldRequest,
    ) -> KickoffResult<Option<FieldProfile>> {
        let row = field::update_field(&self.pool, field_id, &update).await?;
        Ok(row.map(FieldProfile::try_from).transpose()?)
    }

    async fn delete_field(&self, field_id: i64) -> KickoffResult<bool> {
        let mut tx = self.pool.begin().await.map_err(db)?;

        calendar::lock_field(&mut *tx, field_id).await?;
        let deleted = field::delete_field(&mut *tx, field_id).await?;

        tx.commit().await.map_err(db)?;
        Ok(deleted)
    }

    async fn search_fields(&self, search: FieldSearch) -> KickoffResult<Vec<FieldProfile>> {
        let rows = field::search_fields(&self.pool, &search).await?;
        into_fields(rows)
    }

    async fn list_slots(
        &self,
        field_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> KickoffResult<Vec<CalendarSlot>> {
        let rows = calendar::list_slots(&self.pool, field_id, start, end).await?;
        into_slots(rows)
    }

    async fn get_slot(&self, calendar_id: i64) -> KickoffResult<Option<CalendarSlot>> {
        let row = calendar::get_slot(&self.pool, calendar_id, false).await?;
        Ok(row.map(CalendarSlot::try_from).transpose()?)
    }

    async fn insert_slot_guarded(&self, slot: NewCalendarSlot) -> KickoffResult<CalendarSlot> {
        let mut tx = self.pool.begin().await.map_err(db)?;

        calendar::lock_field(&mut *tx, slot.field_id).await?;
        let existing = into_slots(
            calendar::list_slots(&mut *tx, slot.field_id, Some(slot.date), Some(slot.date)).await?,
        )?;
        guard::ensure_free(&existing, &slot.interval())?;

        let row = match calendar::insert_slot(&mut *tx, &slot).await {
            Ok(row) => row,
            Err(e) if unique_violation(&e) => {
                return Err(KickoffError::Conflict(format!(
                    "{} on field {} is already taken",
                    slot.interval(),
                    slot.field_id
                )))
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await.map_err(db)?;
        Ok(CalendarSlot::try_from(row)?)
    }

    async fn release_block(&self, calendar_id: i64) -> KickoffResult<CalendarSlot> {
        let mut tx = self.pool.begin().await.map_err(db)?;

        let slot = calendar::get_slot(&mut *tx, calendar_id, true)
            .await?
            .map(CalendarSlot::try_from)
            .transpose()?
            .ok_or_else(|| KickoffError::not_found("Calendar slot", calendar_id))?;

        if slot.status != CalendarStatus::Blocked {
            return Err(KickoffError::InvalidState(format!(
                "Calendar slot {} is {}, only Blocked slots can be unblocked",
                calendar_id, slot.status
            )));
        }

        calendar::delete_slot(&mut *tx, calendar_id).await?;
        tx.commit().await.map_err(db)?;

        tracing::info!(calendar_id, field_id = slot.field_id, "Calendar slot unblocked");
        Ok(slot)
    }

    async fn list_pricing_rules(&self, field_id: i64) -> KickoffResult<Vec<PricingRule>> {
        let rows = pricing::list_rules(&self.pool, field_id).await?;
        rows.into_iter()
            .map(|row| PricingRule::try_from(row).map_err(KickoffError::Database))
            .collect()
    }

    async fn replace_pricing_rules(
        &self,
        field_id: i64,
        rules: Vec<NewPricingRule>,
    ) -> KickoffResult<Vec<PricingRule>> {
        let mut tx = self.pool.begin().await.map_err(db)?;

        let removed = pricing::delete_rules(&mut *tx, field_id).await?;
        let mut stored = Vec::with_capacity(rules.len());
        for rule in &rules {
            let row = pricing::insert_rule(&mut *tx, field_id, rule).await?;
            stored.push(PricingRule::try_from(row)?);
        }

        tx.commit().await.map_err(db)?;

        tracing::info!(field_id, removed, inserted = stored.len(), "Pricing rules replaced");
        Ok(stored)
    }

    async fn get_or_create_cancellation_policy(
        &self,
        field_id: i64,
    ) -> KickoffResult<CancellationPolicy> {
        if let Some(row) = cancellation::get_policy(&self.pool, field_id).await? {
            return Ok(row.into());
        }

        let row = cancellation::upsert_policy(
            &self.pool,
            field_id,
            &CancellationPolicyInput::default(),
            false,
        )
        .await?;
        Ok(row.into())
    }

    async fn update_cancellation_policy(
        &self,
        field_id: i64,
        input: CancellationPolicyInput,
    ) -> KickoffResult<CancellationPolicy> {
        let row = cancellation::upsert_policy(&self.pool, field_id, &input, true).await?;
        Ok(row.into())
    }

    async fn create_booking(&self, booking: NewBooking) -> KickoffResult<BookingRequest> {
        let row = booking::create_booking(&self.pool, &booking).await?;
        Ok(BookingRequest::try_from(row)?)
    }

    async fn get_booking(&self, booking_id: i64) -> KickoffResult<Option<BookingRequest>> {
        let row = booking::get_booking(&self.pool, booking_id, false).await?;
        Ok(row.map(BookingRequest::try_from).transpose()?)
    }

    async fn list_bookings_by_field(
        &self,
        field_id: i64,
        status: Option<BookingStatus>,
    ) -> KickoffResult<Vec<BookingRequest>> {
        into_bookings(booking::list_by_field(&self.pool, field_id, status).await?)
    }

    async fn list_bookings_by_team(&self, team_id: i64) -> KickoffResult<Vec<BookingRequest>> {
        into_bookings(booking::list_by_team(&self.pool, team_id).await?)
    }

    async fn transition_booking(
        &self,
        booking_id: i64,
        action: BookingAction,
        at: DateTime<Utc>,
    ) -> KickoffResult<BookingTransition> {
        let mut tx = self.pool.begin().await.map_err(db)?;

        let current = booking::get_booking(&mut *tx, booking_id, true)
            .await?
            .map(BookingRequest::try_from)
            .transpose()?
            .ok_or_else(|| KickoffError::not_found("Booking", booking_id))?;
        let transition = current.status.apply(action)?;

        match transition.effect {
            CalendarEffect::None => {}
            CalendarEffect::Materialize => {
                let slot = NewCalendarSlot {
                    field_id: current.field_id,
                    date: current.date,
                    range: current.range,
                    status: CalendarStatus::Booked,
                    booking_id: Some(current.booking_id),
                };

                calendar::lock_field(&mut *tx, slot.field_id).await?;
                let existing = into_slots(
                    calendar::list_slots(&mut *tx, slot.field_id, Some(slot.date), Some(slot.date))
                        .await?,
                )?;
                guard::ensure_free(&existing, &slot.interval())?;

                match calendar::insert_slot(&mut *tx, &slot).await {
                    Ok(_) => {}
                    Err(e) if unique_violation(&e) => {
                        return Err(KickoffError::Conflict(format!(
                            "{} on field {} is already taken",
                            slot.interval(),
                            slot.field_id
                        )))
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            CalendarEffect::Release => {
                let released = calendar::delete_booking_slot(&mut *tx, booking_id).await?;
                if released == 0 {
                    tracing::warn!(booking_id, "Confirmed booking had no calendar slot to release");
                }
            }
        }

        let row = booking::set_status(&mut *tx, booking_id, transition.to, at).await?;
        tx.commit().await.map_err(db)?;

        tracing::info!(
            booking_id,
            from = %transition.from,
            to = %transition.to,
            "Booking transitioned"
        );

        Ok(BookingTransition {
            booking: BookingRequest::try_from(row)?,
            previous: transition.from,
        })
    }
}

#[async_trait]
impl TeamDirectory for PgStore {
    async fn is_member(&self, team_id: i64, user_id: i64) -> KickoffResult<bool> {
        team::is_member(&self.pool, team_id, user_id)
            .await
            .map_err(|e| KickoffError::Database(eyre!("Team membership lookup failed: {}", e)))
    }
}
