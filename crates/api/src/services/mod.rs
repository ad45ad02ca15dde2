//! Orchestration between the pure rules in `kickoff-core` and the store.
//!
//! Handlers stay thin: they extract, call one function here, and wrap the
//! result. Every function takes the shared [`ApiState`](crate::ApiState).

pub mod bookings;
pub mod calendar;
pub mod cancellation;
pub mod fields;
pub mod notifications;
pub mod pricing;
