//! # Kickoff Core
//!
//! Domain types and the pure rules of field booking: time intervals, price
//! resolution, cancellation terms, calendar projection, the overlap guard and
//! the booking state machine. Nothing in this crate does I/O; storage and the
//! HTTP surface live in `kickoff-db` and `kickoff-api`.

pub mod availability;
pub mod booking;
pub mod cancellation;
pub mod collaborators;
pub mod errors;
pub mod guard;
pub mod interval;
pub mod models;
pub mod pricing;
