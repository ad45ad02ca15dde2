pub mod booking;
pub mod calendar;
pub mod cancellation;
pub mod field;
pub mod pricing;
pub mod team;
