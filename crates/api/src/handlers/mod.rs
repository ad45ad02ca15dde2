pub mod bookings;
pub mod calendar;
pub mod fields;
pub mod pricing;
