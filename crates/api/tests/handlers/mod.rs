mod bookings_test;
mod calendar_test;
mod fields_test;
mod middleware_test;
