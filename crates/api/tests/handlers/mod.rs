mod booking_test;
mod catalog_test;
mod health_test;
mod middleware_test;
mod patients_test;
mod slots_test;
