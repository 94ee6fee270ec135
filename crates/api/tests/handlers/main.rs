mod booking_test;
mod middleware_test;
mod provider_test;
mod test_utils;
