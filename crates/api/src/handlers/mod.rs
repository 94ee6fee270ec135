/// Customer-facing booking endpoints
pub mod booking;
/// Provider dashboard endpoints
pub mod provider;
