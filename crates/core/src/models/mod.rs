pub mod booking;
pub mod slot;
