//! Group alerts

pub mod bus;

pub use bus::{GroupAlert, GroupAlertBus};
