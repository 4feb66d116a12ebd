//! Guards: state machine, movement and the roster that owns them

#[allow(clippy::module_inception)]
pub mod guard;
pub mod movement;
pub mod roster;
pub mod state;

pub use guard::{Guard, GuardIndicator, GuardOutcome, GuardProfile};
pub use roster::GuardRoster;
pub use state::{GuardState, GuardStateKind, Trigger};
