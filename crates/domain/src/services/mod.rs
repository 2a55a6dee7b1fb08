//! Business logic services.

pub mod capacity;
pub mod events;
pub mod ledger;

pub use events::EventError;
pub use ledger::{EventLedger, JoinOutcome, ReconcileOutcome};
