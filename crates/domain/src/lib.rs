//! Domain layer for the Tee Time backend.
//!
//! This crate contains:
//! - Domain models (Event, Invitation, Player, Course)
//! - The invitation lifecycle services and capacity logic
//! - The `EventLedger` persistence capability trait

pub mod models;
pub mod services;
