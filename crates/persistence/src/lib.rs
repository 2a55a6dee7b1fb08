//! Persistence layer for the Tee Time backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the Postgres `EventLedger`

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
