//! HTTP route handlers.

pub mod courses;
pub mod events;
pub mod health;
pub mod invitations;
pub mod players;
