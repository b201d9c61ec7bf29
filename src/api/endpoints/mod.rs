//! API endpoint handlers.
//!
//! Each module corresponds to a dashboard view: the landing stats,
//! the recent-intake roster, per-patient detail and edit, and the
//! medication history panel.

pub mod health;
pub mod medications;
pub mod patients;
pub mod stats;
