//! Keeps the dashboard in step with the backend
//!
//! A refresh issues one request per endpoint. Every request is numbered at the
//! moment it is issued, and the dashboard state only applies a response if it
//! is newer than the last one applied for the same endpoint.

pub mod controller;
pub mod messages;
pub mod sequence;

pub use controller::DashboardController;
pub use messages::{RefreshTrigger, SyncUpdate};
pub use sequence::{Endpoint, FreshnessGuard};
