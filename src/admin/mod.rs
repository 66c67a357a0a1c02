//! Admin REST layer
//!
//! REST controllers for the web-based admin console: logger configuration
//! (read, update, add, delete) and scheduler listings, served over axum by
//! [`AdminServer`]. Mutating routes are gated by a bearer-token check.

pub mod api;
pub mod loggers;
pub mod sched;
pub mod server;

pub use loggers::{ActiveSnapshot, LoggersController, OpResult};
pub use sched::{ScheduleEntry, SchedulersController};
pub use server::{AdminConfig, AdminServer, AppState, RuntimeHandles, ServerError};
