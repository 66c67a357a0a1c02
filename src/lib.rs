//! hausmeister - Admin backend for a home-automation runtime
//!
//! A small administration service and environment unit library: REST
//! controllers for logger configuration and scheduler listings, plus pure
//! conversion helpers for wind speed, distance and compass directions.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`admin`] - REST controllers and the admin HTTP server
//! - [`env`] - Unit conversions, Beaufort scale and location lookup
//! - [`logconf`] - Persisted YAML logging document with backup handling
//! - [`registry`] - Capability interfaces over the runtime's live state
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use hausmeister::admin::{AdminConfig, AdminServer, RuntimeHandles};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AdminConfig::default();
//!     let server = AdminServer::new(config, RuntimeHandles::in_memory())?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod env;
pub mod error;
pub mod logconf;
pub mod registry;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::admin::{AdminConfig, AdminServer, RuntimeHandles};
    pub use crate::env::beaufort::{beaufort_description, speed_to_beaufort, Language};
    pub use crate::error::{Error, Result};
    pub use crate::logconf::{DocumentStore, LoggingDocument};
    pub use crate::registry::{LoggerRegistry, RuntimeInventory, ScheduleRegistry};
}
