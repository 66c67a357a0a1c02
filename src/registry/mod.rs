//! Capability interfaces over the host runtime's live state
//!
//! The admin controllers never reach into ambient global state. Instead they
//! are handed trait objects for the three registries they inspect or mutate:
//! the live logger tree, the scheduler table and the plugin/logic inventory.
//! In-memory implementations back the standalone server and the tests.

pub mod loggers;
pub mod runtime;
pub mod schedules;

pub use loggers::{
    level_from_name, level_name, HandlerInfo, LoggerRegistry, LoggerState, MemoryLoggerRegistry,
};
pub use runtime::{MemoryInventory, RuntimeInventory};
pub use schedules::{MemoryScheduleRegistry, ScheduleRecord, ScheduleRegistry};
