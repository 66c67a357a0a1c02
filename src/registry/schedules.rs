//! Live scheduler registry interface
//!
//! The runtime registers recurring jobs keyed by fully-qualified name
//! (`plugins.foo.bar`, `items.kitchen.light`, ...). Each record carries the
//! next planned run plus its recurrence metadata: a fixed-interval cycle
//! descriptor and/or a cron expression.

use std::sync::RwLock;

use chrono::{DateTime, FixedOffset};

/// One entry in the scheduler table
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRecord {
    /// Fully-qualified job name
    pub name: String,

    /// Next planned run, `None` while the job is dormant
    pub next: Option<DateTime<FixedOffset>>,

    /// Fixed-interval descriptor, e.g. `60 = None`
    pub cycle: Option<String>,

    /// Cron expression, e.g. `0 5 * *`
    pub cron: Option<String>,
}

impl ScheduleRecord {
    /// Create a record without recurrence metadata
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next: None,
            cycle: None,
            cron: None,
        }
    }

    /// Set the next planned run
    pub fn next_run(mut self, next: DateTime<FixedOffset>) -> Self {
        self.next = Some(next);
        self
    }

    /// Set the cycle descriptor
    pub fn cycle(mut self, cycle: impl Into<String>) -> Self {
        self.cycle = Some(cycle.into());
        self
    }

    /// Set the cron descriptor
    pub fn cron(mut self, cron: impl Into<String>) -> Self {
        self.cron = Some(cron.into());
        self
    }
}

/// Capability interface over the runtime's scheduler table
pub trait ScheduleRegistry: Send + Sync {
    /// All registered schedule records
    fn entries(&self) -> Vec<ScheduleRecord>;
}

/// In-memory scheduler registry
#[derive(Debug, Default)]
pub struct MemoryScheduleRegistry {
    entries: RwLock<Vec<ScheduleRecord>>,
}

impl MemoryScheduleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schedule record
    pub fn insert(&self, record: ScheduleRecord) {
        self.entries.write().unwrap().push(record);
    }
}

impl ScheduleRegistry for MemoryScheduleRegistry {
    fn entries(&self) -> Vec<ScheduleRecord> {
        self.entries.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_builder() {
        let next = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .unwrap();
        let record = ScheduleRecord::new("plugins.foo.bar")
            .next_run(next)
            .cycle("60 = None")
            .cron("0 5 * *");

        assert_eq!(record.name, "plugins.foo.bar");
        assert_eq!(record.next, Some(next));
        assert_eq!(record.cycle.as_deref(), Some("60 = None"));
        assert_eq!(record.cron.as_deref(), Some("0 5 * *"));
    }

    #[test]
    fn test_registry_returns_inserted_entries() {
        let registry = MemoryScheduleRegistry::new();
        registry.insert(ScheduleRecord::new("items.kitchen.light"));
        registry.insert(ScheduleRecord::new("logics.sunrise"));

        assert_eq!(registry.entries().len(), 2);
    }
}
