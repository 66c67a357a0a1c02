//! Schedulers controller
//!
//! Serves the scheduler table for the admin UI: only jobs with a planned
//! next run and full recurrence metadata are listed, grouped by the owning
//! subsystem derived from the job's fully-qualified name.

use std::sync::Arc;

use serde::Serialize;

use crate::registry::ScheduleRegistry;

/// Timestamp format served to the UI, e.g. `2024-03-01 12:00:00+0100`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// One schedule as served to the admin UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    /// Fully-qualified job name
    pub fullname: String,

    /// Display name, the fullname with the group prefix stripped
    pub name: String,

    /// Owning subsystem: `item`, `logic`, `plugin` or `other`
    pub group: String,

    /// Next planned run, formatted `YYYY-MM-DD HH:MM:SS±ZZZZ`
    pub next: String,

    /// Fixed-interval descriptor
    pub cycle: String,

    /// Cron expression
    pub cron: String,
}

/// Admin controller for scheduler listings
pub struct SchedulersController {
    registry: Arc<dyn ScheduleRegistry>,
}

impl SchedulersController {
    /// Create a controller over the given scheduler registry
    pub fn new(registry: Arc<dyn ScheduleRegistry>) -> Self {
        Self { registry }
    }

    /// All qualifying schedules, sorted case-insensitively by full name
    ///
    /// Entries without a next-run timestamp or with missing/empty cycle or
    /// cron metadata are skipped.
    pub fn list(&self) -> Vec<ScheduleEntry> {
        let mut entries = Vec::new();

        for record in self.registry.entries() {
            let (Some(next), Some(cycle), Some(cron)) = (record.next, record.cycle, record.cron)
            else {
                continue;
            };
            if cycle.is_empty() || cron.is_empty() {
                continue;
            }

            let (group, name) = split_group(&record.name);
            entries.push(ScheduleEntry {
                fullname: record.name,
                name,
                group,
                next: next.format(TIMESTAMP_FORMAT).to_string(),
                cycle,
                cron,
            });
        }

        entries.sort_by_key(|entry| entry.fullname.to_lowercase());
        entries
    }
}

/// Derive the display group and name from a fully-qualified job name
///
/// A leading `items`/`logics`/`plugins` segment becomes the singular group
/// name and is stripped from the display name; everything else is `other`.
fn split_group(fullname: &str) -> (String, String) {
    if let Some((first, rest)) = fullname.split_once('.') {
        let lowered = first.to_lowercase();
        if matches!(lowered.as_str(), "items" | "logics" | "plugins") {
            let group = lowered[..lowered.len() - 1].to_string();
            return (group, rest.to_string());
        }
    }
    ("other".to_string(), fullname.to_string())
}

// ============================================================================
// Tests
// ============================================================================
