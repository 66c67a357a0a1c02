//! Live logger registry interface
//!
//! The runtime keeps a tree of named loggers, each with a numeric severity
//! level, a disabled flag, filters and attached handlers. The admin layer
//! only sees this capability interface; [`MemoryLoggerRegistry`] is the
//! implementation used by the standalone server and the tests.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

// ============================================================================
// Severity Levels
// ============================================================================

/// No explicit level set; severity is inherited from the parent logger
pub const LEVEL_NOTSET: u32 = 0;
/// Default level of the root logger
pub const LEVEL_WARNING: u32 = 30;

/// Numeric level to name table, with runtime-specific NOTICE in between
const LEVEL_NAMES: [(u32, &str); 7] = [
    (0, "NOTSET"),
    (10, "DEBUG"),
    (20, "INFO"),
    (29, "NOTICE"),
    (30, "WARNING"),
    (40, "ERROR"),
    (50, "CRITICAL"),
];

/// Translate a numeric level to its name, `UNKNOWN_<n>` for unmapped values
pub fn level_name(level: u32) -> String {
    LEVEL_NAMES
        .iter()
        .find(|(n, _)| *n == level)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| format!("UNKNOWN_{level}"))
}

/// Translate a level name (case-insensitive) to its numeric value
pub fn level_from_name(name: &str) -> Option<u32> {
    let upper = name.to_ascii_uppercase();
    LEVEL_NAMES
        .iter()
        .find(|(_, n)| *n == upper)
        .map(|(level, _)| *level)
}

// ============================================================================
// Logger State
// ============================================================================

/// A handler attached to a logger: its kind and optional log-file target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerInfo {
    /// Handler kind name, e.g. `StreamHandler` or `TimedRotatingFileHandler`
    pub kind: String,

    /// Log-file path for file-backed handlers
    pub target: Option<PathBuf>,
}

impl HandlerInfo {
    /// Create a handler without a file target
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: None,
        }
    }

    /// Create a file-backed handler
    pub fn with_target(kind: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self {
            kind: kind.into(),
            target: Some(target.into()),
        }
    }
}

/// State of one logger in the live registry
#[derive(Debug, Clone, Default)]
pub struct LoggerState {
    /// Numeric severity level; [`LEVEL_NOTSET`] means inherited
    pub level: u32,

    /// Logger is disabled and drops all records
    pub disabled: bool,

    /// Internal-only logger, excluded from the active list
    pub internal: bool,

    /// Attached filter names
    pub filters: Vec<String>,

    /// Attached handlers
    pub handlers: Vec<HandlerInfo>,
}

impl LoggerState {
    /// Create a state with an explicit level and no handlers
    pub fn with_level(level: u32) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }
}

// ============================================================================
// Registry Interface
// ============================================================================

/// Capability interface over the runtime's live logger tree
pub trait LoggerRegistry: Send + Sync {
    /// Names of all registered loggers (root excluded)
    fn names(&self) -> Vec<String>;

    /// Snapshot of a named logger, `None` if not registered
    fn state(&self, name: &str) -> Option<LoggerState>;

    /// Snapshot of the root logger
    fn root_state(&self) -> LoggerState;

    /// Set a logger's level, registering the logger when absent
    fn set_level(&self, name: &str, level: u32);

    /// Level inherited from the nearest registered ancestor (root as fallback)
    fn parent_level(&self, name: &str) -> u32;

    /// Reset a logger to its inherited level and strip all handlers
    ///
    /// Returns `false` when the logger is not registered.
    fn reset(&self, name: &str) -> bool;
}

// ============================================================================
// In-Memory Implementation
// ============================================================================

/// In-memory logger registry
#[derive(Debug, Default)]
pub struct MemoryLoggerRegistry {
    root: RwLock<LoggerState>,
    nodes: RwLock<BTreeMap<String, LoggerState>>,
}

impl MemoryLoggerRegistry {
    /// Create a registry with a WARNING-level root logger
    pub fn new() -> Self {
        Self {
            root: RwLock::new(LoggerState::with_level(LEVEL_WARNING)),
            nodes: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert or replace a logger's full state
    pub fn insert(&self, name: impl Into<String>, state: LoggerState) {
        self.nodes.write().unwrap().insert(name.into(), state);
    }

    /// Replace the root logger's state
    pub fn set_root(&self, state: LoggerState) {
        *self.root.write().unwrap() = state;
    }
}

impl LoggerRegistry for MemoryLoggerRegistry {
    fn names(&self) -> Vec<String> {
        self.nodes.read().unwrap().keys().cloned().collect()
    }

    fn state(&self, name: &str) -> Option<LoggerState> {
        self.nodes.read().unwrap().get(name).cloned()
    }

    fn root_state(&self) -> LoggerState {
        self.root.read().unwrap().clone()
    }

    fn set_level(&self, name: &str, level: u32) {
        let mut nodes = self.nodes.write().unwrap();
        nodes.entry(name.to_string()).or_default().level = level;
    }

    fn parent_level(&self, name: &str) -> u32 {
        let nodes = self.nodes.read().unwrap();
        let mut current = name;
        while let Some(pos) = current.rfind('.') {
            current = &current[..pos];
            if let Some(state) = nodes.get(current) {
                return state.level;
            }
        }
        self.root.read().unwrap().level
    }

    fn reset(&self, name: &str) -> bool {
        let inherited = self.parent_level(name);
        let mut nodes = self.nodes.write().unwrap();
        match nodes.get_mut(name) {
            Some(state) => {
                state.level = inherited;
                state.handlers.clear();
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_name_table() {
        assert_eq!(level_name(10), "DEBUG");
        assert_eq!(level_name(29), "NOTICE");
        assert_eq!(level_name(30), "WARNING");
        assert_eq!(level_name(42), "UNKNOWN_42");
    }

    #[test]
    fn test_level_from_name() {
        assert_eq!(level_from_name("DEBUG"), Some(10));
        assert_eq!(level_from_name("notice"), Some(29));
        assert_eq!(level_from_name("CHATTY"), None);
    }

    #[test]
    fn test_set_level_registers_logger() {
        let registry = MemoryLoggerRegistry::new();
        registry.set_level("plugins.knx", 10);

        let state = registry.state("plugins.knx").unwrap();
        assert_eq!(state.level, 10);
        assert_eq!(registry.names(), vec!["plugins.knx".to_string()]);
    }

    #[test]
    fn test_parent_level_walks_ancestors() {
        let registry = MemoryLoggerRegistry::new();
        registry.insert("plugins", LoggerState::with_level(20));
        registry.insert("plugins.knx.bus", LoggerState::with_level(10));

        assert_eq!(registry.parent_level("plugins.knx.bus"), 20);
        assert_eq!(registry.parent_level("plugins.knx"), 20);
        // No registered ancestor falls back to the root level
        assert_eq!(registry.parent_level("logics.light"), LEVEL_WARNING);
    }

    #[test]
    fn test_reset_strips_handlers() {
        let registry = MemoryLoggerRegistry::new();
        let state = LoggerState {
            level: 10,
            handlers: vec![HandlerInfo::with_target("FileHandler", "/var/log/knx.log")],
            ..LoggerState::default()
        };
        registry.insert("plugins.knx", state);

        assert!(registry.reset("plugins.knx"));
        let state = registry.state("plugins.knx").unwrap();
        assert_eq!(state.level, LEVEL_WARNING);
        assert!(state.handlers.is_empty());

        assert!(!registry.reset("unknown.logger"));
    }
}
