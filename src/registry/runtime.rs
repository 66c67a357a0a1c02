//! Loaded plugin and logic inventory
//!
//! The loggers view cross-references configured loggers against what is
//! actually loaded in the runtime, so the admin UI can offer sensible
//! completions when adding a logger.

use std::sync::RwLock;

/// Capability interface over the runtime's loaded plugins and logics
pub trait RuntimeInventory: Send + Sync {
    /// Names of currently loaded plugins
    fn loaded_plugins(&self) -> Vec<String>;

    /// Names of currently loaded logics
    fn loaded_logics(&self) -> Vec<String>;
}

/// In-memory inventory
#[derive(Debug, Default)]
pub struct MemoryInventory {
    plugins: RwLock<Vec<String>>,
    logics: RwLock<Vec<String>>,
}

impl MemoryInventory {
    /// Create an empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a loaded plugin
    pub fn add_plugin(&self, name: impl Into<String>) {
        self.plugins.write().unwrap().push(name.into());
    }

    /// Record a loaded logic
    pub fn add_logic(&self, name: impl Into<String>) {
        self.logics.write().unwrap().push(name.into());
    }
}

impl RuntimeInventory for MemoryInventory {
    fn loaded_plugins(&self) -> Vec<String> {
        self.plugins.read().unwrap().clone()
    }

    fn loaded_logics(&self) -> Vec<String> {
        self.logics.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_round_trip() {
        let inventory = MemoryInventory::new();
        inventory.add_plugin("knx");
        inventory.add_logic("sunrise");

        assert_eq!(inventory.loaded_plugins(), vec!["knx".to_string()]);
        assert_eq!(inventory.loaded_logics(), vec!["sunrise".to_string()]);
    }
}
