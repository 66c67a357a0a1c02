//! Loggers controller
//!
//! Reconciles the persisted logging document with the live logger registry
//! and applies level changes to both. The two stores can diverge (a logger
//! may be active without being configured, or configured without being
//! active); `read()` labels such entries with `not_conf` instead of failing.
//!
//! The document edit-then-save sequence is serialized by a controller-level
//! mutex; the original read-modify-write raced under concurrent requests.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::error::Result;
use crate::logconf::{DocumentStore, LoggerConf};
use crate::registry::loggers::LEVEL_NOTSET;
use crate::registry::{level_from_name, level_name, LoggerRegistry, LoggerState, RuntimeInventory};

// ============================================================================
// Response Types
// ============================================================================

/// Snapshot of a live logger as served to the admin UI
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSnapshot {
    /// Logger is disabled and drops all records
    pub disabled: bool,

    /// Level name, `UNKNOWN_<n>` for unrecognized numeric levels
    pub level: String,

    /// Attached filter names
    pub filters: Vec<String>,

    /// Handler kind names
    pub handlers: Vec<String>,

    /// Handler log-file paths, empty string for handlers without a file
    pub logfiles: Vec<String>,
}

impl From<LoggerState> for ActiveSnapshot {
    fn from(state: LoggerState) -> Self {
        let mut handlers = Vec::with_capacity(state.handlers.len());
        let mut logfiles = Vec::with_capacity(state.handlers.len());
        for handler in &state.handlers {
            handlers.push(handler.kind.clone());
            logfiles.push(
                handler
                    .target
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            );
        }

        Self {
            disabled: state.disabled,
            level: level_name(state.level),
            filters: state.filters,
            handlers,
            logfiles,
        }
    }
}

/// Structured result of a mutating operation
#[derive(Debug, Clone, Serialize)]
pub struct OpResult {
    /// `"ok"` or `"error"`
    pub result: &'static str,

    /// Failure description, present on error only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OpResult {
    /// Successful operation
    pub fn ok() -> Self {
        Self {
            result: "ok",
            description: None,
        }
    }

    /// Failed operation with a description
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            result: "error",
            description: Some(description.into()),
        }
    }

    /// Check whether the operation succeeded
    pub fn is_ok(&self) -> bool {
        self.result == "ok"
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Admin controller for logger configuration
pub struct LoggersController {
    registry: Arc<dyn LoggerRegistry>,
    inventory: Arc<dyn RuntimeInventory>,
    store: DocumentStore,
    edit_lock: Mutex<()>,
}

impl LoggersController {
    /// Create a controller over the given registry, inventory and document store
    pub fn new(
        registry: Arc<dyn LoggerRegistry>,
        inventory: Arc<dyn RuntimeInventory>,
        store: DocumentStore,
    ) -> Self {
        Self {
            registry,
            inventory,
            store,
            edit_lock: Mutex::new(()),
        }
    }

    /// Names of all currently active loggers, sorted lexicographically
    ///
    /// A logger counts as active when it is not internal-only and either has
    /// handlers beyond a single no-op placeholder or an explicit level.
    pub fn active_loggers(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registry
            .names()
            .into_iter()
            .filter(|name| {
                self.registry
                    .state(name)
                    .map(|state| is_active(&state))
                    .unwrap_or(false)
            })
            .collect();
        names.sort();
        names
    }

    /// Live snapshot of a named logger, `None` if not registered
    pub fn active_configuration(&self, name: &str) -> Option<ActiveSnapshot> {
        self.registry.state(name).map(ActiveSnapshot::from)
    }

    /// Merged view of persisted configuration and live snapshots
    ///
    /// Active loggers absent from the document are synthesized with
    /// `not_conf: true`; the root logger's snapshot is attached under
    /// `root.active`; loaded plugin/logic names are included for the UI.
    pub fn read(&self) -> Result<Value> {
        let config = self.store.load()?;

        let mut loggers = serde_json::Map::new();
        for (name, conf) in &config.loggers {
            loggers.insert(name.clone(), serde_json::to_value(conf)?);
        }

        let mut root = serde_json::to_value(&config.root)?;
        root["active"] = serde_json::to_value(ActiveSnapshot::from(self.registry.root_state()))?;
        loggers.insert("root".to_string(), root);

        for name in self.active_loggers() {
            let entry = loggers
                .entry(name.clone())
                .or_insert_with(|| json!({ "not_conf": true }));
            if let Some(state) = self.registry.state(&name) {
                entry["active"] = serde_json::to_value(ActiveSnapshot::from(state))?;
            }
        }

        Ok(json!({
            "loggers": loggers,
            "active_plugins": self.inventory.loaded_plugins(),
            "active_logics": self.inventory.loaded_logics(),
        }))
    }

    /// Set a logger's runtime level and update its document entry
    ///
    /// The runtime change applies even when the document has no entry for
    /// the logger; in that case the result is an error and nothing is saved.
    pub async fn update(&self, id: &str, level: &str) -> OpResult {
        tracing::info!(id, level, "LoggersController.update");

        let Some(numeric) = level_from_name(level) else {
            tracing::error!(level, "unknown log level");
            return OpResult::error("unable to set logger level");
        };

        let old = self
            .registry
            .state(id)
            .map(|s| s.level)
            .unwrap_or(LEVEL_NOTSET);
        self.registry.set_level(id, numeric);
        tracing::info!(
            logger = id,
            from = %level_name(old),
            to = %level_name(numeric),
            "logger level changed"
        );

        let _guard = self.edit_lock.lock().await;
        let mut doc = match self.store.load_for_edit() {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "unable to load logging document");
                return OpResult::error("unable to set logger level");
            }
        };

        match doc.loggers.get_mut(id) {
            Some(entry) => {
                entry.level = Some(level_name(numeric));
                if let Err(e) = self.store.save(&mut doc, false) {
                    tracing::warn!(error = %e, "unable to save logging document");
                    return OpResult::error("unable to set logger level");
                }
                OpResult::ok()
            }
            None => OpResult::error("unable to set logger level"),
        }
    }

    /// Register a new logger and persist its configuration entry
    ///
    /// The runtime logger starts at its parent's inherited level; the
    /// document entry gets the explicitly supplied level.
    pub async fn add(&self, id: &str, level: &str) -> OpResult {
        tracing::info!(id, level, "LoggersController.add");

        let Some(numeric) = level_from_name(level) else {
            tracing::error!(level, "unknown log level");
            return OpResult::error("unknown log level");
        };

        let inherited = self.registry.parent_level(id);
        self.registry.set_level(id, inherited);

        let _guard = self.edit_lock.lock().await;
        let mut doc = match self.store.load_for_edit() {
            Ok(doc) => doc,
            Err(e) => return OpResult::error(e.to_string()),
        };
        doc.loggers
            .insert(id.to_string(), LoggerConf::with_level(level_name(numeric)));
        if let Err(e) = self.store.save(&mut doc, true) {
            return OpResult::error(e.to_string());
        }

        tracing::info!(logger = id, "logger added");
        OpResult::ok()
    }

    /// Reset a logger's runtime state and remove its configuration entry
    pub async fn delete(&self, id: &str) -> OpResult {
        tracing::info!(id, "LoggersController.delete");

        if !self.registry.reset(id) {
            return OpResult::error("active logger not found");
        }

        let _guard = self.edit_lock.lock().await;
        let mut doc = match self.store.load_for_edit() {
            Ok(doc) => doc,
            Err(e) => return OpResult::error(e.to_string()),
        };
        // A missing document entry is tolerated divergence, not an error
        doc.loggers.remove(id);
        if let Err(e) = self.store.save(&mut doc, true) {
            return OpResult::error(e.to_string());
        }

        tracing::info!(logger = id, "logger removed");
        OpResult::ok()
    }
}

fn is_active(state: &LoggerState) -> bool {
    if state.internal {
        return false;
    }
    let handlers = &state.handlers;
    let has_real_handlers =
        handlers.len() > 1 || (handlers.len() == 1 && handlers[0].kind != "NullHandler");
    has_real_handlers || state.level != LEVEL_NOTSET
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{HandlerInfo, MemoryInventory, MemoryLoggerRegistry};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const SAMPLE: &str = "\
shng_version: 1.10.0
root:
  level: WARNING
loggers:
  plugins.knx:
    level: INFO
  logics.sunrise:
    level: DEBUG
";

    fn controller() -> (LoggersController, Arc<MemoryLoggerRegistry>, TempDir) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("logging.yaml"), SAMPLE).unwrap();

        let registry = Arc::new(MemoryLoggerRegistry::new());
        let inventory = Arc::new(MemoryInventory::new());
        inventory.add_plugin("knx");
        inventory.add_logic("sunrise");

        let store = DocumentStore::new(dir.path(), "1.10.0");
        let controller = LoggersController::new(registry.clone(), inventory, store);
        (controller, registry, dir)
    }

    #[test]
    fn test_active_loggers_filters_placeholders() {
        let (controller, registry, _dir) = controller();

        // Only a no-op placeholder handler and no explicit level: inactive
        let placeholder = LoggerState {
            handlers: vec![HandlerInfo::new("NullHandler")],
            ..LoggerState::default()
        };
        registry.insert("lib.connection", placeholder);

        // Explicit non-default level: active
        registry.insert("plugins.knx", LoggerState::with_level(20));

        // Internal-only loggers never count
        let internal = LoggerState {
            level: 10,
            internal: true,
            ..LoggerState::default()
        };
        registry.insert("lib.internal", internal);

        assert_eq!(controller.active_loggers(), vec!["plugins.knx".to_string()]);
    }

    #[test]
    fn test_active_loggers_sorted() {
        let (controller, registry, _dir) = controller();
        registry.insert("plugins.knx", LoggerState::with_level(20));
        registry.insert("logics.sunrise", LoggerState::with_level(10));

        assert_eq!(
            controller.active_loggers(),
            vec!["logics.sunrise".to_string(), "plugins.knx".to_string()]
        );
    }

    #[test]
    fn test_read_flags_unconfigured_active_logger() {
        let (controller, registry, _dir) = controller();
        registry.insert("plugins.hue", LoggerState::with_level(10));

        let response = controller.read().unwrap();
        let loggers = &response["loggers"];

        assert_eq!(loggers["plugins.hue"]["not_conf"], json!(true));
        assert_eq!(loggers["plugins.hue"]["active"]["level"], json!("DEBUG"));
        // Configured but inactive loggers carry no snapshot
        assert_eq!(loggers["plugins.knx"]["level"], json!("INFO"));
        assert!(loggers["plugins.knx"].get("active").is_none());
        // Root snapshot is always attached
        assert_eq!(loggers["root"]["active"]["level"], json!("WARNING"));
    }

    #[test]
    fn test_read_includes_inventory() {
        let (controller, _registry, _dir) = controller();
        let response = controller.read().unwrap();

        assert_eq!(response["active_plugins"], json!(["knx"]));
        assert_eq!(response["active_logics"], json!(["sunrise"]));
    }

    #[tokio::test]
    async fn test_update_sets_runtime_and_document() {
        let (controller, registry, dir) = controller();

        let result = controller.update("plugins.knx", "DEBUG").await;
        assert!(result.is_ok());
        assert_eq!(registry.state("plugins.knx").unwrap().level, 10);

        let content = fs::read_to_string(dir.path().join("logging.yaml")).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();
        assert_eq!(
            doc["loggers"]["plugins.knx"]["level"].as_str(),
            Some("DEBUG")
        );
    }

    #[tokio::test]
    async fn test_update_unknown_level_fails() {
        let (controller, registry, _dir) = controller();

        let result = controller.update("plugins.knx", "CHATTY").await;
        assert!(!result.is_ok());
        assert!(registry.state("plugins.knx").is_none());
    }

    #[tokio::test]
    async fn test_update_unconfigured_logger_changes_runtime_only() {
        let (controller, registry, dir) = controller();

        let result = controller.update("plugins.hue", "DEBUG").await;
        assert!(!result.is_ok());
        // The runtime side effect still applies
        assert_eq!(registry.state("plugins.hue").unwrap().level, 10);

        let content = fs::read_to_string(dir.path().join("logging.yaml")).unwrap();
        assert!(!content.contains("plugins.hue"));
    }

    #[tokio::test]
    async fn test_add_creates_logger_at_inherited_level() {
        let (controller, registry, dir) = controller();
        registry.insert("plugins", LoggerState::with_level(20));

        let result = controller.add("plugins.hue", "DEBUG").await;
        assert!(result.is_ok());
        // Runtime inherits from the parent, the document gets the explicit level
        assert_eq!(registry.state("plugins.hue").unwrap().level, 20);

        let content = fs::read_to_string(dir.path().join("logging.yaml")).unwrap();
        assert!(content.contains("plugins.hue"));
        assert!(dir.path().join("logging.yaml.bak").exists());
    }

    #[tokio::test]
    async fn test_add_requires_valid_level() {
        let (controller, _registry, _dir) = controller();
        let result = controller.add("plugins.hue", "DEFAULT").await;
        assert!(!result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_resets_runtime_and_removes_entry() {
        let (controller, registry, dir) = controller();
        let state = LoggerState {
            level: 10,
            handlers: vec![HandlerInfo::with_target("FileHandler", "/var/log/knx.log")],
            ..LoggerState::default()
        };
        registry.insert("plugins.knx", state);

        let result = controller.delete("plugins.knx").await;
        assert!(result.is_ok());

        let state = registry.state("plugins.knx").unwrap();
        assert!(state.handlers.is_empty());

        let content = fs::read_to_string(dir.path().join("logging.yaml")).unwrap();
        assert!(!content.contains("plugins.knx"));
        assert!(content.contains("logics.sunrise"));
    }

    #[tokio::test]
    async fn test_delete_unknown_logger_fails() {
        let (controller, _registry, dir) = controller();

        let result = controller.delete("plugins.hue").await;
        assert!(!result.is_ok());
        assert_eq!(result.description.as_deref(), Some("active logger not found"));

        // Document untouched
        let content = fs::read_to_string(dir.path().join("logging.yaml")).unwrap();
        assert_eq!(content, SAMPLE);
    }
}
