//! Persisted logging configuration document
//!
//! The runtime's logging setup lives in `<etc>/logging.yaml`. The admin
//! layer edits only the `loggers` mapping and the version stamp; all other
//! sections (formatters, handlers, filters, ...) are preserved round-trip
//! through flattened maps.
//!
//! A document without a `shng_version` stamp predates this scheme; loading
//! it for edit writes a `.bak` copy before the first stamped save.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Filename of the logging document inside the etc directory
const DOCUMENT_FILENAME: &str = "logging.yaml";

// ============================================================================
// Document Model
// ============================================================================

/// One logger entry in the persisted document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggerConf {
    /// Configured severity level name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// All other per-logger keys, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl LoggerConf {
    /// Create an entry with only a level
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: Some(level.into()),
            extra: BTreeMap::new(),
        }
    }
}

/// The persisted logging configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingDocument {
    /// Runtime version that last wrote the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shng_version: Option<String>,

    /// Root logger configuration, preserved verbatim
    #[serde(default)]
    pub root: serde_yaml::Mapping,

    /// Per-logger configuration entries
    #[serde(default)]
    pub loggers: BTreeMap<String, LoggerConf>,

    /// All other top-level sections, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

// ============================================================================
// Document Store
// ============================================================================

/// Load/save access to the logging document with backup handling
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
    version: String,
}

impl DocumentStore {
    /// Create a store for `<etc_dir>/logging.yaml`, stamping saves with `version`
    pub fn new(etc_dir: impl AsRef<Path>, version: impl Into<String>) -> Self {
        Self {
            path: etc_dir.as_ref().join(DOCUMENT_FILENAME),
            version: version.into(),
        }
    }

    /// Path of the logging document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document without modifying it
    pub fn load(&self) -> Result<LoggingDocument> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load the document for a subsequent edit-then-save
    ///
    /// A document without a version stamp gets a backup copy and a stamped
    /// save before it is handed out.
    pub fn load_for_edit(&self) -> Result<LoggingDocument> {
        let mut doc = self.load()?;
        tracing::info!(shng_version = ?doc.shng_version, "load_for_edit");

        if doc.shng_version.is_none() {
            self.save(&mut doc, true)?;
        }

        Ok(doc)
    }

    /// Stamp the current version and write the document
    ///
    /// With `create_backup`, the previous file is copied to `.bak` first.
    pub fn save(&self, doc: &mut LoggingDocument, create_backup: bool) -> Result<()> {
        doc.shng_version = Some(self.version.clone());

        if create_backup && self.path.exists() {
            fs::copy(&self.path, self.backup_path())?;
        }

        fs::write(&self.path, serde_yaml::to_string(doc)?)?;
        Ok(())
    }

    fn backup_path(&self) -> PathBuf {
        self.path.with_extension("yaml.bak")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
root:
  level: WARNING
  handlers: [console]
loggers:
  plugins.knx:
    level: INFO
    handlers: [knx_file]
handlers:
  console:
    class: StreamHandler
";

    fn store_with_sample(dir: &Path) -> DocumentStore {
        fs::write(dir.join("logging.yaml"), SAMPLE).unwrap();
        DocumentStore::new(dir, "1.10.0")
    }

    #[test]
    fn test_load_parses_loggers_and_root() {
        let dir = tempdir().unwrap();
        let store = store_with_sample(dir.path());

        let doc = store.load().unwrap();
        assert!(doc.shng_version.is_none());
        assert_eq!(
            doc.loggers["plugins.knx"].level.as_deref(),
            Some("INFO")
        );
        assert_eq!(
            doc.root.get("level").and_then(|v| v.as_str()),
            Some("WARNING")
        );
    }

    #[test]
    fn test_unknown_sections_preserved_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_with_sample(dir.path());

        let mut doc = store.load().unwrap();
        store.save(&mut doc, false).unwrap();

        let doc = store.load().unwrap();
        assert!(doc.extra.contains_key("handlers"));
        assert!(doc.loggers["plugins.knx"].extra.contains_key("handlers"));
    }

    #[test]
    fn test_missing_stamp_triggers_backup() {
        let dir = tempdir().unwrap();
        let store = store_with_sample(dir.path());

        let doc = store.load_for_edit().unwrap();
        assert_eq!(doc.shng_version.as_deref(), Some("1.10.0"));
        assert!(dir.path().join("logging.yaml.bak").exists());

        // Re-stamped document loads for edit without another backup
        fs::remove_file(dir.path().join("logging.yaml.bak")).unwrap();
        store.load_for_edit().unwrap();
        assert!(!dir.path().join("logging.yaml.bak").exists());
    }

    #[test]
    fn test_save_with_backup_copies_previous_file() {
        let dir = tempdir().unwrap();
        let store = store_with_sample(dir.path());

        let mut doc = store.load().unwrap();
        doc.loggers
            .insert("logics.light".to_string(), LoggerConf::with_level("DEBUG"));
        store.save(&mut doc, true).unwrap();

        let backup = fs::read_to_string(dir.path().join("logging.yaml.bak")).unwrap();
        assert_eq!(backup, SAMPLE);

        let doc = store.load().unwrap();
        assert_eq!(doc.loggers["logics.light"].level.as_deref(), Some("DEBUG"));
        assert_eq!(doc.shng_version.as_deref(), Some("1.10.0"));
    }
}
