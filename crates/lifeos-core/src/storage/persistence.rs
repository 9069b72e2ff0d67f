//! State document persistence
//!
//! Serializes the root document to a single JSON file and restores it on
//! startup. Uses atomic writes (write to temp file, then rename) to
//! prevent corruption.
//!
//! Storage location: `~/.local/share/lifeos/life-os.json` (configurable
//! via `Config`).
//!
//! The persisted envelope carries a numeric schema version separate from
//! the document's own semantic `version` string. Migration is
//! all-or-nothing: an envelope at version 0 (absent or legacy) discards
//! the stored payload and reseeds the default document. There is no
//! partial-field migration.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::document::AppDocument;
use crate::ids::IdGenerator;
use crate::storage::error::{StorageError, StorageResult};

/// Current persistence envelope version
pub const ENVELOPE_VERSION: u32 = 1;

/// On-disk envelope wrapping the state document
///
/// The payload is held as a raw value so a stale envelope can be
/// discarded without requiring it to match the current document shape.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    state: serde_json::Value,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a AppDocument,
}

/// Persistence layer for the state document
///
/// Provides atomic file operations for saving/loading the document.
pub struct JsonPersistence {
    config: Config,
}

impl JsonPersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a state document exists on disk
    pub fn exists(&self) -> bool {
        self.config.state_path().exists()
    }

    /// Save the document to disk using atomic write
    ///
    /// This writes to a temporary file first, then renames it to the
    /// target path, so the file is never left partially written.
    pub fn save(&self, doc: &AppDocument) -> StorageResult<()> {
        let envelope = EnvelopeRef {
            version: ENVELOPE_VERSION,
            state: doc,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)?;

        let target_path = self.config.state_path();
        atomic_write(&target_path, &bytes)?;
        debug!(path = %target_path.display(), "saved state document");
        Ok(())
    }

    /// Load the document from disk
    ///
    /// Returns `None` when no usable document is stored:
    /// - the file doesn't exist
    /// - the envelope version is 0 (legacy) or otherwise stale, in which
    ///   case the payload is discarded
    /// - the file can't be parsed, in which case it is backed up first
    ///
    /// Callers are expected to reseed the default document on `None`.
    pub fn load(&self) -> StorageResult<Option<AppDocument>> {
        let path = self.config.state_path();

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|e| StorageError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let envelope: Envelope = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(err) => {
                self.backup_corrupt(&path, &err.to_string());
                return Ok(None);
            }
        };

        if envelope.version != ENVELOPE_VERSION {
            warn!(
                found = envelope.version,
                current = ENVELOPE_VERSION,
                "stale envelope version, discarding stored document"
            );
            return Ok(None);
        }

        match serde_json::from_value(envelope.state) {
            Ok(doc) => Ok(Some(doc)),
            Err(err) => {
                self.backup_corrupt(&path, &err.to_string());
                Ok(None)
            }
        }
    }

    /// Load the stored document or seed and save the default one
    pub fn load_or_seed(&self, ids: &dyn IdGenerator) -> StorageResult<AppDocument> {
        if let Some(doc) = self.load()? {
            return Ok(doc);
        }

        let doc = AppDocument::seeded(ids);
        self.save(&doc)?;
        info!("seeded default state document");
        Ok(doc)
    }

    /// Delete the stored state document
    ///
    /// Use with caution!
    pub fn delete_all(&self) -> StorageResult<()> {
        let path = self.config.state_path();
        if path.exists() {
            fs::remove_file(&path).map_err(|e| StorageError::from_io(e, path))?;
        }
        Ok(())
    }

    /// Preserve an unreadable state file before it gets replaced
    fn backup_corrupt(&self, path: &Path, details: &str) {
        let backup_path = path.with_extension("json.corrupt.backup");
        match fs::copy(path, &backup_path) {
            Ok(_) => warn!(
                path = %path.display(),
                backup = %backup_path.display(),
                details,
                "state document is corrupt, backed up and discarding"
            ),
            Err(err) => warn!(
                path = %path.display(),
                details,
                %err,
                "state document is corrupt and could not be backed up"
            ),
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Atomic rename
    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::models::QuestDraft;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));
        let ids = SequentialIds::new("id");

        // Initially no document
        assert!(!persistence.exists());
        assert!(persistence.load().unwrap().is_none());

        // Seed and add a quest
        let mut doc = AppDocument::seeded(&ids);
        let draft = QuestDraft {
            title: "Write docs".to_string(),
            description: String::new(),
            category: "1".to_string(),
            xp: 100,
            due_date: None,
            milestone_id: None,
            timeblocks: None,
        };
        doc.quests.push(draft.into_quest(ids.generate()));

        persistence.save(&doc).unwrap();
        assert!(persistence.exists());

        // Load and verify
        let loaded = persistence.load().unwrap().unwrap();
        assert_eq!(loaded, doc);
        assert_eq!(loaded.quests[0].title, "Write docs");
    }

    #[test]
    fn test_load_or_seed_new() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));
        let ids = SequentialIds::new("board");

        let doc = persistence.load_or_seed(&ids).unwrap();
        assert!(persistence.exists());
        assert_eq!(doc.categories.len(), 3);

        // Second call returns the stored document, not a fresh seed
        let again = persistence.load_or_seed(&ids).unwrap();
        assert_eq!(again, doc);
    }

    #[test]
    fn test_version_zero_resets_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));
        let ids = SequentialIds::new("board");

        // Whatever payload is stored alongside version 0 is discarded
        let legacy = serde_json::json!({
            "version": 0,
            "state": {
                "user": { "level": 42 },
                "quests": [{ "id": "old", "title": "legacy quest" }]
            }
        });
        fs::write(
            persistence.config().state_path(),
            serde_json::to_vec(&legacy).unwrap(),
        )
        .unwrap();

        assert!(persistence.load().unwrap().is_none());

        let doc = persistence.load_or_seed(&ids).unwrap();
        assert_eq!(doc.user.level, 1);
        assert!(doc.quests.is_empty());
        assert_eq!(doc.categories.len(), 3);
        assert_eq!(doc.kanban_boards.len(), 3);
        for board in &doc.kanban_boards {
            assert_eq!(board.columns.len(), 4);
            assert!(board.columns.iter().all(|c| c.items.is_empty()));
        }
    }

    #[test]
    fn test_missing_version_treated_as_legacy() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));

        fs::write(
            persistence.config().state_path(),
            br#"{ "state": { "anything": true } }"#,
        )
        .unwrap();

        assert!(persistence.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_backed_up_and_reset() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));
        let ids = SequentialIds::new("board");

        let path = persistence.config().state_path();
        fs::write(&path, b"not json at all {{{").unwrap();

        let doc = persistence.load_or_seed(&ids).unwrap();
        assert_eq!(doc.user.total_xp, 0);

        // Original bytes survive in the backup
        let backup = path.with_extension("json.corrupt.backup");
        assert!(backup.exists());
        assert_eq!(fs::read(&backup).unwrap(), b"not json at all {{{");
    }

    #[test]
    fn test_envelope_version_written() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));
        let ids = SequentialIds::new("board");

        let doc = AppDocument::seeded(&ids);
        persistence.save(&doc).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(persistence.config().state_path()).unwrap()).unwrap();
        assert_eq!(raw["version"], ENVELOPE_VERSION);
        assert_eq!(raw["state"]["version"], "1.0.0");
    }

    #[test]
    fn test_delete_all() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));
        let ids = SequentialIds::new("board");

        persistence.load_or_seed(&ids).unwrap();
        assert!(persistence.exists());

        persistence.delete_all().unwrap();
        assert!(!persistence.exists());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.txt");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
    }
}
