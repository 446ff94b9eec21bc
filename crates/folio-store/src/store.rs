use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};
use crate::record::{SessionRecord, SessionSummary};

/// A directory of session records, one JSON file per session id.
///
/// The id is the record's sole key. Saves replace the whole file through a
/// temp-file rename so a concurrent reader never observes a partial record.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open (creating if needed) the store at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the full record for `id`, overwriting any prior record.
    pub fn save(&self, id: &str, record: &SessionRecord) -> Result<()> {
        let path = self.record_path(id)?;
        let tmp = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(record)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Load the record for `id`, or `None` if it does not exist.
    pub fn load(&self, id: &str) -> Result<Option<SessionRecord>> {
        let path = self.record_path(id)?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Enumerate all records, most recent first. Files that fail to parse
    /// are logged and skipped, never fatal.
    pub fn list(&self) -> Result<Vec<SessionSummary>> {
        let mut sessions = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let record = fs::read_to_string(&path)
                .map_err(Error::from)
                .and_then(|raw| Ok(serde_json::from_str::<SessionRecord>(&raw)?));
            match record {
                Ok(record) => sessions.push(SessionSummary {
                    id: id.to_string(),
                    preview: record.title.clone(),
                    title: record.title,
                    timestamp: record.timestamp,
                }),
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "skipping unreadable session file");
                }
            }
        }

        sessions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(sessions)
    }

    /// Remove the record for `id`. A missing record is not an error.
    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.record_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Session ids come from `uuid`, but ids read back from user input pass
    /// through here too — refuse anything that could escape the directory.
    fn record_path(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::InvalidSessionId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use folio_llm::Turn;

    use super::SessionStore;
    use crate::record::SessionRecord;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::open(dir.path().join("sessions")).expect("open");
        (dir, store)
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = store();

        let mut record = SessionRecord::default();
        record.title = "What is the method?".into();
        record.turns = vec![
            Turn::user("What is the method?"),
            Turn::assistant("Gradient descent."),
        ];
        record.summary = Some("S".into());

        store.save("a1", &record).unwrap();
        let loaded = store.load("a1").unwrap().expect("record");
        assert_eq!(loaded.title, record.title);
        assert_eq!(loaded.turns, record.turns);
        assert_eq!(loaded.summary, record.summary);
        assert_eq!(loaded.instructions, record.instructions);
    }

    #[test]
    fn load_missing_is_none() {
        let (_dir, store) = store();
        assert!(store.load("nope").unwrap().is_none());
    }

    #[test]
    fn list_skips_corrupt_files_and_sorts_descending() {
        let (_dir, store) = store();

        let mut older = SessionRecord::default();
        older.timestamp = Utc::now() - Duration::hours(2);
        older.title = "older".into();
        store.save("older", &older).unwrap();

        let mut newer = SessionRecord::default();
        newer.title = "newer".into();
        store.save("newer", &newer).unwrap();

        std::fs::write(store.dir().join("corrupt.json"), "{not json").unwrap();
        std::fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let sessions = store.list().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "newer");
        assert_eq!(sessions[1].id, "older");
        assert_eq!(sessions[0].preview, "newer");
    }

    #[test]
    fn delete_is_idempotent() {
        let (_dir, store) = store();

        store.save("gone", &SessionRecord::default()).unwrap();
        store.delete("gone").unwrap();
        assert!(store.load("gone").unwrap().is_none());

        // Never existed: still fine.
        store.delete("gone").unwrap();
        store.delete("never-was").unwrap();
    }

    #[test]
    fn hostile_ids_are_rejected() {
        let (_dir, store) = store();
        assert!(store.load("../escape").is_err());
        assert!(store.save("", &SessionRecord::default()).is_err());
    }
}
