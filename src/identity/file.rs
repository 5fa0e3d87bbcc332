//! File-backed key-value storage.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, warn};

use super::{IdentityStoreError, KeyValueStore};

type Document = BTreeMap<String, String>;

/// A JSON object of strings in a single file.
///
/// Writes replace the whole document through a sibling temporary file, so a
/// crash mid-write leaves either the old or the new document. Last write wins
/// between processes.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// A store backed by the JSON document at `path`, created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document, IdentityStoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(error) => Err(error.into()),
        }
    }

    /// The document to rewrite, and whether a corrupt one was discarded.
    fn load_for_write(&self) -> Result<(Document, bool), IdentityStoreError> {
        match self.load() {
            Ok(document) => Ok((document, false)),
            Err(IdentityStoreError::Corrupt(error)) => {
                warn!(path = %self.path.display(), "discarding corrupt session document: {error}");

                Ok((Document::new(), true))
            }
            Err(error) => Err(error),
        }
    }

    fn save(&self, document: &Document) -> Result<(), IdentityStoreError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("tmp");

        fs::write(&staging, serde_json::to_vec_pretty(document)?)?;
        fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), "session document saved");

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, IdentityStoreError> {
        let _guard = self.lock.lock()?;

        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), IdentityStoreError> {
        let _guard = self.lock.lock()?;

        let (mut document, _) = self.load_for_write()?;
        document.insert(key.to_string(), value.to_string());

        self.save(&document)
    }

    fn remove(&self, key: &str) -> Result<(), IdentityStoreError> {
        let _guard = self.lock.lock()?;

        let (mut document, discarded) = self.load_for_write()?;

        if document.remove(key).is_none() && !discarded {
            return Ok(());
        }

        self.save(&document)
    }
}
