use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use review_logging::{review_debug, review_error, review_warn};

use crate::{AtomicFileWriter, PersistError};

/// Single key-value slot holding the serialized rating snapshot.
///
/// `write` replaces the whole value and returns only once it is durable.
pub trait SnapshotSlot {
    /// Current value; `Ok(None)` when nothing usable has been stored.
    ///
    /// A value that exists but cannot be read is an error, never `None`:
    /// callers overwrite the slot after an empty read.
    fn read(&self) -> Result<Option<String>, PersistError>;
    fn write(&self, contents: &str) -> Result<(), PersistError>;
}

/// Snapshot stored as one file, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileSnapshotSlot {
    dir: PathBuf,
    filename: String,
}

impl FileSnapshotSlot {
    pub const DEFAULT_FILENAME: &'static str = ".review_ratings.json";

    pub fn new(dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
        }
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, Self::DEFAULT_FILENAME)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

impl SnapshotSlot for FileSnapshotSlot {
    fn read(&self) -> Result<Option<String>, PersistError> {
        let path = self.path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                review_error!("Failed to read rating snapshot from {:?}: {}", path, source);
                return Err(PersistError::Read { path, source });
            }
        };
        review_debug!("Read rating snapshot from {:?}", path);
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Some(text)),
            // Not UTF-8 means not JSON either: same as an unparsable snapshot.
            Err(err) => {
                review_warn!("Ignoring rating snapshot {:?}, not UTF-8: {}", path, err);
                Ok(None)
            }
        }
    }

    fn write(&self, contents: &str) -> Result<(), PersistError> {
        AtomicFileWriter::new(self.dir.clone()).write(&self.filename, contents.as_bytes())?;
        Ok(())
    }
}

/// In-memory slot. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotSlot {
    value: Arc<Mutex<Option<String>>>,
}

impl MemorySnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(contents: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }
}

impl SnapshotSlot for MemorySnapshotSlot {
    fn read(&self) -> Result<Option<String>, PersistError> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn write(&self, contents: &str) -> Result<(), PersistError> {
        *self
            .value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(contents.to_string());
        Ok(())
    }
}

impl<T: SnapshotSlot + ?Sized> SnapshotSlot for Box<T> {
    fn read(&self) -> Result<Option<String>, PersistError> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<(), PersistError> {
        (**self).write(contents)
    }
}
