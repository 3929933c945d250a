use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Failures writing the rating snapshot or an export, or reading the snapshot back.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("directory missing or not writable: {0}")]
    Dir(String),
    #[error("cannot read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Makes sure the state or export directory exists and accepts new files.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    let dir_error = |err: io::Error| PersistError::Dir(format!("{}: {err}", dir.display()));
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(PersistError::Dir(format!(
                "{} is not a directory",
                dir.display()
            )))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(dir_error)?;
        }
        Err(err) => return Err(dir_error(err)),
    }
    NamedTempFile::new_in(dir).map_err(dir_error)?;
    Ok(())
}

/// Writes whole files in one directory so readers see either the previous
/// content or the new one.
///
/// Used for the rating snapshot after every change and for `ratings.json`
/// exports.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Replaces `{dir}/{filename}` with `content`, synced before the rename.
    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_dir(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content)?;
        staged.as_file().sync_all()?;

        let target = self.dir.join(filename);
        staged
            .persist(&target)
            .map_err(|err| PersistError::Io(err.error))?;
        Ok(target)
    }
}
