use std::path::{Path, PathBuf};

use review_core::{export_snapshot, RatingStore};
use review_logging::review_info;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub entries: usize,
    pub path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to serialize ratings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Writes the pretty-printed rating mapping to `{dir}/{filename}`.
pub fn export_ratings(
    dir: &Path,
    filename: &str,
    ratings: &RatingStore,
) -> Result<ExportSummary, ExportError> {
    let contents = export_snapshot(ratings)?;
    let path = AtomicFileWriter::new(dir.to_path_buf()).write(filename, &contents)?;
    review_info!("Exported {} ratings to {:?}", ratings.len(), path);
    Ok(ExportSummary {
        entries: ratings.len(),
        path,
    })
}
