//! Review engine: IO for the review tool.
//!
//! Fetches the manifest and pane texts from a content root, runs pane fetches
//! on a background runtime, and persists ratings to disk.
mod decode;
mod engine;
mod export;
mod fetch;
mod manifest;
mod persist;
mod root;
mod slot;
mod types;

pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::{pane_outcome, EngineHandle};
pub use export::{export_ratings, ExportError, ExportSummary};
pub use fetch::{fetcher_for, DirectoryFetcher, FetchSettings, Fetcher, ReqwestFetcher};
pub use manifest::{load_manifest, ManifestError};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use root::{ContentRoot, Resource};
pub use slot::{FileSnapshotSlot, MemorySnapshotSlot, SnapshotSlot};
pub use types::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};
