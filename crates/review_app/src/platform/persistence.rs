use review_core::{RatingStore, VideoId};
use review_engine::{PersistError, SnapshotSlot};
use review_logging::{review_error, review_info};

/// Reads the persisted snapshot, reconciles it with the working set and
/// writes the result back before anything is shown.
///
/// A snapshot that exists but cannot be read aborts the load; it is never
/// overwritten.
pub(crate) fn load_ratings(
    slot: &dyn SnapshotSlot,
    working_set: &[VideoId],
) -> Result<RatingStore, PersistError> {
    let persisted = slot.read()?;
    let ratings = RatingStore::load(persisted.as_deref(), working_set);
    save_ratings(slot, &ratings)?;
    review_info!(
        "Loaded {} ratings ({} in working set)",
        ratings.len(),
        working_set.len()
    );
    Ok(ratings)
}

/// Full-snapshot write; returns once the slot holds `ratings`.
pub(crate) fn save_ratings(
    slot: &dyn SnapshotSlot,
    ratings: &RatingStore,
) -> Result<(), PersistError> {
    let content = ratings.to_snapshot_json().map_err(|err| {
        review_error!("Failed to serialize ratings: {}", err);
        PersistError::Io(std::io::Error::other(err))
    })?;
    slot.write(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::Rating;
    use std::cell::RefCell;
    use std::path::PathBuf;

    use review_engine::{FileSnapshotSlot, MemorySnapshotSlot};

    /// Slot whose stored value exists but fails to read.
    #[derive(Default)]
    struct UnreadableSlot {
        writes: RefCell<Vec<String>>,
    }

    impl SnapshotSlot for UnreadableSlot {
        fn read(&self) -> Result<Option<String>, PersistError> {
            Err(PersistError::Read {
                path: PathBuf::from("ratings.json"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn write(&self, contents: &str) -> Result<(), PersistError> {
            self.writes.borrow_mut().push(contents.to_string());
            Ok(())
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn reconciled_store_is_written_back_immediately() {
        let slot = MemorySnapshotSlot::with_value(r#"{"5":"H"}"#);
        let ratings = load_ratings(&slot, &ids(&["5", "6"])).unwrap();

        assert_eq!(ratings.get("6"), Rating::Unrated);
        assert_eq!(slot.read().unwrap().as_deref(), Some(r#"{"5":"H","6":"-"}"#));
    }

    #[test]
    fn loading_twice_changes_nothing() {
        let slot = MemorySnapshotSlot::with_value(r#"{"1":"M","9":"H"}"#);
        let working_set = ids(&["1", "2"]);
        let first = load_ratings(&slot, &working_set).unwrap();
        let written = slot.read().unwrap();
        let second = load_ratings(&slot, &working_set).unwrap();

        assert_eq!(first, second);
        assert_eq!(slot.read().unwrap(), written);
        assert_eq!(second.get("9"), Rating::HumanPreferred);
    }

    #[test]
    fn garbage_snapshot_is_replaced() {
        let slot = MemorySnapshotSlot::with_value("not json");
        let ratings = load_ratings(&slot, &ids(&["1"])).unwrap();
        assert_eq!(ratings.get("1"), Rating::Unrated);
        assert_eq!(slot.read().unwrap().as_deref(), Some(r#"{"1":"-"}"#));
    }

    #[test]
    fn unreadable_snapshot_aborts_without_writing() {
        let slot = UnreadableSlot::default();
        let err = load_ratings(&slot, &ids(&["1"])).unwrap_err();

        assert!(matches!(err, PersistError::Read { .. }));
        assert!(slot.writes.borrow().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn looping_snapshot_link_is_left_alone() {
        let temp = tempfile::TempDir::new().unwrap();
        let slot = FileSnapshotSlot::in_dir(temp.path());
        std::os::unix::fs::symlink(slot.path(), slot.path()).unwrap();

        assert!(load_ratings(&slot, &ids(&["1"])).is_err());
        let link = std::fs::symlink_metadata(slot.path()).unwrap();
        assert!(link.file_type().is_symlink());
    }
}
