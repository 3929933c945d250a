use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use review_logging::{review_debug, review_warn};
use serde::{Deserialize, Serialize};

use crate::{compare_ids, VideoId};

/// Per-video verdict. Serialized as the literals `-`, `H` and `M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rating {
    #[default]
    #[serde(rename = "-")]
    Unrated,
    #[serde(rename = "H")]
    HumanPreferred,
    #[serde(rename = "M")]
    MachinePreferred,
}

impl Rating {
    pub const ALL: [Rating; 3] = [
        Rating::Unrated,
        Rating::HumanPreferred,
        Rating::MachinePreferred,
    ];

    pub fn literal(self) -> &'static str {
        match self {
            Rating::Unrated => "-",
            Rating::HumanPreferred => "H",
            Rating::MachinePreferred => "M",
        }
    }

    /// Exact match on the external literal; anything else is `None`.
    pub fn from_literal(literal: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.literal() == literal)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RatingProgress {
    pub total: usize,
    pub rated: usize,
    pub human: usize,
    pub machine: usize,
}

/// Identifier to rating mapping, reconciled against the working set.
///
/// Entries for identifiers no longer in the working set are kept so a later
/// manifest that brings them back finds their old ratings. They are never
/// listed and never touched by [`RatingStore::reset_all`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RatingStore {
    ratings: BTreeMap<VideoId, Rating>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a persisted snapshot with the working set.
    ///
    /// A missing or unreadable snapshot counts as empty. Every working-set
    /// identifier without an entry is added as unrated. The caller is
    /// expected to persist the result before rendering anything.
    pub fn load(persisted: Option<&str>, working_set: &[VideoId]) -> Self {
        let mut store = persisted.map(parse_snapshot).unwrap_or_default();
        let mut added = 0usize;
        for id in working_set {
            if !store.ratings.contains_key(id) {
                store.ratings.insert(id.clone(), Rating::Unrated);
                added += 1;
            }
        }
        review_debug!(
            "Reconciled rating store: {} entries, {} added as unrated",
            store.ratings.len(),
            added
        );
        store
    }

    pub fn get(&self, id: &str) -> Rating {
        self.ratings.get(id).copied().unwrap_or_default()
    }

    /// Set from an external literal. Unknown literals are ignored.
    ///
    /// Returns true when the stored value changed.
    pub fn set(&mut self, id: &str, literal: &str) -> bool {
        match Rating::from_literal(literal) {
            Some(rating) => self.set_rating(id, rating),
            None => false,
        }
    }

    pub fn set_rating(&mut self, id: &str, rating: Rating) -> bool {
        let previous = self.ratings.insert(id.to_string(), rating);
        previous != Some(rating)
    }

    pub fn reset_all(&mut self, working_set: &[VideoId]) {
        for id in working_set {
            self.ratings.insert(id.clone(), Rating::Unrated);
        }
    }

    pub fn entries(&self) -> &BTreeMap<VideoId, Rating> {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn progress(&self, working_set: &[VideoId]) -> RatingProgress {
        let mut progress = RatingProgress {
            total: working_set.len(),
            ..RatingProgress::default()
        };
        for id in working_set {
            match self.get(id) {
                Rating::Unrated => {}
                Rating::HumanPreferred => {
                    progress.rated += 1;
                    progress.human += 1;
                }
                Rating::MachinePreferred => {
                    progress.rated += 1;
                    progress.machine += 1;
                }
            }
        }
        progress
    }

    /// Compact JSON written to the persistent slot after every mutation.
    pub fn to_snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.ratings)
    }
}

/// Pretty-printed copy of the whole mapping for download, keys in
/// identifier order.
pub fn export_snapshot(store: &RatingStore) -> Result<Vec<u8>, serde_json::Error> {
    let mut ordered: Vec<(&VideoId, &Rating)> = store.ratings.iter().collect();
    ordered.sort_by(|a, b| compare_ids(a.0, b.0));
    let ordered: IndexMap<&VideoId, &Rating> = ordered.into_iter().collect();
    serde_json::to_vec_pretty(&ordered)
}

fn parse_snapshot(text: &str) -> RatingStore {
    let raw: BTreeMap<String, serde_json::Value> = match serde_json::from_str(text) {
        Ok(raw) => raw,
        Err(err) => {
            review_warn!("Ignoring unreadable rating snapshot: {}", err);
            return RatingStore::default();
        }
    };

    let mut ratings = BTreeMap::new();
    for (id, value) in raw {
        match value.as_str().and_then(Rating::from_literal) {
            Some(rating) => {
                ratings.insert(id, rating);
            }
            None => review_warn!("Dropping invalid rating {} for {}", value, id),
        }
    }
    RatingStore { ratings }
}
