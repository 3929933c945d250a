use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;

/// Video identifiers are opaque digit strings ("9", "10", ...).
pub type VideoId = String;

/// Catalog description: which identifiers have human and machine transcripts.
///
/// Both fields are optional in the JSON; a missing field is an empty list.
/// Machine sources keep the order they appear in the document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub human: Vec<VideoId>,
    #[serde(default)]
    pub machine: IndexMap<String, Vec<VideoId>>,
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Machine source names in manifest order.
    pub fn sources(&self) -> Vec<String> {
        self.machine.keys().cloned().collect()
    }
}

/// Union of every identifier the manifest mentions, deduplicated and sorted
/// by numeric value.
pub fn working_set(manifest: &Manifest) -> Vec<VideoId> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for id in manifest
        .human
        .iter()
        .chain(manifest.machine.values().flatten())
    {
        if seen.insert(id.as_str()) {
            ids.push(id.clone());
        }
    }
    ids.sort_by(|a, b| compare_ids(a, b));
    ids
}

/// Orders identifiers by numeric value without parsing into a fixed-width
/// integer, so arbitrarily long digit strings still compare correctly.
///
/// Equal values spelled differently ("7" and "07") fall back to string order.
/// Identifiers that are not pure digit strings sort after all numeric ones.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (numeric_digits(a), numeric_digits(b)) {
        (Some(x), Some(y)) => x
            .len()
            .cmp(&y.len())
            .then_with(|| x.cmp(y))
            .then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn numeric_digits(id: &str) -> Option<&str> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let trimmed = id.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0" } else { trimmed })
}
