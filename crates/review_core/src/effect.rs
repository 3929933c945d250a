use crate::{FetchTag, RatingStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the text for one pane. `category` is `human` or a machine source.
    FetchPane { tag: FetchTag, category: String },
    /// Overwrite the persisted snapshot with the full store.
    PersistRatings { snapshot: RatingStore },
    /// Offer the store to the user as a downloadable file.
    ExportRatings { snapshot: RatingStore },
}
