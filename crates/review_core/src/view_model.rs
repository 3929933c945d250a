use crate::{
    Confirmation, FilterState, Notice, PaneState, Rating, RatingProgress, RatingStore, VideoId,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub rows: Vec<ListRow>,
    pub current: Option<VideoId>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub sources: Vec<String>,
    pub human_pane: PaneState,
    pub machine_pane: PaneState,
    /// Rating control value; `None` while nothing is selected.
    pub rating: Option<Rating>,
    pub filter: FilterState,
    pub notice: Option<Notice>,
    pub pending_confirmation: Option<Confirmation>,
    pub progress: RatingProgress,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: VideoId,
    pub label: String,
    pub is_selected: bool,
}

/// Filtered, labelled list of the working set, rebuilt from scratch.
pub fn list_rows(
    working_set: &[VideoId],
    ratings: &RatingStore,
    filter: &FilterState,
    current: Option<&str>,
) -> Vec<ListRow> {
    let needle = filter.search_text.trim().to_lowercase();
    working_set
        .iter()
        .filter_map(|id| {
            let rating = ratings.get(id);
            if filter.unrated_only && rating != Rating::Unrated {
                return None;
            }
            if !needle.is_empty() && !id.to_lowercase().contains(&needle) {
                return None;
            }
            Some(ListRow {
                id: id.clone(),
                label: format!("{} [{}]", id, rating.literal()),
                is_selected: current == Some(id.as_str()),
            })
        })
        .collect()
}
