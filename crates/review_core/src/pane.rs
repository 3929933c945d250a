use crate::VideoId;

/// Text shown in a pane whose resource is missing or failed to load.
pub const PLACEHOLDER_TEXT: &str = "No translation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Human,
    Machine,
}

/// Identifies one issued pane fetch.
///
/// `generation` increases with every fetch the state machine issues, so a
/// result is only applied when it answers the latest request for its pane.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTag {
    pub pane: Pane,
    pub id: VideoId,
    pub generation: u64,
}

/// How a pane text request settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Text(String),
    NotFound,
    TransportError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaneState {
    /// Nothing selected yet.
    #[default]
    Empty,
    Loading,
    Ready(String),
}

/// Text to display for a settled fetch.
pub fn pane_text(outcome: &FetchOutcome) -> &str {
    match outcome {
        FetchOutcome::Text(text) => text,
        FetchOutcome::NotFound | FetchOutcome::TransportError(_) => PLACEHOLDER_TEXT,
    }
}
