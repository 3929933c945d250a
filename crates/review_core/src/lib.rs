//! Review core: pure state machine, rating store and view-model helpers.
mod catalog;
mod effect;
mod msg;
mod navigation;
mod pane;
mod ratings;
mod state;
mod update;
mod view_model;

pub use catalog::{compare_ids, working_set, Manifest, VideoId};
pub use effect::Effect;
pub use msg::Msg;
pub use navigation::next_unrated_from;
pub use pane::{pane_text, FetchOutcome, FetchTag, Pane, PaneState, PLACEHOLDER_TEXT};
pub use ratings::{export_snapshot, Rating, RatingProgress, RatingStore};
pub use state::{AppState, Confirmation, FilterState, Notice, DEFAULT_LINK_BASE};
pub use update::update;
pub use view_model::{list_rows, AppViewModel, ListRow};
