use review_logging::{review_debug, review_info};

use crate::view_model::{list_rows, AppViewModel};
use crate::{
    next_unrated_from, pane_text, Effect, FetchOutcome, FetchTag, Pane, PaneState, Rating,
    RatingStore, VideoId,
};

pub const DEFAULT_LINK_BASE: &str = "https://bandmaid.tokyo/movies/";

const HUMAN_CATEGORY: &str = "human";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_text: String,
    pub unrated_only: bool,
}

/// Transient message shown until the next user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoUnratedRemaining,
    UnknownIdentifier(String),
    UnknownSource(String),
}

/// Destructive actions waiting for a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    ResetRatings,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct PaneSlot {
    latest: Option<FetchTag>,
    state: PaneState,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    working_set: Vec<VideoId>,
    sources: Vec<String>,
    link_base: String,
    ratings: RatingStore,
    current: Option<VideoId>,
    source: Option<String>,
    filter: FilterState,
    human: PaneSlot,
    machine: PaneSlot,
    next_generation: u64,
    notice: Option<Notice>,
    pending_confirmation: Option<Confirmation>,
    dirty: bool,
}

impl AppState {
    /// Builds the session state from an already reconciled store.
    ///
    /// The first source, if any, becomes the current machine source.
    pub fn new(working_set: Vec<VideoId>, sources: Vec<String>, ratings: RatingStore) -> Self {
        let source = sources.first().cloned();
        Self {
            working_set,
            sources,
            link_base: DEFAULT_LINK_BASE.to_string(),
            ratings,
            source,
            dirty: true,
            ..Self::default()
        }
    }

    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into();
        self
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            rows: list_rows(
                &self.working_set,
                &self.ratings,
                &self.filter,
                self.current.as_deref(),
            ),
            current: self.current.clone(),
            link: self.current.as_deref().map(|id| self.link_for(id)),
            source: self.source.clone(),
            sources: self.sources.clone(),
            human_pane: self.human.state.clone(),
            machine_pane: self.machine.state.clone(),
            rating: self.current.as_deref().map(|id| self.ratings.get(id)),
            filter: self.filter.clone(),
            notice: self.notice.clone(),
            pending_confirmation: self.pending_confirmation,
            progress: self.ratings.progress(&self.working_set),
            dirty: self.dirty,
        }
    }

    pub fn working_set(&self) -> &[VideoId] {
        &self.working_set
    }

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn pending_confirmation(&self) -> Option<Confirmation> {
        self.pending_confirmation
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Canonical external page for an identifier.
    pub fn link_for(&self, id: &str) -> String {
        format!("{}{}", self.link_base, id)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn cancel_confirmation(&mut self) {
        if self.pending_confirmation.take().is_some() {
            review_debug!("Pending confirmation cancelled by another action");
            self.mark_dirty();
        }
    }

    pub(crate) fn request_confirmation(&mut self, confirmation: Confirmation) {
        self.pending_confirmation = Some(confirmation);
        self.mark_dirty();
    }

    /// Selects `id` and issues both pane fetches.
    pub(crate) fn select(&mut self, id: VideoId) -> Vec<Effect> {
        if !self.working_set.contains(&id) {
            self.set_notice(Notice::UnknownIdentifier(id));
            return Vec::new();
        }
        review_debug!("Selecting {}", id);
        self.current = Some(id);
        self.mark_dirty();

        let mut effects = Vec::with_capacity(2);
        effects.extend(self.issue_fetch(Pane::Human));
        effects.extend(self.issue_fetch(Pane::Machine));
        effects
    }

    pub(crate) fn change_source(&mut self, source: String) -> Vec<Effect> {
        if !self.sources.contains(&source) {
            self.set_notice(Notice::UnknownSource(source));
            return Vec::new();
        }
        if self.source.as_deref() == Some(source.as_str()) {
            return Vec::new();
        }
        review_debug!("Machine source changed to {}", source);
        self.source = Some(source);
        self.mark_dirty();
        self.issue_fetch(Pane::Machine).into_iter().collect()
    }

    /// Applies a settled fetch if it answers the latest request for its pane.
    pub(crate) fn apply_pane_result(&mut self, tag: FetchTag, outcome: FetchOutcome) {
        let slot = self.slot_mut(tag.pane);
        if slot.latest.as_ref() != Some(&tag) {
            review_debug!(
                "Discarding stale {:?} text for {} (generation {})",
                tag.pane,
                tag.id,
                tag.generation
            );
            return;
        }
        if let FetchOutcome::TransportError(message) = &outcome {
            review_debug!("{:?} text for {} failed: {}", tag.pane, tag.id, message);
        }
        slot.latest = None;
        slot.state = PaneState::Ready(pane_text(&outcome).to_string());
        self.mark_dirty();
    }

    pub(crate) fn choose_rating(&mut self, literal: &str) -> Vec<Effect> {
        let Some(id) = self.current.clone() else {
            return Vec::new();
        };
        if Rating::from_literal(literal).is_none() {
            review_debug!("Ignoring invalid rating value {:?}", literal);
            return Vec::new();
        }
        if self.ratings.set(&id, literal) {
            self.mark_dirty();
            vec![self.persist_effect()]
        } else {
            Vec::new()
        }
    }

    pub(crate) fn set_search(&mut self, text: String) {
        if self.filter.search_text != text {
            self.filter.search_text = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_unrated_only(&mut self, unrated_only: bool) {
        if self.filter.unrated_only != unrated_only {
            self.filter.unrated_only = unrated_only;
            self.mark_dirty();
        }
    }

    pub(crate) fn jump_to_next_unrated(&mut self) -> Vec<Effect> {
        let Some(current) = self.current.as_deref() else {
            return Vec::new();
        };
        match next_unrated_from(current, &self.working_set, &self.ratings).cloned() {
            Some(next) => self.select(next),
            None => {
                review_info!("No unrated videos remaining");
                self.set_notice(Notice::NoUnratedRemaining);
                Vec::new()
            }
        }
    }

    pub(crate) fn answer_confirmation(&mut self, confirmed: bool) -> Vec<Effect> {
        let Some(confirmation) = self.pending_confirmation.take() else {
            return Vec::new();
        };
        self.mark_dirty();
        if !confirmed {
            return Vec::new();
        }
        match confirmation {
            Confirmation::ResetRatings => {
                review_info!("Resetting {} ratings to unrated", self.working_set.len());
                self.ratings.reset_all(&self.working_set);
                vec![self.persist_effect()]
            }
        }
    }

    pub(crate) fn persist_effect(&self) -> Effect {
        Effect::PersistRatings {
            snapshot: self.ratings.clone(),
        }
    }

    fn issue_fetch(&mut self, pane: Pane) -> Option<Effect> {
        let id = self.current.clone()?;
        let category = match pane {
            Pane::Human => Some(HUMAN_CATEGORY.to_string()),
            Pane::Machine => self.source.clone(),
        };
        let Some(category) = category else {
            // No machine sources in the manifest: nothing to fetch.
            let slot = self.slot_mut(pane);
            slot.latest = None;
            slot.state = PaneState::Ready(crate::PLACEHOLDER_TEXT.to_string());
            return None;
        };

        self.next_generation += 1;
        let tag = FetchTag {
            pane,
            id,
            generation: self.next_generation,
        };
        let slot = self.slot_mut(pane);
        slot.latest = Some(tag.clone());
        slot.state = PaneState::Loading;
        Some(Effect::FetchPane { tag, category })
    }

    fn slot_mut(&mut self, pane: Pane) -> &mut PaneSlot {
        match pane {
            Pane::Human => &mut self.human,
            Pane::Machine => &mut self.machine,
        }
    }
}
