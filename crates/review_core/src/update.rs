use crate::{AppState, Confirmation, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    // Notices last until the next action; fetch completions are not actions.
    let user_action = !matches!(msg, Msg::NoOp | Msg::PaneLoaded { .. });
    if user_action {
        state.clear_notice();
        if !matches!(msg, Msg::ConfirmationAnswered(_)) {
            state.cancel_confirmation();
        }
    }

    let effects = match msg {
        Msg::Select(id) => state.select(id),
        Msg::SourceChanged(source) => state.change_source(source),
        Msg::PaneLoaded { tag, outcome } => {
            state.apply_pane_result(tag, outcome);
            Vec::new()
        }
        Msg::RatingChosen(literal) => state.choose_rating(&literal),
        Msg::SearchChanged(text) => {
            state.set_search(text);
            Vec::new()
        }
        Msg::UnratedOnlyToggled(unrated_only) => {
            state.set_unrated_only(unrated_only);
            Vec::new()
        }
        Msg::NextUnrated => state.jump_to_next_unrated(),
        Msg::ExportRequested => vec![Effect::ExportRatings {
            snapshot: state.ratings().clone(),
        }],
        Msg::ResetRequested => {
            state.request_confirmation(Confirmation::ResetRatings);
            Vec::new()
        }
        Msg::ConfirmationAnswered(confirmed) => state.answer_confirmation(confirmed),
        Msg::NoticeDismissed | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
