use std::sync::Once;

use review_core::{
    update, AppState, Effect, FetchOutcome, FetchTag, Msg, Notice, Pane, PaneState, Rating,
    RatingStore, PLACEHOLDER_TEXT,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(review_logging::initialize_for_tests);
}

fn new_state(ids: &[&str], sources: &[&str], persisted: Option<&str>) -> AppState {
    let working_set: Vec<String> = ids.iter().map(|v| v.to_string()).collect();
    let ratings = RatingStore::load(persisted, &working_set);
    AppState::new(
        working_set,
        sources.iter().map(|v| v.to_string()).collect(),
        ratings,
    )
}

fn fetch_tags(effects: &[Effect]) -> Vec<(FetchTag, String)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::FetchPane { tag, category } => Some((tag.clone(), category.clone())),
            _ => None,
        })
        .collect()
}

fn tag_for(effects: &[Effect], pane: Pane) -> FetchTag {
    fetch_tags(effects)
        .into_iter()
        .map(|(tag, _)| tag)
        .find(|tag| tag.pane == pane)
        .expect("fetch effect for pane")
}

fn text(value: &str) -> FetchOutcome {
    FetchOutcome::Text(value.to_string())
}

#[test]
fn select_issues_both_fetches_and_syncs_rating() {
    init_logging();
    let state = new_state(&["1", "2"], &["gpt", "whisper"], Some(r#"{"2":"M"}"#));

    let (state, effects) = update(state, Msg::Select("2".to_string()));
    let fetches = fetch_tags(&effects);

    assert_eq!(fetches.len(), 2);
    assert_eq!(fetches[0].0.pane, Pane::Human);
    assert_eq!(fetches[0].0.id, "2");
    assert_eq!(fetches[0].1, "human");
    assert_eq!(fetches[1].0.pane, Pane::Machine);
    assert_eq!(fetches[1].1, "gpt");

    let view = state.view();
    assert_eq!(view.current.as_deref(), Some("2"));
    assert_eq!(view.link.as_deref(), Some("https://bandmaid.tokyo/movies/2"));
    assert_eq!(view.rating, Some(Rating::MachinePreferred));
    assert_eq!(view.human_pane, PaneState::Loading);
    assert_eq!(view.machine_pane, PaneState::Loading);
    let selected: Vec<_> = view.rows.iter().filter(|r| r.is_selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, "2");
}

#[test]
fn link_base_is_configurable() {
    let state = new_state(&["7"], &["mt"], None).with_link_base("http://local/v/");
    let (state, _) = update(state, Msg::Select("7".to_string()));
    assert_eq!(state.view().link.as_deref(), Some("http://local/v/7"));
}

#[test]
fn results_fill_panes_in_any_order() {
    let state = new_state(&["1"], &["mt"], None);
    let (state, effects) = update(state, Msg::Select("1".to_string()));
    let human = tag_for(&effects, Pane::Human);
    let machine = tag_for(&effects, Pane::Machine);

    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: machine,
            outcome: text("machine words"),
        },
    );
    assert_eq!(state.view().human_pane, PaneState::Loading);

    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: human,
            outcome: text("human words"),
        },
    );
    let view = state.view();
    assert_eq!(view.human_pane, PaneState::Ready("human words".to_string()));
    assert_eq!(view.machine_pane, PaneState::Ready("machine words".to_string()));
}

#[test]
fn missing_or_failed_text_shows_placeholder() {
    init_logging();
    let state = new_state(&["1"], &["mt"], None);
    let (state, effects) = update(state, Msg::Select("1".to_string()));

    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&effects, Pane::Human),
            outcome: FetchOutcome::NotFound,
        },
    );
    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&effects, Pane::Machine),
            outcome: FetchOutcome::TransportError("connection reset".to_string()),
        },
    );

    let view = state.view();
    assert_eq!(view.human_pane, PaneState::Ready(PLACEHOLDER_TEXT.to_string()));
    assert_eq!(view.machine_pane, PaneState::Ready(PLACEHOLDER_TEXT.to_string()));
}

#[test]
fn stale_results_from_previous_selection_are_discarded() {
    init_logging();
    let state = new_state(&["1", "2"], &["mt"], None);
    let (state, effects_a) = update(state, Msg::Select("1".to_string()));
    let (state, effects_b) = update(state, Msg::Select("2".to_string()));

    // B settles first, then A's slow responses arrive.
    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&effects_b, Pane::Human),
            outcome: text("B human"),
        },
    );
    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&effects_b, Pane::Machine),
            outcome: FetchOutcome::NotFound,
        },
    );
    let (mut state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&effects_a, Pane::Human),
            outcome: text("A human"),
        },
    );
    assert!(state.consume_dirty());
    let (mut state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&effects_a, Pane::Machine),
            outcome: text("A machine"),
        },
    );

    let view = state.view();
    assert_eq!(view.current.as_deref(), Some("2"));
    assert_eq!(view.human_pane, PaneState::Ready("B human".to_string()));
    assert_eq!(view.machine_pane, PaneState::Ready(PLACEHOLDER_TEXT.to_string()));
    assert!(!state.consume_dirty());
}

#[test]
fn stale_results_before_new_ones_leave_panes_loading() {
    let state = new_state(&["1", "2"], &["mt"], None);
    let (state, effects_a) = update(state, Msg::Select("1".to_string()));
    let (state, _effects_b) = update(state, Msg::Select("2".to_string()));

    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&effects_a, Pane::Human),
            outcome: text("A human"),
        },
    );
    assert_eq!(state.view().human_pane, PaneState::Loading);
}

#[test]
fn reselecting_same_id_ignores_the_older_fetch() {
    let state = new_state(&["1", "2"], &["mt"], None);
    let (state, first) = update(state, Msg::Select("1".to_string()));
    let (state, _) = update(state, Msg::Select("2".to_string()));
    let (state, second) = update(state, Msg::Select("1".to_string()));

    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&first, Pane::Human),
            outcome: text("first"),
        },
    );
    assert_eq!(state.view().human_pane, PaneState::Loading);

    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&second, Pane::Human),
            outcome: text("second"),
        },
    );
    assert_eq!(state.view().human_pane, PaneState::Ready("second".to_string()));
}

#[test]
fn source_change_refetches_machine_pane_only() {
    init_logging();
    let state = new_state(&["1"], &["gpt", "whisper"], None);
    let (state, initial) = update(state, Msg::Select("1".to_string()));
    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&initial, Pane::Human),
            outcome: text("human"),
        },
    );

    let (state, effects) = update(state, Msg::SourceChanged("whisper".to_string()));
    let fetches = fetch_tags(&effects);
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].0.pane, Pane::Machine);
    assert_eq!(fetches[0].1, "whisper");

    // The gpt answer arrives after the switch and must not win.
    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: tag_for(&initial, Pane::Machine),
            outcome: text("gpt text"),
        },
    );
    let (state, _) = update(
        state,
        Msg::PaneLoaded {
            tag: fetches[0].0.clone(),
            outcome: text("whisper text"),
        },
    );

    let view = state.view();
    assert_eq!(view.source.as_deref(), Some("whisper"));
    assert_eq!(view.human_pane, PaneState::Ready("human".to_string()));
    assert_eq!(view.machine_pane, PaneState::Ready("whisper text".to_string()));
}

#[test]
fn source_change_without_selection_only_records_source() {
    let state = new_state(&["1"], &["gpt", "whisper"], None);
    let (state, effects) = update(state, Msg::SourceChanged("whisper".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.source(), Some("whisper"));

    let (_, effects) = update(state, Msg::Select("1".to_string()));
    assert_eq!(fetch_tags(&effects)[1].1, "whisper");
}

#[test]
fn unknown_ids_and_sources_are_rejected_with_notice() {
    let state = new_state(&["1"], &["gpt"], None);

    let (state, effects) = update(state, Msg::Select("404".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.current(), None);
    assert_eq!(
        state.view().notice,
        Some(Notice::UnknownIdentifier("404".to_string()))
    );

    let (state, effects) = update(state, Msg::SourceChanged("nope".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.source(), Some("gpt"));
    assert_eq!(
        state.view().notice,
        Some(Notice::UnknownSource("nope".to_string()))
    );
}

#[test]
fn manifest_without_machine_sources_shows_placeholder() {
    let state = new_state(&["1"], &[], None);
    let (state, effects) = update(state, Msg::Select("1".to_string()));

    let fetches = fetch_tags(&effects);
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].0.pane, Pane::Human);
    assert_eq!(
        state.view().machine_pane,
        PaneState::Ready(PLACEHOLDER_TEXT.to_string())
    );
}
