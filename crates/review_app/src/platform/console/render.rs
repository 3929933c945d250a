use review_core::{AppViewModel, Confirmation, Notice, PaneState};

use crate::platform::effects::Feedback;

pub(crate) const HELP: &str = "\
Commands:
  <id> | select <id>     show a video
  next                   jump to the next unrated video
  h | m | -              rate: human better, machine better, unrated
  source <name>          switch machine source
  search <text> | /text  filter ids (empty clears)
  unrated [on|off] | all show only unrated videos, or everything
  export                 download ratings.json
  reset                  reset every rating (asks first)
  list                   redraw
  quit";

pub(crate) fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    let progress = &view.progress;

    lines.push(format!(
        "== Videos: {} shown, {}/{} rated (H {}, M {}) ==",
        view.rows.len(),
        progress.rated,
        progress.total,
        progress.human,
        progress.machine
    ));
    for row in &view.rows {
        let marker = if row.is_selected { '>' } else { ' ' };
        lines.push(format!("{marker} {}", row.label));
    }
    if let Some(filter) = filter_summary(view) {
        lines.push(filter);
    }

    match (&view.current, &view.link) {
        (Some(id), Some(link)) => lines.push(format!("Video {id}: {link}")),
        (Some(id), None) => lines.push(format!("Video {id}")),
        _ => lines.push("No video selected".to_string()),
    }
    lines.push(format!(
        "Source: {} [{}]",
        view.source.as_deref().unwrap_or("(none)"),
        view.sources.join(", ")
    ));
    if let Some(rating) = view.rating {
        lines.push(format!("Rating: {rating}"));
    }

    if view.current.is_some() {
        lines.push("-- Human --".to_string());
        lines.extend(pane_lines(&view.human_pane));
        lines.push(format!(
            "-- Machine ({}) --",
            view.source.as_deref().unwrap_or("none")
        ));
        lines.extend(pane_lines(&view.machine_pane));
    }

    if let Some(notice) = &view.notice {
        lines.push(format!("! {}", notice_text(notice)));
    }
    if let Some(confirmation) = view.pending_confirmation {
        lines.push(format!("? {} [y/N]", confirmation_text(confirmation)));
    }
    lines
}

pub(crate) fn render_feedback(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Exported { path, entries } => {
            format!("Saved {entries} ratings to {}", path.display())
        }
        Feedback::ExportFailed(err) => format!("! Download failed: {err}"),
        Feedback::SaveFailed(err) => format!("! Could not save ratings: {err}"),
        Feedback::FetchNotQueued(tag) => {
            format!("! Could not load {:?} text for {}: fetch engine stopped", tag.pane, tag.id)
        }
    }
}

fn filter_summary(view: &AppViewModel) -> Option<String> {
    let search = view.filter.search_text.trim();
    match (search.is_empty(), view.filter.unrated_only) {
        (true, false) => None,
        (true, true) => Some("(filter: unrated only)".to_string()),
        (false, false) => Some(format!("(filter: \"{search}\")")),
        (false, true) => Some(format!("(filter: \"{search}\", unrated only)")),
    }
}

fn pane_lines(pane: &PaneState) -> Vec<String> {
    match pane {
        PaneState::Empty => Vec::new(),
        PaneState::Loading => vec!["(loading...)".to_string()],
        PaneState::Ready(text) => text.lines().map(ToOwned::to_owned).collect(),
    }
}

fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::NoUnratedRemaining => "No unrated videos remaining!".to_string(),
        Notice::UnknownIdentifier(id) => format!("No video with id {id}"),
        Notice::UnknownSource(source) => format!("No machine source named {source}"),
    }
}

fn confirmation_text(confirmation: Confirmation) -> &'static str {
    match confirmation {
        Confirmation::ResetRatings => "Are you sure you want to reset all ratings to unrated?",
    }
}
