use review_core::Msg;

/// One line of user input, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    Msg(Msg),
    Redraw,
    Help,
    Quit,
    Unknown(String),
}

pub(crate) fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if let Some(text) = line.strip_prefix('/') {
        return Input::Msg(Msg::SearchChanged(text.trim().to_string()));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match (word.to_ascii_lowercase().as_str(), rest) {
        ("", _) | ("list" | "ls", "") => Input::Redraw,
        ("q" | "quit" | "exit", "") => Input::Quit,
        ("help" | "?", _) => Input::Help,
        ("next" | ">", "") => Input::Msg(Msg::NextUnrated),
        ("export" | "download", "") => Input::Msg(Msg::ExportRequested),
        ("reset", "") => Input::Msg(Msg::ResetRequested),
        ("y" | "yes", "") => Input::Msg(Msg::ConfirmationAnswered(true)),
        ("n" | "no", "") => Input::Msg(Msg::ConfirmationAnswered(false)),
        ("dismiss" | "ok", "") => Input::Msg(Msg::NoticeDismissed),
        ("-" | "h" | "m", "") => Input::Msg(Msg::RatingChosen(word.to_ascii_uppercase())),
        ("rate", value) if !value.is_empty() => {
            Input::Msg(Msg::RatingChosen(value.to_ascii_uppercase()))
        }
        ("search", text) => Input::Msg(Msg::SearchChanged(text.to_string())),
        ("unrated", "" | "on") => Input::Msg(Msg::UnratedOnlyToggled(true)),
        ("unrated", "off") | ("all", "") => Input::Msg(Msg::UnratedOnlyToggled(false)),
        ("source" | "src", name) if !name.is_empty() => {
            Input::Msg(Msg::SourceChanged(name.to_string()))
        }
        ("select" | "open", id) if !id.is_empty() => Input::Msg(Msg::Select(id.to_string())),
        (_, "") if word.bytes().all(|b| b.is_ascii_digit()) => {
            Input::Msg(Msg::Select(word.to_string()))
        }
        _ => Input::Unknown(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(line: &str) -> Msg {
        match parse_line(line) {
            Input::Msg(msg) => msg,
            other => panic!("{line:?} parsed as {other:?}"),
        }
    }

    #[test]
    fn bare_digits_select() {
        assert_eq!(msg("  42 "), Msg::Select("42".to_string()));
        assert_eq!(msg("select 0042"), Msg::Select("0042".to_string()));
    }

    #[test]
    fn ratings_are_normalized_but_not_validated() {
        assert_eq!(msg("h"), Msg::RatingChosen("H".to_string()));
        assert_eq!(msg("M"), Msg::RatingChosen("M".to_string()));
        assert_eq!(msg("-"), Msg::RatingChosen("-".to_string()));
        assert_eq!(msg("rate x"), Msg::RatingChosen("X".to_string()));
    }

    #[test]
    fn search_keeps_rest_of_line() {
        assert_eq!(msg("search 12 3"), Msg::SearchChanged("12 3".to_string()));
        assert_eq!(msg("search"), Msg::SearchChanged(String::new()));
        assert_eq!(msg("/7"), Msg::SearchChanged("7".to_string()));
    }

    #[test]
    fn toggles_and_actions() {
        assert_eq!(msg("unrated"), Msg::UnratedOnlyToggled(true));
        assert_eq!(msg("unrated off"), Msg::UnratedOnlyToggled(false));
        assert_eq!(msg("all"), Msg::UnratedOnlyToggled(false));
        assert_eq!(msg("next"), Msg::NextUnrated);
        assert_eq!(msg("export"), Msg::ExportRequested);
        assert_eq!(msg("reset"), Msg::ResetRequested);
        assert_eq!(msg("Y"), Msg::ConfirmationAnswered(true));
        assert_eq!(msg("no"), Msg::ConfirmationAnswered(false));
        assert_eq!(msg("source whisper-v3"), Msg::SourceChanged("whisper-v3".to_string()));
    }

    #[test]
    fn console_commands() {
        assert_eq!(parse_line(""), Input::Redraw);
        assert_eq!(parse_line("list"), Input::Redraw);
        assert_eq!(parse_line("quit"), Input::Quit);
        assert_eq!(parse_line("?"), Input::Help);
        assert_eq!(parse_line("source"), Input::Unknown("source".to_string()));
        assert_eq!(parse_line("dance now"), Input::Unknown("dance now".to_string()));
    }
}
