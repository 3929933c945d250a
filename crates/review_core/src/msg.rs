#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked an identifier from the list.
    Select(crate::VideoId),
    /// User picked a different machine source.
    SourceChanged(String),
    /// A pane fetch settled.
    PaneLoaded {
        tag: crate::FetchTag,
        outcome: crate::FetchOutcome,
    },
    /// Raw value from the rating control; validated in `update`.
    RatingChosen(String),
    /// Search box contents changed.
    SearchChanged(String),
    /// "Unrated only" toggle changed.
    UnratedOnlyToggled(bool),
    /// User asked for the next unrated identifier.
    NextUnrated,
    /// User asked to download the ratings.
    ExportRequested,
    /// User asked to reset every rating. Needs confirmation.
    ResetRequested,
    /// Answer to the pending confirmation prompt.
    ConfirmationAnswered(bool),
    NoticeDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
