use crate::{Rating, RatingStore, VideoId};

/// Next unrated identifier after `current`, wrapping at the end.
///
/// `current` itself is never returned. `None` means a full lap found nothing,
/// or `current` is not in the working set.
pub fn next_unrated_from<'a>(
    current: &str,
    working_set: &'a [VideoId],
    ratings: &RatingStore,
) -> Option<&'a VideoId> {
    let start = working_set.iter().position(|id| id == current)?;
    let total = working_set.len();
    (1..total)
        .map(|offset| &working_set[(start + offset) % total])
        .find(|id| ratings.get(id) == Rating::Unrated)
}
