use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use review_core::{Effect, FetchTag};
use review_engine::{export_ratings, EngineHandle, SnapshotSlot};
use review_logging::{review_error, review_info};

use super::persistence::save_ratings;

/// Things the console should tell the user after running effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Exported { path: PathBuf, entries: usize },
    ExportFailed(String),
    SaveFailed(String),
    /// The engine refused the fetch; nothing will ever answer `tag`.
    FetchNotQueued(FetchTag),
}

#[derive(Debug, Clone)]
pub struct ExportTarget {
    pub dir: PathBuf,
    pub timestamped: bool,
}

impl ExportTarget {
    fn filename(&self) -> String {
        if self.timestamped {
            format!("ratings-{}.json", Utc::now().format("%Y%m%dT%H%M%SZ"))
        } else {
            "ratings.json".to_string()
        }
    }
}

/// Executes effects on the state thread.
///
/// Persistence and export run synchronously, so a rating change is on disk
/// before the next message is handled. Pane fetches are handed to the engine.
pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    slot: Box<dyn SnapshotSlot + Send>,
    export: ExportTarget,
}

impl EffectRunner {
    pub fn new(
        engine: Arc<EngineHandle>,
        slot: Box<dyn SnapshotSlot + Send>,
        export: ExportTarget,
    ) -> Self {
        Self {
            engine,
            slot,
            export,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<Feedback> {
        let mut feedback = Vec::new();
        for effect in effects {
            match effect {
                Effect::FetchPane { tag, category } => {
                    if !self.engine.fetch_pane(tag.clone(), &category) {
                        feedback.push(Feedback::FetchNotQueued(tag));
                    }
                }
                Effect::PersistRatings { snapshot } => {
                    if let Err(err) = save_ratings(self.slot.as_ref(), &snapshot) {
                        review_error!("Failed to persist ratings: {}", err);
                        feedback.push(Feedback::SaveFailed(err.to_string()));
                    }
                }
                Effect::ExportRatings { snapshot } => {
                    let filename = self.export.filename();
                    match export_ratings(&self.export.dir, &filename, &snapshot) {
                        Ok(summary) => {
                            review_info!("Ratings downloaded to {:?}", summary.path);
                            feedback.push(Feedback::Exported {
                                path: summary.path,
                                entries: summary.entries,
                            });
                        }
                        Err(err) => {
                            review_error!("Failed to export ratings: {}", err);
                            feedback.push(Feedback::ExportFailed(err.to_string()));
                        }
                    }
                }
            }
        }
        feedback
    }
}
