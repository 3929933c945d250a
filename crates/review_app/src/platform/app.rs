use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use review_core::{update, working_set, AppState, AppViewModel, FetchOutcome, Msg};
use review_engine::{fetcher_for, ContentRoot, EngineEvent, EngineHandle, FileSnapshotSlot};
use review_logging::{review_debug, review_info};

use super::config::ReviewConfig;
use super::console::{self, Input};
use super::effects::{EffectRunner, ExportTarget, Feedback};
use super::logging;
use super::persistence::load_ratings;
use crate::cli::Cli;

const MANIFEST_FAILURE_NOTICE: &str = "Manifest file not found or invalid.";

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = ReviewConfig::load(cli.config.as_deref())?.apply_cli(&cli);
    logging::initialize(cli.log, config.level());
    match &config.source {
        Some(path) => review_info!("Loaded config from {:?}", path),
        None => review_info!("No config file, using defaults"),
    }
    review_info!("Starting review session with root {}", config.content_root);

    let root = ContentRoot::parse(&config.content_root)
        .with_context(|| format!("invalid content root {:?}", config.content_root))?;
    let fetcher = fetcher_for(&root, config.fetch_settings())
        .context("failed to set up the content fetcher")?;
    let engine = Arc::new(EngineHandle::new(fetcher).context("failed to start fetch engine")?);

    let mut session = match ReviewSession::start(engine.clone(), &config) {
        Ok(session) => session,
        Err(err) => {
            if matches!(err, StartError::Manifest(_)) {
                eprintln!("{MANIFEST_FAILURE_NOTICE}");
            }
            return Err(err.into());
        }
    };

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    spawn_stdin_reader(input_tx.clone());
    spawn_engine_forwarder(engine, input_tx);

    let mut out = io::stdout().lock();
    print_lines(&mut out, &console::render(&session.view()))?;
    if let Some(first) = session.first_id() {
        let outcome = session.dispatch(Msg::Select(first));
        print_outcome(&mut out, &outcome)?;
    }

    for input in input_rx {
        match input {
            Input::Msg(msg) => {
                let outcome = session.dispatch(msg);
                print_outcome(&mut out, &outcome)?;
            }
            Input::Redraw => print_lines(&mut out, &console::render(&session.view()))?,
            Input::Help => writeln!(out, "{}", console::HELP)?,
            Input::Unknown(line) => {
                writeln!(out, "Unknown command {line:?}")?;
                writeln!(out, "{}", console::HELP)?;
            }
            Input::Quit => break,
        }
        out.flush()?;
    }

    review_info!("Review session ended");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum StartError {
    #[error(transparent)]
    Manifest(#[from] review_engine::ManifestError),
    #[error("failed to load ratings: {0}")]
    Ratings(#[from] review_engine::PersistError),
}

/// Result of dispatching one message.
#[derive(Debug, Default)]
pub(crate) struct Dispatched {
    /// Present when the view changed and should be redrawn.
    pub view: Option<AppViewModel>,
    pub feedback: Vec<Feedback>,
}

/// Owns the application state on the single state thread.
pub(crate) struct ReviewSession {
    state: AppState,
    runner: EffectRunner,
}

impl ReviewSession {
    /// Loads the manifest, reconciles and persists ratings, and builds the
    /// initial state. Any failure here aborts startup.
    pub(crate) fn start(
        engine: Arc<EngineHandle>,
        config: &ReviewConfig,
    ) -> Result<Self, StartError> {
        let manifest = engine.load_manifest()?;
        let ids = working_set(&manifest);
        let sources = manifest.sources();
        review_info!(
            "Working set has {} videos across {} machine sources",
            ids.len(),
            sources.len()
        );

        let slot = FileSnapshotSlot::in_dir(config.state_dir.clone());
        let ratings = load_ratings(&slot, &ids)?;
        let state = AppState::new(ids, sources, ratings).with_link_base(config.link_base.clone());

        let runner = EffectRunner::new(
            engine,
            Box::new(slot),
            ExportTarget {
                dir: config.export_dir.clone(),
                timestamped: config.timestamped_export,
            },
        );
        Ok(Self::new(state, runner))
    }

    pub(crate) fn new(state: AppState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    pub(crate) fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub(crate) fn first_id(&self) -> Option<String> {
        self.state.working_set().first().cloned()
    }

    /// Applies `msg`, runs the resulting effects to completion, and reports
    /// whether a redraw is due.
    pub(crate) fn dispatch(&mut self, msg: Msg) -> Dispatched {
        review_debug!("Dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let feedback = self.runner.run(effects);
        state = settle_unqueued_fetches(state, &feedback);
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;
        Dispatched { view, feedback }
    }
}

/// Fails every pane whose fetch the engine refused, so it shows the
/// placeholder instead of loading forever.
fn settle_unqueued_fetches(mut state: AppState, feedback: &[Feedback]) -> AppState {
    for item in feedback {
        if let Feedback::FetchNotQueued(tag) = item {
            let failed = Msg::PaneLoaded {
                tag: tag.clone(),
                outcome: FetchOutcome::TransportError("fetch engine stopped".to_string()),
            };
            state = update(state, failed).0;
        }
    }
    state
}

fn spawn_stdin_reader(tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(console::parse_line(&line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Quit);
    });
}

fn spawn_engine_forwarder(engine: Arc<EngineHandle>, tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        while let Some(EngineEvent::PaneFetched { tag, outcome }) = engine.recv() {
            if tx
                .send(Input::Msg(Msg::PaneLoaded { tag, outcome }))
                .is_err()
            {
                break;
            }
        }
    });
}

fn print_outcome(out: &mut impl Write, outcome: &Dispatched) -> io::Result<()> {
    if let Some(view) = &outcome.view {
        print_lines(out, &console::render(view))?;
    }
    for feedback in &outcome.feedback {
        writeln!(out, "{}", console::render_feedback(feedback))?;
    }
    Ok(())
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    writeln!(out)?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::{Effect, PaneState, RatingStore, PLACEHOLDER_TEXT};
    use review_engine::{DirectoryFetcher, FetchSettings, MemorySnapshotSlot, SnapshotSlot};
    use std::fs;

    fn session(dir: &std::path::Path, slot: MemorySnapshotSlot) -> ReviewSession {
        fs::create_dir_all(dir.join("human")).unwrap();
        fs::write(dir.join("human/1.txt"), "hello").unwrap();
        let fetcher = Arc::new(DirectoryFetcher::new(
            dir.to_path_buf(),
            FetchSettings::default(),
        ));
        let engine = Arc::new(EngineHandle::new(fetcher).unwrap());
        let ids = vec!["1".to_string(), "2".to_string()];
        let ratings = load_ratings(&slot, &ids).unwrap();
        let state = AppState::new(ids, vec!["gpt".to_string()], ratings);
        let runner = EffectRunner::new(
            engine,
            Box::new(slot),
            ExportTarget {
                dir: dir.join("out"),
                timestamped: false,
            },
        );
        ReviewSession::new(state, runner)
    }

    #[test]
    fn rating_is_saved_before_dispatch_returns() {
        let temp = tempfile::TempDir::new().unwrap();
        let slot = MemorySnapshotSlot::new();
        let mut session = session(temp.path(), slot.clone());
        assert_eq!(
            slot.read().unwrap().as_deref(),
            Some(r#"{"1":"-","2":"-"}"#)
        );

        session.dispatch(Msg::Select("1".to_string()));
        let outcome = session.dispatch(Msg::RatingChosen("H".to_string()));

        assert!(outcome.view.is_some());
        assert!(outcome.feedback.is_empty());
        let saved = RatingStore::load(slot.read().unwrap().as_deref(), &[]);
        assert_eq!(saved.get("1").literal(), "H");
    }

    #[test]
    fn export_reports_the_written_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut session = session(temp.path(), MemorySnapshotSlot::new());
        assert!(session.dispatch(Msg::NoOp).view.is_some());

        let outcome = session.dispatch(Msg::ExportRequested);

        assert!(outcome.view.is_none());
        assert_eq!(
            outcome.feedback,
            vec![Feedback::Exported {
                path: temp.path().join("out").join("ratings.json"),
                entries: 2,
            }]
        );
    }

    #[test]
    fn pane_results_come_back_through_the_engine() {
        let temp = tempfile::TempDir::new().unwrap();
        let fetcher = Arc::new(DirectoryFetcher::new(
            temp.path().to_path_buf(),
            FetchSettings::default(),
        ));
        let engine = Arc::new(EngineHandle::new(fetcher).unwrap());
        fs::create_dir_all(temp.path().join("human")).unwrap();
        fs::write(temp.path().join("human/1.txt"), "hello").unwrap();

        let ids = vec!["1".to_string()];
        let state = AppState::new(ids, vec!["gpt".to_string()], RatingStore::new());
        let runner = EffectRunner::new(
            engine.clone(),
            Box::new(MemorySnapshotSlot::new()),
            ExportTarget {
                dir: temp.path().to_path_buf(),
                timestamped: false,
            },
        );
        let mut session = ReviewSession::new(state, runner);
        session.dispatch(Msg::Select("1".to_string()));

        for _ in 0..2 {
            let Some(EngineEvent::PaneFetched { tag, outcome }) = engine.recv() else {
                panic!("engine stopped");
            };
            session.dispatch(Msg::PaneLoaded { tag, outcome });
        }

        let view = session.view();
        assert_eq!(view.human_pane, PaneState::Ready("hello".to_string()));
        assert_eq!(
            view.machine_pane,
            PaneState::Ready(PLACEHOLDER_TEXT.to_string())
        );
    }

    #[test]
    fn refused_fetch_shows_placeholder() {
        let ids = vec!["1".to_string()];
        let state = AppState::new(ids, vec!["gpt".to_string()], RatingStore::new());
        let (state, effects) = update(state, Msg::Select("1".to_string()));
        let feedback: Vec<Feedback> = effects
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::FetchPane { tag, .. } => Some(Feedback::FetchNotQueued(tag)),
                _ => None,
            })
            .collect();
        assert_eq!(feedback.len(), 2);

        let view = settle_unqueued_fetches(state, &feedback).view();
        assert_eq!(view.human_pane, PaneState::Ready(PLACEHOLDER_TEXT.to_string()));
        assert_eq!(view.machine_pane, PaneState::Ready(PLACEHOLDER_TEXT.to_string()));
    }
}
