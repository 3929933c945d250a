use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use review_core::{FetchOutcome, FetchTag, Manifest};
use review_logging::{review_debug, review_warn};

use crate::{
    decode_text, load_manifest, EngineEvent, FailureKind, FetchError, FetchOutput, Fetcher,
    ManifestError, Resource,
};

enum EngineCommand {
    LoadManifest {
        reply: mpsc::Sender<Result<Manifest, ManifestError>>,
    },
    FetchPane {
        tag: FetchTag,
        resource: Resource,
    },
}

/// Runs fetches on a tokio runtime owned by a worker thread.
///
/// Every pane fetch runs as its own task; results come back in completion
/// order through [`EngineHandle::recv`]. Nothing is ever cancelled.
/// The handle is `Sync` so one thread can block on events while another
/// issues commands.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("review-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let fetcher = fetcher.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(fetcher.as_ref(), command, event_tx).await;
                    });
                }
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        })
    }

    /// Blocks until the manifest is loaded or has failed.
    pub fn load_manifest(&self) -> Result<Manifest, ManifestError> {
        let (reply, response) = mpsc::channel();
        let disconnected = || {
            ManifestError::Fetch(FetchError::new(FailureKind::Io, "engine worker stopped"))
        };
        self.cmd_tx
            .send(EngineCommand::LoadManifest { reply })
            .map_err(|_| disconnected())?;
        response.recv().map_err(|_| disconnected())?
    }

    /// Starts loading `<category>/<id>.txt` for the pane named in `tag`.
    ///
    /// Returns false when the worker is gone and no result will ever arrive.
    pub fn fetch_pane(&self, tag: FetchTag, category: &str) -> bool {
        let resource = Resource::pane(category, &tag.id);
        review_debug!(
            "Fetching {} for {:?} pane (generation {})",
            resource,
            tag.pane,
            tag.generation
        );
        match self.cmd_tx.send(EngineCommand::FetchPane { tag, resource }) {
            Ok(()) => true,
            Err(mpsc::SendError(command)) => {
                if let EngineCommand::FetchPane { resource, .. } = command {
                    review_warn!("Engine worker stopped; dropped fetch of {}", resource);
                }
                false
            }
        }
    }

    /// Blocks for the next event; `None` once the worker is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv().ok()
    }
}

async fn handle_command(
    fetcher: &dyn Fetcher,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::LoadManifest { reply } => {
            let _ = reply.send(load_manifest(fetcher).await);
        }
        EngineCommand::FetchPane { tag, resource } => {
            let result = fetcher.fetch(&resource).await;
            let outcome = pane_outcome(result);
            if let FetchOutcome::TransportError(message) = &outcome {
                review_warn!("Fetching {} failed: {}", resource, message);
            }
            let _ = event_tx.send(EngineEvent::PaneFetched { tag, outcome });
        }
    }
}

/// Turns a raw fetch result into pane content. Undecodable bytes count as a
/// transport failure.
pub fn pane_outcome(result: Result<FetchOutput, FetchError>) -> FetchOutcome {
    match result {
        Ok(output) => match decode_text(&output.bytes, output.metadata.content_type.as_deref()) {
            Ok(decoded) => FetchOutcome::Text(decoded.text),
            Err(err) => FetchOutcome::TransportError(err.to_string()),
        },
        Err(err) if err.is_not_found() => FetchOutcome::NotFound,
        Err(err) => FetchOutcome::TransportError(err.to_string()),
    }
}
