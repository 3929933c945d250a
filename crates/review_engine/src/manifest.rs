use review_core::Manifest;
use review_logging::{review_error, review_info};

use crate::{decode_text, DecodeError, FetchError, Fetcher, Resource};

/// Startup failure: the manifest is required for everything else.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("manifest is not readable text: {0}")]
    Decode(#[from] DecodeError),
    #[error("manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fetches and parses `manifest.json` once. There is no retry.
pub async fn load_manifest(fetcher: &dyn Fetcher) -> Result<Manifest, ManifestError> {
    let result = fetch_and_parse(fetcher).await;
    match &result {
        Ok(manifest) => review_info!(
            "Loaded manifest: {} human ids, {} machine sources",
            manifest.human.len(),
            manifest.machine.len()
        ),
        Err(err) => review_error!("Failed to load manifest: {}", err),
    }
    result
}

async fn fetch_and_parse(fetcher: &dyn Fetcher) -> Result<Manifest, ManifestError> {
    let output = fetcher.fetch(&Resource::manifest()).await?;
    let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref())?;
    Ok(Manifest::from_json(&decoded.text)?)
}
