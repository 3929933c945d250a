use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use url::Url;

use crate::{ContentRoot, FailureKind, FetchError, FetchMetadata, FetchOutput, Resource};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, resource: &Resource) -> Result<FetchOutput, FetchError>;
}

/// Picks the fetcher matching the kind of content root.
pub fn fetcher_for(
    root: &ContentRoot,
    settings: FetchSettings,
) -> Result<Arc<dyn Fetcher>, FetchError> {
    Ok(match root {
        ContentRoot::Http(base) => Arc::new(ReqwestFetcher::new(base.clone(), settings)?),
        ContentRoot::Directory(dir) => Arc::new(DirectoryFetcher::new(dir.clone(), settings)),
    })
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    base: Url,
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(base: Url, settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            base,
            settings,
            client,
        })
    }

    fn url_for(&self, resource: &Resource) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::new(FailureKind::InvalidResource, "content root cannot be a base")
            })?
            .pop_if_empty()
            .extend(resource.segments());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, resource: &Resource) -> Result<FetchOutput, FetchError> {
        resource.check()?;
        let url = self.url_for(resource)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::new(FailureKind::NotFound, url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let location = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            location,
            content_type,
            byte_len: bytes.len() as u64,
        };
        Ok(FetchOutput { bytes, metadata })
    }
}

/// Reads resources from a local directory laid out like the web root.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
    settings: FetchSettings,
}

impl DirectoryFetcher {
    pub fn new(root: PathBuf, settings: FetchSettings) -> Self {
        Self { root, settings }
    }
}

#[async_trait::async_trait]
impl Fetcher for DirectoryFetcher {
    async fn fetch(&self, resource: &Resource) -> Result<FetchOutput, FetchError> {
        resource.check()?;
        let path = resource
            .segments()
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        let metadata = tokio::fs::metadata(&path).await.map_err(|err| map_io_error(&path, err))?;
        if !metadata.is_file() {
            return Err(FetchError::new(
                FailureKind::NotFound,
                format!("{} is not a file", path.display()),
            ));
        }
        if metadata.len() > self.settings.max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge {
                    max_bytes: self.settings.max_bytes,
                    actual: Some(metadata.len()),
                },
                "file too large",
            ));
        }

        let bytes = tokio::fs::read(&path).await.map_err(|err| map_io_error(&path, err))?;
        let metadata = FetchMetadata {
            location: path.display().to_string(),
            content_type: None,
            byte_len: bytes.len() as u64,
        };
        Ok(FetchOutput { bytes, metadata })
    }
}

fn map_io_error(path: &std::path::Path, err: std::io::Error) -> FetchError {
    let kind = if err.kind() == ErrorKind::NotFound {
        FailureKind::NotFound
    } else {
        FailureKind::Io
    };
    FetchError::new(kind, format!("{}: {}", path.display(), err))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
