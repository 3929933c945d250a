use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::{FailureKind, FetchError};

/// Where the manifest and transcript files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRoot {
    Http(Url),
    Directory(PathBuf),
}

impl ContentRoot {
    /// `http://` and `https://` values are URLs; anything else is a directory.
    ///
    /// URL roots always end in `/` so resources resolve beneath them.
    pub fn parse(value: &str) -> Result<Self, url::ParseError> {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let mut url = Url::parse(trimmed)?;
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            Ok(ContentRoot::Http(url))
        } else {
            Ok(ContentRoot::Directory(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for ContentRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentRoot::Http(url) => write!(f, "{url}"),
            ContentRoot::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A file below the content root, as a list of plain path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    segments: Vec<String>,
}

impl Resource {
    pub fn manifest() -> Self {
        Self {
            segments: vec!["manifest.json".to_string()],
        }
    }

    /// `<category>/<id>.txt`, where category is `human` or a machine source.
    pub fn pane(category: &str, id: &str) -> Self {
        Self {
            segments: vec![category.to_string(), format!("{id}.txt")],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Rejects segments that could leave the content root.
    pub fn check(&self) -> Result<(), FetchError> {
        for segment in &self.segments {
            let bad = segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains(['/', '\\'])
                || segment.chars().any(char::is_control);
            if bad {
                return Err(FetchError::new(
                    FailureKind::InvalidResource,
                    format!("unsafe path segment {segment:?}"),
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
