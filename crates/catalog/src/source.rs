//! Where static geographic datasets come from.
//!
//! Datasets are addressed by file name (`countries_states.geojson`, ...) and
//! fetched as text:
//! - Filesystem (a directory of GeoJSON files)
//! - Remote HTTP (a base URL serving the same files)
//! - Memory (tests and embedded data)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use parking_lot::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("invalid dataset name: {0:?}")]
    InvalidName(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
    #[error("dataset {0} not found")]
    NotFound(String),
    #[error("failed to decode dataset {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: formats::GeoJsonError,
    },
}

/// Trait for dataset sources.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait GeoDataSource: Send + Sync {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Fetch a dataset's text.
    ///
    /// Returns `Ok(None)` if the dataset doesn't exist (equivalent to 404).
    /// Returns `Err` on actual errors (IO, network, etc.).
    fn fetch(&self, name: &str) -> BoxFuture<'_, Result<Option<String>, DataSourceError>>;
}

/// Names are plain file names; anything that could escape the root is refused.
fn checked_name(name: &str) -> Result<&str, DataSourceError> {
    let ok = !name.is_empty()
        && !name.contains("..")
        && !name.starts_with('/')
        && !name.contains('\\');
    if ok {
        Ok(name)
    } else {
        Err(DataSourceError::InvalidName(name.to_string()))
    }
}

/// Directory of dataset files.
pub struct FilesystemSource {
    root: PathBuf,
}

impl FilesystemSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl GeoDataSource for FilesystemSource {
    fn describe(&self) -> String {
        format!("filesystem:{}", self.root.display())
    }

    fn fetch(&self, name: &str) -> BoxFuture<'_, Result<Option<String>, DataSourceError>> {
        let path = checked_name(name).map(|n| self.root.join(n));
        Box::pin(async move {
            let path = path?;
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(DataSourceError::Io { path, source: e }),
            }
        })
    }
}

/// Datasets served under `{base_url}/{name}`.
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn dataset_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

impl GeoDataSource for HttpSource {
    fn describe(&self) -> String {
        format!("http:{}", self.base_url)
    }

    fn fetch(&self, name: &str) -> BoxFuture<'_, Result<Option<String>, DataSourceError>> {
        let url = checked_name(name).map(|n| self.dataset_url(n));
        Box::pin(async move {
            let resp = self.client.get(url?).send().await?;

            if resp.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !resp.status().is_success() {
                return Err(DataSourceError::Status(resp.status()));
            }

            Ok(Some(resp.text().await?))
        })
    }
}

/// In-memory datasets.
#[derive(Default)]
pub struct MemorySource {
    datasets: RwLock<HashMap<String, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&self, name: impl Into<String>, text: impl Into<String>) {
        self.datasets.write().insert(name.into(), text.into());
    }
}

impl GeoDataSource for MemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn fetch(&self, name: &str) -> BoxFuture<'_, Result<Option<String>, DataSourceError>> {
        let text = self.datasets.read().get(name).cloned();
        Box::pin(async move { Ok(text) })
    }
}
