//! Remote image download with a single-flight latch.

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::export::{sanitize_file_name, FileSink};
use crate::model::ImageItem;

/// Fetches the bytes behind a URL.
#[async_trait]
pub trait RemoteFetch: Send + Sync {
    /// Fetch `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP(S) fetcher backed by `reqwest`.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    /// Create a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl RemoteFetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |e: reqwest::Error| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?
            .bytes()
            .await
            .map_err(fetch_error)?;
        Ok(bytes.to_vec())
    }
}

/// Fetcher used when no network capability is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

#[async_trait]
impl RemoteFetch for OfflineFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Err(Error::Fetch {
            url: url.to_string(),
            reason: "remote fetch is not available in this build".to_string(),
        })
    }
}

/// The fetcher a renderer uses unless told otherwise.
pub fn default_fetcher() -> Arc<dyn RemoteFetch> {
    #[cfg(feature = "http")]
    {
        Arc::new(HttpFetcher::new())
    }
    #[cfg(not(feature = "http"))]
    {
        Arc::new(OfflineFetcher)
    }
}

/// How a download ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Fetched and saved
    Saved(PathBuf),
    /// Fetch or save failed; the error was logged
    Failed,
    /// Another download was already in flight; nothing was fetched
    Rejected,
}

impl DownloadOutcome {
    /// Check if the image was saved.
    pub fn is_saved(&self) -> bool {
        matches!(self, DownloadOutcome::Saved(_))
    }
}

/// Holds the latch; releases it on drop.
#[derive(Debug)]
struct InFlight {
    latch: Arc<AtomicBool>,
}

impl InFlight {
    fn acquire(latch: &Arc<AtomicBool>) -> Option<Self> {
        latch
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                latch: Arc::clone(latch),
            })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.latch.store(false, Ordering::Release);
    }
}

/// Fetches images and saves them, one at a time.
#[derive(Clone)]
pub struct DownloadManager {
    fetcher: Arc<dyn RemoteFetch>,
    sink: Arc<dyn FileSink>,
    default_name: String,
    in_flight: Arc<AtomicBool>,
}

impl DownloadManager {
    /// Create a manager. `default_name` names images without alt text.
    pub fn new(
        fetcher: Arc<dyn RemoteFetch>,
        sink: Arc<dyn FileSink>,
        default_name: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            sink,
            default_name: default_name.into(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if a download is in flight.
    pub fn is_downloading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// File name an image is saved under.
    pub fn file_name_for(&self, item: &ImageItem) -> String {
        let alt = item.alt.trim();
        if alt.is_empty() {
            sanitize_file_name(&self.default_name)
        } else {
            sanitize_file_name(alt)
        }
    }

    /// Start downloading `item`.
    ///
    /// The latch is taken here, before the returned future is polled, so a
    /// second call made while this one is pending resolves to
    /// [`DownloadOutcome::Rejected`] without fetching. The latch is
    /// released when the future completes or is dropped.
    pub fn download(
        &self,
        item: &ImageItem,
    ) -> impl Future<Output = DownloadOutcome> + Send + 'static {
        let guard = InFlight::acquire(&self.in_flight);
        let fetcher = Arc::clone(&self.fetcher);
        let sink = Arc::clone(&self.sink);
        let url = item.url.clone();
        let filename = self.file_name_for(item);

        async move {
            let Some(_guard) = guard else {
                log::warn!("Download of {} rejected: another download is in flight", url);
                return DownloadOutcome::Rejected;
            };

            let result = match fetcher.fetch(&url).await {
                Ok(bytes) => save(sink, filename, bytes).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(path) => {
                    log::info!("Downloaded {} to {}", url, path.display());
                    DownloadOutcome::Saved(path)
                }
                Err(e) => {
                    log::error!("Download failed: {}", e);
                    DownloadOutcome::Failed
                }
            }
        }
    }
}

/// Hand the write to tokio's blocking pool when a runtime is current.
#[cfg(feature = "async")]
async fn save(sink: Arc<dyn FileSink>, filename: String, bytes: Vec<u8>) -> Result<PathBuf> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle
            .spawn_blocking(move || sink.save(&filename, &bytes))
            .await
            .map_err(|e| Error::Other(format!("Save task failed: {}", e)))?,
        Err(_) => sink.save(&filename, &bytes),
    }
}

#[cfg(not(feature = "async"))]
async fn save(sink: Arc<dyn FileSink>, filename: String, bytes: Vec<u8>) -> Result<PathBuf> {
    sink.save(&filename, &bytes)
}

impl std::fmt::Debug for DownloadManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadManager")
            .field("default_name", &self.default_name)
            .field("in_flight", &self.is_downloading())
            .finish()
    }
}
