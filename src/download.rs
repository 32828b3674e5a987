//! Image downloads for media cards.

use crate::error::{Result, ScrapeError};
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};
use url::Url;

/// Fetch a remote resource into a local file.
#[allow(async_fn_in_trait)]
pub trait Downloader {
    async fn download(&self, url: &str, target: &Path) -> Result<()>;
}

/// [`Downloader`] over a shared `reqwest` client. Failures are not retried.
#[derive(Debug, Clone, Default)]
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Downloader for HttpDownloader {
    #[instrument(level = "info", skip_all, fields(%url, target = %target.display()))]
    async fn download(&self, url: &str, target: &Path) -> Result<()> {
        let wrap = |source| ScrapeError::Download {
            url: url.to_string(),
            source,
        };
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(wrap)?
            .bytes()
            .await
            .map_err(wrap)?;
        fs::write(target, &bytes).await?;
        debug!(bytes = bytes.len(), "Saved image");
        Ok(())
    }
}

/// Resolve an image `src` (possibly relative or protocol-relative) against
/// the page it was found on.
pub fn resolve_src(page_url: &str, src: &str) -> Option<String> {
    if let Ok(abs) = Url::parse(src) {
        return Some(abs.to_string());
    }
    Url::parse(page_url)
        .ok()?
        .join(src)
        .ok()
        .map(|u| u.to_string())
}

/// Deterministic file name for the image of the `index`-th result.
pub fn image_file_name(index: usize) -> String {
    format!("image_news{index}.png")
}
