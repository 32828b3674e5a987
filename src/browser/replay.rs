//! Offline session over captured result pages.
//!
//! A [`ReplaySession`] holds the HTML of one or more saved search result
//! pages. `goto` shows the first page and every successful `click` moves to
//! the next capture, which is how the "Next stories" button behaves on the
//! live site. Used by `--replay` and throughout the tests.

use super::{BrowserSession, Locator, collapse_whitespace};
use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub struct ReplaySession {
    pages: Vec<String>,
    current: usize,
    url: Option<String>,
}

impl ReplaySession {
    pub fn new(pages: Vec<String>) -> Result<Self> {
        if pages.is_empty() {
            return Err(ScrapeError::invalid("replay needs at least one captured page"));
        }
        Ok(ReplaySession {
            pages,
            current: 0,
            url: None,
        })
    }

    #[instrument(level = "info", skip_all, fields(count = paths.len()))]
    pub async fn from_files(paths: &[PathBuf]) -> Result<Self> {
        let mut pages = Vec::with_capacity(paths.len());
        for path in paths {
            let html = tokio::fs::read_to_string(path).await?;
            debug!(path = %path.display(), bytes = html.len(), "Loaded captured page");
            pages.push(html);
        }
        info!(pages = pages.len(), "Replay session ready");
        Self::new(pages)
    }

    /// Index of the capture currently shown.
    pub fn page_index(&self) -> usize {
        self.current
    }

    fn with_matches<T>(
        &self,
        locator: &Locator,
        f: impl FnOnce(Vec<ElementRef<'_>>) -> T,
    ) -> Result<T> {
        let doc = Html::parse_document(&self.pages[self.current]);
        let matches = resolve(&doc, locator)?;
        Ok(f(matches))
    }
}

fn resolve<'a>(doc: &'a Html, locator: &Locator) -> Result<Vec<ElementRef<'a>>> {
    let mut scope: Option<Vec<ElementRef<'a>>> = None;
    for step in locator.steps() {
        let selector = Selector::parse(&step.css).map_err(|e| ScrapeError::Selector {
            selector: step.css.clone(),
            reason: e.to_string(),
        })?;
        let mut matched: Vec<ElementRef<'a>> = match &scope {
            None => doc.select(&selector).collect(),
            Some(parents) => parents.iter().flat_map(|p| p.select(&selector)).collect(),
        };
        if let Some(n) = step.nth {
            matched = n
                .checked_sub(1)
                .and_then(|i| matched.get(i).copied())
                .into_iter()
                .collect();
        }
        scope = Some(matched);
    }
    Ok(scope.unwrap_or_default())
}

fn shown(el: &ElementRef<'_>) -> bool {
    el.value().attr("hidden").is_none()
}

impl BrowserSession for ReplaySession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        info!(%url, "Replaying captured results for url");
        self.url = Some(url.to_string());
        self.current = 0;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        Ok(self
            .url
            .clone()
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn wait_until_visible(&mut self, locator: &Locator, _timeout: Duration) -> Result<bool> {
        self.is_visible(locator).await
    }

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool> {
        self.with_matches(locator, |m| m.first().is_some_and(shown))
    }

    async fn is_enabled(&mut self, locator: &Locator) -> Result<bool> {
        self.with_matches(locator, |m| {
            m.first()
                .is_some_and(|el| el.value().attr("disabled").is_none())
        })
    }

    async fn count(&mut self, locator: &Locator) -> Result<usize> {
        self.with_matches(locator, |m| m.len())
    }

    async fn text(&mut self, locator: &Locator) -> Result<String> {
        self.with_matches(locator, |m| {
            m.first()
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        })?
        .ok_or_else(|| ScrapeError::ElementNotFound(locator.to_string()))
    }

    async fn attribute(&mut self, locator: &Locator, name: &str) -> Result<Option<String>> {
        self.with_matches(locator, |m| {
            m.first()
                .and_then(|el| el.value().attr(name))
                .map(str::to_string)
        })
    }

    /// Moves to the next capture. On the last capture the page stays as it
    /// is, exactly like a live click that never re-renders.
    async fn click(&mut self, locator: &Locator) -> Result<()> {
        if self.count(locator).await? == 0 {
            return Err(ScrapeError::ElementNotFound(locator.to_string()));
        }
        if self.current + 1 < self.pages.len() {
            self.current += 1;
            debug!(page = self.page_index() + 1, "Advanced to next captured page");
        } else {
            warn!(%locator, page = self.page_index() + 1, "Click on the last captured page left it unchanged");
        }
        Ok(())
    }

    async fn close(self) -> Result<()> {
        Ok(())
    }
}
