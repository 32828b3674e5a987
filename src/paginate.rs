//! Walking the "Next stories" pages of a search.

use crate::browser::BrowserSession;
use crate::browser::locators::Locators;
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Results the site renders per page.
pub const PAGE_SIZE: usize = 20;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

static TOTAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d,]*").unwrap());

/// Parse the result-count label ("1,234" or "1,234 results").
///
/// # Arguments
/// * `label` - Text of the result-count element
///
/// # Returns
/// The first number in the label with thousands separators removed, or
/// `None` when the label carries no number.
pub fn parse_total(label: &str) -> Option<usize> {
    TOTAL_RE
        .find(label)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

/// Identity of the page on screen: its URL and the text of its first result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMark {
    url: String,
    lead: Option<String>,
}

impl PageMark {
    /// Read the mark of the page currently shown by `session`.
    ///
    /// # Errors
    /// Propagates browser failures from the session.
    pub async fn read<S: BrowserSession>(session: &mut S, locators: &Locators) -> Result<Self> {
        let url = session.current_url().await?;
        let first = locators.item(1);
        let lead = if session.count(&first).await? > 0 {
            Some(session.text(&first).await?)
        } else {
            None
        };
        Ok(PageMark { url, lead })
    }
}

/// Counts processed results and decides when to turn the page.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: usize,
    processed: usize,
    pages: usize,
    max_pages: Option<usize>,
}

impl Paginator {
    /// Start on page one with nothing processed.
    ///
    /// # Arguments
    /// * `page_size` - Results the site shows per page
    /// * `max_pages` - Optional cap on pages visited, including the first
    pub fn new(page_size: usize, max_pages: Option<usize>) -> Self {
        Paginator {
            page_size,
            processed: 0,
            pages: 1,
            max_pages,
        }
    }

    /// Count one more result as read.
    pub fn record(&mut self) {
        self.processed += 1;
    }

    /// Results read so far across all pages.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Pages visited so far, counting the first.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// True once a full page has been processed and the site reports more
    /// results than that.
    pub fn should_advance(&self, total: usize) -> bool {
        if self.max_pages.is_some_and(|max| self.pages >= max) {
            return false;
        }
        self.processed >= self.page_size && total > self.processed
    }

    /// Click through to the next page if warranted and the control is
    /// enabled.
    ///
    /// The page is only counted as turned once its [`PageMark`] differs from
    /// the one read before the click and the results container is visible.
    ///
    /// # Returns
    /// `true` when a new page is showing, `false` when the walk should end
    /// (nothing more to read, "Next" disabled, or the page never changed
    /// within `wait`).
    ///
    /// # Errors
    /// Propagates browser failures from the session.
    pub async fn advance<S: BrowserSession>(
        &mut self,
        session: &mut S,
        locators: &Locators,
        total: usize,
        wait: Duration,
    ) -> Result<bool> {
        if !self.should_advance(total) {
            debug!(processed = self.processed, total, "No further page needed");
            return Ok(false);
        }
        let next = locators.next_button();
        if !session.is_enabled(&next).await? {
            debug!(processed = self.processed, total, "Next control is disabled");
            return Ok(false);
        }
        let before = PageMark::read(session, locators).await?;
        session.click(&next).await?;

        let started = Instant::now();
        loop {
            if PageMark::read(session, locators).await? != before {
                break;
            }
            if started.elapsed() >= wait {
                warn!(processed = self.processed, total, "Page did not change after clicking next");
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }

        let remaining = wait.saturating_sub(started.elapsed());
        if !session
            .wait_until_visible(&locators.results_container(), remaining)
            .await?
        {
            debug!("Results container did not reappear after paging");
            return Ok(false);
        }
        self.pages += 1;
        info!(page = self.pages, processed = self.processed, total, "Moved to next results page");
        Ok(true)
    }
}
