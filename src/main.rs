//! # News Search Export
//!
//! Drives a browser through Reuters site-search results for a phrase, reads
//! each result card (headline, date, image), classifies the headline (money
//! mentioned? how often does the phrase occur?) and exports the cards
//! published inside the recency window to a spreadsheet.
//!
//! ## Usage
//!
//! ```sh
//! chromedriver --port=9515 &
//! news_search_export --phrase oil --months 1
//! ```
//!
//! ## Pipeline
//!
//! 1. **Validate**: merge flags and config file into a [`query::SearchQuery`]
//! 2. **Open**: build the search URL and load it in the browser session
//! 3. **Harvest**: read cards newest-first across pages until the cutoff
//! 4. **Export**: write the spreadsheet (and optionally a JSON report)

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod classify;
mod cli;
mod config;
mod dates;
mod download;
mod error;
mod extract;
mod harvest;
mod models;
mod outputs;
mod paginate;
mod query;
mod search;
mod utils;

use browser::BrowserSession;
use browser::replay::ReplaySession;
use browser::webdriver::WebDriverSession;
use cli::Cli;
use config::{FileConfig, Settings};
use download::{Downloader, HttpDownloader};
use error::ScrapeError;
use harvest::{Harvester, RecencyFilter, ensure_results, local_now};
use models::SearchReport;
use outputs::{json, sheet};
use query::SearchQuery;
use utils::{ensure_writable_dir, format_duration, truncate_for_log};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_search_export starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let file = match &args.config {
        Some(path) => FileConfig::load(path).await?,
        None => FileConfig::default(),
    };
    let settings = Settings::merge(args, file);
    let downloader = HttpDownloader::new();

    let outcome = if settings.replay.is_empty() {
        execute(
            &settings,
            || WebDriverSession::connect(&settings.webdriver_url, settings.headless),
            &downloader,
        )
        .await
    } else {
        execute(&settings, || ReplaySession::from_files(&settings.replay), &downloader).await
    };

    match outcome {
        Ok(()) => {}
        Err(ScrapeError::NoResultsFound { phrase }) => {
            info!(%phrase, "No news found for the searched phrase; nothing exported");
        }
        Err(e) => {
            error!(error = %e, "Search run failed");
            return Err(e.into());
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        elapsed = %format_duration(elapsed),
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Validate the search, then open a session with `open` and run it.
///
/// `open` is only called once the query is known to be valid, so bad input
/// never starts a browser.
///
/// # Errors
/// [`ScrapeError::InvalidInput`] before anything is opened, otherwise
/// whatever the session or the search run fails with.
async fn execute<S, F, Fut, D>(settings: &Settings, open: F, downloader: &D) -> Result<(), ScrapeError>
where
    S: BrowserSession,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<S, ScrapeError>>,
    D: Downloader,
{
    let query = match settings.query() {
        Ok(q) => q,
        Err(e) => {
            error!(error = %e, "Invalid search parameters");
            return Err(e);
        }
    };
    info!(phrase = %query.phrase, section = %query.section, months = query.recency_months, "Search parameters");

    let session = open().await?;
    run(session, settings, &query, downloader).await
}

/// Run one search on `session`, closing it whatever the outcome.
#[instrument(level = "info", skip_all)]
async fn run<S: BrowserSession, D: Downloader>(
    mut session: S,
    settings: &Settings,
    query: &SearchQuery,
    downloader: &D,
) -> Result<(), ScrapeError> {
    let result = search_and_export(&mut session, settings, query, downloader).await;
    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close browser session");
    }
    result
}

async fn search_and_export<S: BrowserSession, D: Downloader>(
    session: &mut S,
    settings: &Settings,
    query: &SearchQuery,
    downloader: &D,
) -> Result<(), ScrapeError> {
    ensure_writable_dir(&settings.image_dir).await?;

    let search_url = search::build_search_url(&settings.base_url, query)?;
    let params = search::SearchParams::from_url(&search_url)?;
    info!(
        url = %search_url,
        query = %params.query,
        section = %params.section,
        offset = params.offset,
        date = params.date.as_str(),
        "Opening search results"
    );
    session.goto(&search_url).await?;

    ensure_results(session, &settings.locators, &query.phrase, settings.wait).await?;

    let items = Harvester {
        session: &mut *session,
        downloader,
        locators: &settings.locators,
        query,
        image_dir: settings.image_dir.clone(),
        wait: settings.wait,
        max_pages: settings.max_pages,
        clock: local_now,
    }
    .run()
    .await?;

    for item in &items {
        debug!(
            headline = %truncate_for_log(&item.headline, 80),
            date = %item.normalized_date,
            money = item.has_money,
            count = item.phrase_count,
            "Exporting row"
        );
    }

    sheet::write_results(&items, &settings.output)?;
    info!(path = %settings.output.display(), rows = items.len(), "Spreadsheet written");

    if let Some(path) = &settings.json_output {
        let now = Local::now();
        let report = SearchReport {
            query: query.clone(),
            search_url,
            generated_at: now.to_rfc3339(),
            cutoff: RecencyFilter::new(now.date_naive(), query.recency_months).cutoff(),
            items,
        };
        json::write_report(&report, path).await?;
    }

    Ok(())
}
