//! The search walk: open results, read cards newest-first, stop at the cutoff.

use crate::browser::BrowserSession;
use crate::browser::locators::Locators;
use crate::classify::{count_phrase, has_money};
use crate::dates::normalize_date;
use crate::download::Downloader;
use crate::error::{Result, ScrapeError};
use crate::extract::extract_card;
use crate::models::ResultItem;
use crate::paginate::{PAGE_SIZE, Paginator, parse_total};
use crate::query::SearchQuery;
use chrono::{Local, Months, NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Decision for one normalised date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    /// Older than the cutoff; nothing after it can be newer.
    Stop,
}

/// Inclusive lower bound on publication dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyFilter {
    cutoff: NaiveDate,
}

impl RecencyFilter {
    /// `today` minus `months` calendar months, day clamped to month end.
    pub fn new(today: NaiveDate, months: u32) -> Self {
        let cutoff = today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        RecencyFilter { cutoff }
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Keep dates on or after the cutoff; anything older stops the walk.
    pub fn admit(&self, date: NaiveDate) -> Verdict {
        if date >= self.cutoff {
            Verdict::Keep
        } else {
            Verdict::Stop
        }
    }
}

/// Fail with [`ScrapeError::NoResultsFound`] unless the page lists results.
///
/// # Arguments
/// * `session` - Session already showing the search page
/// * `locators` - Selector table for the results page
/// * `phrase` - Phrase as searched, for the "no results" heading check
/// * `wait` - How long to wait for the results container
///
/// # Errors
/// `NoResultsFound` when the container never shows, the heading says
/// nothing matched, or the list is empty. Browser failures pass through.
#[instrument(level = "info", skip_all, fields(phrase = %phrase))]
pub async fn ensure_results<S: BrowserSession>(
    session: &mut S,
    locators: &Locators,
    phrase: &str,
    wait: Duration,
) -> Result<()> {
    let none = || ScrapeError::NoResultsFound {
        phrase: phrase.to_string(),
    };

    if !session
        .wait_until_visible(&locators.results_container(), wait)
        .await?
    {
        debug!("Results container never became visible");
        return Err(none());
    }

    if session.is_visible(&locators.main_heading()).await? {
        let heading = session.text(&locators.main_heading()).await?;
        if heading.contains(&format!("No search results match the term \"{phrase}\"")) {
            return Err(none());
        }
    }

    if session.count(&locators.result_items()).await? == 0 {
        debug!("Results container is empty");
        return Err(none());
    }
    Ok(())
}

/// Walks the result pages of one search.
pub struct Harvester<'a, S, D> {
    pub session: &'a mut S,
    pub downloader: &'a D,
    pub locators: &'a Locators,
    pub query: &'a SearchQuery,
    pub image_dir: PathBuf,
    pub wait: Duration,
    pub max_pages: Option<usize>,
    /// Source of "now" for relative dates; read once per card.
    pub clock: fn() -> NaiveDateTime,
}

/// Wall-clock "now" in local time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl<'a, S, D> Harvester<'a, S, D>
where
    S: BrowserSession,
    D: Downloader,
{
    /// Collect every result on or after the recency cutoff, in page order.
    ///
    /// # Errors
    /// A card date that cannot be normalised aborts the walk with
    /// [`ScrapeError::Parse`]; browser and download failures pass through.
    #[instrument(level = "info", skip_all, fields(phrase = %self.query.phrase, months = self.query.recency_months))]
    pub async fn run(&mut self) -> Result<Vec<ResultItem>> {
        let filter = RecencyFilter::new((self.clock)().date(), self.query.recency_months);
        info!(cutoff = %filter.cutoff(), "Collecting results");

        let total = self.reported_total().await?;
        let mut paginator = Paginator::new(PAGE_SIZE, self.max_pages);
        let mut items = Vec::new();

        'pages: loop {
            let on_page = self.session.count(&self.locators.result_items()).await?;
            debug!(on_page, page = paginator.pages(), "Reading page");

            for position in 1..=on_page {
                let index = paginator.processed() + 1;
                let card = extract_card(
                    &mut *self.session,
                    self.downloader,
                    self.locators,
                    position,
                    index,
                    &self.image_dir,
                )
                .await?;
                paginator.record();

                let date = normalize_date(&card.published, (self.clock)())?;
                match filter.admit(date) {
                    Verdict::Keep => {
                        debug!(index = card.index, %date, headline = %card.headline, "Keeping result");
                        items.push(ResultItem {
                            has_money: has_money(&card.headline),
                            phrase_count: count_phrase(&card.headline, &self.query.phrase),
                            headline: card.headline,
                            published: card.published,
                            normalized_date: date,
                            image_file: card.image_file,
                        });
                    }
                    Verdict::Stop => {
                        info!(index = card.index, %date, cutoff = %filter.cutoff(), "Reached results older than cutoff");
                        break 'pages;
                    }
                }
            }

            let total = total.unwrap_or(paginator.processed());
            if !paginator
                .advance(&mut *self.session, self.locators, total, self.wait)
                .await?
            {
                break;
            }
        }

        info!(
            kept = items.len(),
            processed = paginator.processed(),
            pages = paginator.pages(),
            "Finished collecting results"
        );
        Ok(items)
    }

    async fn reported_total(&mut self) -> Result<Option<usize>> {
        let loc = self.locators.result_count();
        if self.session.count(&loc).await? == 0 {
            warn!("Result count label not found; paging disabled");
            return Ok(None);
        }
        let label = self.session.text(&loc).await?;
        let total = parse_total(&label);
        if total.is_none() {
            warn!(%label, "Result count label is not numeric; paging disabled");
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::replay::ReplaySession;
    use crate::extract::testing::{RecordingDownloader, media_card, results_page, text_card};
    use serde_yaml::Value;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_now() -> NaiveDateTime {
        ymd(2024, 3, 15).and_hms_opt(12, 0, 0).unwrap()
    }

    fn query(months: i64) -> SearchQuery {
        SearchQuery::new("oil", None, Some(&Value::from(months))).unwrap()
    }

    async fn harvest(pages: Vec<String>, q: &SearchQuery) -> (Result<Vec<ResultItem>>, usize, ReplaySession) {
        let mut session = ReplaySession::new(pages).unwrap();
        session
            .goto("https://www.reuters.com/site-search/?query=oil")
            .await
            .unwrap();
        let dl = RecordingDownloader::default();
        let locators = Locators::default();
        let result = Harvester {
            session: &mut session,
            downloader: &dl,
            locators: &locators,
            query: q,
            image_dir: PathBuf::from("img"),
            wait: Duration::ZERO,
            max_pages: None,
            clock: fixed_now,
        }
        .run()
        .await;
        let downloads = dl.calls.borrow().len();
        (result, downloads, session)
    }

    #[test]
    fn test_cutoff_boundary_is_inclusive() {
        let f = RecencyFilter::new(ymd(2024, 3, 15), 1);
        assert_eq!(f.cutoff(), ymd(2024, 2, 15));
        assert_eq!(f.admit(ymd(2024, 2, 15)), Verdict::Keep);
        assert_eq!(f.admit(ymd(2024, 2, 14)), Verdict::Stop);
        assert_eq!(f.admit(ymd(2024, 3, 15)), Verdict::Keep);
    }

    #[test]
    fn test_cutoff_clamps_month_end() {
        let f = RecencyFilter::new(ymd(2024, 3, 31), 1);
        assert_eq!(f.cutoff(), ymd(2024, 2, 29));
    }

    #[tokio::test]
    async fn test_stops_at_first_old_item() {
        let cards = vec![
            text_card("Oil rises on supply fears", "3 hours ago"),
            media_card("Oil giant pays $1,200.50 fine", "Feb 15, 2024", "/a.jpg", false),
            text_card("Old oil story", "Feb 14, 2024"),
            text_card("Never read", "an hour ago"),
        ];
        let (result, downloads, _) = harvest(vec![results_page(4, &cards, false)], &query(1)).await;
        let items = result.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].normalized_date, ymd(2024, 3, 15));
        assert_eq!(items[0].phrase_count, 1);
        assert!(!items[0].has_money);
        assert_eq!(items[1].normalized_date, ymd(2024, 2, 15));
        assert_eq!(items[1].image_file.as_deref(), Some("image_news2.png"));
        assert!(items[1].has_money);
        assert_eq!(downloads, 1);
    }

    #[tokio::test]
    async fn test_walks_to_second_page() {
        let first: Vec<String> = (1..=20)
            .map(|i| text_card(&format!("Oil story {i}"), "2 hours ago"))
            .collect();
        let second = vec![
            media_card("Oil page two", "Mar. 1, 2024", "/p2.jpg", true),
            text_card("Oil too old", "Jan 2, 2024"),
        ];
        let pages = vec![results_page(22, &first, true), results_page(22, &second, false)];
        let (result, _, session) = harvest(pages, &query(1)).await;
        let items = result.unwrap();
        assert_eq!(session.page_index(), 1);
        assert_eq!(items.len(), 21);
        assert_eq!(items[20].headline, "Oil page two");
        assert_eq!(items[20].image_file.as_deref(), Some("image_news21.png"));
    }

    #[tokio::test]
    async fn test_stuck_next_button_does_not_reread_page() {
        let page = |tag: &str| {
            let cards: Vec<String> = (1..=20)
                .map(|i| text_card(&format!("Oil {tag} {i}"), "2 hours ago"))
                .collect();
            results_page(100, &cards, true)
        };
        let (result, _, session) = harvest(vec![page("one"), page("two")], &query(1)).await;
        let items = result.unwrap();
        assert_eq!(session.page_index(), 1);
        assert_eq!(items.len(), 40);
        let copies = items.iter().filter(|i| i.headline == "Oil two 1").count();
        assert_eq!(copies, 1);
        assert_eq!(items[39].headline, "Oil two 20");
    }

    #[tokio::test]
    async fn test_unparseable_date_aborts() {
        let cards = vec![text_card("Oil", "sometime last week")];
        let (result, _, _) = harvest(vec![results_page(1, &cards, false)], &query(3)).await;
        assert!(matches!(result, Err(ScrapeError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_ensure_results_reports_empty_search() {
        let page = r#"<html><body><h1 id="main-content">No search results match the term "zzz"</h1>
            <div class="search-results__sectionContainer__34n_c"></div></body></html>"#;
        let mut s = ReplaySession::new(vec![page.to_string()]).unwrap();
        let err = ensure_results(&mut s, &Locators::default(), "zzz", Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::NoResultsFound { .. }));
    }

    #[tokio::test]
    async fn test_ensure_results_without_container() {
        let mut s = ReplaySession::new(vec!["<html><body></body></html>".to_string()]).unwrap();
        let err = ensure_results(&mut s, &Locators::default(), "oil", Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::NoResultsFound { .. }));
    }

    #[tokio::test]
    async fn test_ensure_results_ok() {
        let cards = vec![text_card("Oil", "an hour ago")];
        let mut s = ReplaySession::new(vec![results_page(1, &cards, false)]).unwrap();
        ensure_results(&mut s, &Locators::default(), "oil", Duration::ZERO)
            .await
            .unwrap();
    }
}
