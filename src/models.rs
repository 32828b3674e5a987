//! Data models for scraped search results.
//!
//! - [`ScrapedCard`]: the raw fields read off one result card
//! - [`ResultItem`]: a card that survived the recency filter, with its
//!   classifier outputs
//! - [`SearchReport`]: everything a run produced, for the JSON output

use crate::query::SearchQuery;
use chrono::NaiveDate;
use serde::Serialize;

/// Raw fields of one result card, as read from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedCard {
    /// Running 1-based position of the card across all pages.
    pub index: usize,
    pub headline: String,
    /// Date text exactly as displayed ("3 hours ago", "Jan. 5, 2024").
    pub published: String,
    /// File name of the downloaded image, for media cards.
    pub image_file: Option<String>,
}

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub headline: String,
    pub published: String,
    pub normalized_date: NaiveDate,
    pub image_file: Option<String>,
    pub has_money: bool,
    pub phrase_count: usize,
}

/// Everything a run produced.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub query: SearchQuery,
    pub search_url: String,
    /// Local time the report was generated, RFC 3339.
    pub generated_at: String,
    pub cutoff: NaiveDate,
    pub items: Vec<ResultItem>,
}
