//! Site-search URL construction.
//!
//! The search page is driven entirely through its query string:
//!
//! ```text
//! https://www.reuters.com/site-search/?query=oil&section=all&offset=0&date=past_month
//! ```

use crate::error::{Result, ScrapeError};
use crate::query::{RecencyWindow, SearchQuery};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.reuters.com/site-search/";

/// Build the search URL for `query` against `base`.
///
/// The phrase is lower-cased and every parameter is form-encoded; `offset`
/// is always 0 because later pages are reached with the "Next" control.
///
/// # Errors
/// [`ScrapeError::InvalidInput`] when `base` is not an absolute URL.
pub fn build_search_url(base: &str, query: &SearchQuery) -> Result<String> {
    let mut url = Url::parse(base)
        .map_err(|e| ScrapeError::invalid(format!("base url {base:?} is not valid: {e}")))?;
    url.query_pairs_mut()
        .clear()
        .append_pair("query", &query.phrase.to_lowercase())
        .append_pair("section", query.section.as_str())
        .append_pair("offset", "0")
        .append_pair("date", query.recency.as_str());
    Ok(url.to_string())
}

/// The parameters carried by a search URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub section: String,
    pub offset: u32,
    pub date: RecencyWindow,
}

impl SearchParams {
    /// Read the search parameters back out of a URL built by
    /// [`build_search_url`].
    pub fn from_url(raw: &str) -> Result<Self> {
        let url = Url::parse(raw)
            .map_err(|e| ScrapeError::invalid(format!("search url {raw:?} is not valid: {e}")))?;

        let mut query = None;
        let mut section = None;
        let mut offset = 0;
        let mut date = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "query" => query = Some(value.into_owned()),
                "section" => section = Some(value.into_owned()),
                "offset" => {
                    offset = value
                        .parse()
                        .map_err(|_| ScrapeError::invalid(format!("offset {value:?}")))?
                }
                "date" => {
                    date = Some(RecencyWindow::from_token(&value).ok_or_else(|| {
                        ScrapeError::invalid(format!("unknown date token {value:?}"))
                    })?)
                }
                _ => {}
            }
        }

        Ok(SearchParams {
            query: query.ok_or_else(|| ScrapeError::invalid("search url has no query"))?,
            section: section.unwrap_or_else(|| "all".to_string()),
            offset,
            date: date.ok_or_else(|| ScrapeError::invalid("search url has no date"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn query(phrase: &str, section: &str, months: i64) -> SearchQuery {
        SearchQuery::new(
            phrase,
            Some(&Value::from(section)),
            Some(&Value::from(months)),
        )
        .unwrap()
    }

    #[test]
    fn test_build_search_url() {
        let url = build_search_url(DEFAULT_BASE_URL, &query("Oil", "", 1)).unwrap();
        assert_eq!(
            url,
            "https://www.reuters.com/site-search/?query=oil&section=all&offset=0&date=past_month"
        );
    }

    #[test]
    fn test_phrase_is_encoded() {
        let url = build_search_url(DEFAULT_BASE_URL, &query("Interest Rates", "Markets", 6)).unwrap();
        assert!(url.contains("query=interest+rates"));
        assert!(url.contains("section=markets"));
        assert!(url.ends_with("date=past_year"));
    }

    #[test]
    fn test_round_trip() {
        let url = build_search_url(DEFAULT_BASE_URL, &query("oil", "", 1)).unwrap();
        let params = SearchParams::from_url(&url).unwrap();
        assert_eq!(params.query, "oil");
        assert_eq!(params.section, "all");
        assert_eq!(params.offset, 0);
        assert_eq!(params.date, RecencyWindow::PastMonth);
    }

    #[test]
    fn test_round_trip_multi_word() {
        let url = build_search_url(DEFAULT_BASE_URL, &query("breaking news", "world", 24)).unwrap();
        let params = SearchParams::from_url(&url).unwrap();
        assert_eq!(params.query, "breaking news");
        assert_eq!(params.section, "world");
        assert_eq!(params.date, RecencyWindow::All);
    }

    #[test]
    fn test_date_token_at_month_boundaries() {
        let date = |m: i64| {
            let url = build_search_url(DEFAULT_BASE_URL, &query("oil", "", m)).unwrap();
            SearchParams::from_url(&url).unwrap().date.as_str()
        };
        assert_eq!(date(1), "past_month");
        assert_eq!(date(2), "past_year");
        assert_eq!(date(12), "past_year");
        assert_eq!(date(13), "all");
    }

    #[test]
    fn test_bad_base_url() {
        assert!(build_search_url("not a url", &query("oil", "", 1)).is_err());
    }
}
