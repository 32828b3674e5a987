//! Validated search parameters.
//!
//! Raw values arrive loosely typed (YAML scalars, CLI strings); a
//! [`SearchQuery`] can only be built through [`SearchQuery::new`], which
//! rejects every shape the search page cannot express. Nothing touches the
//! browser until this has succeeded.

use crate::error::{Result, ScrapeError};
use serde::Serialize;
use serde_yaml::Value;
use std::fmt;
use tracing::warn;

/// Section slugs the Reuters search page offers in its filter dropdown.
pub const KNOWN_SECTIONS: &[&str] = &[
    "world",
    "business",
    "legal",
    "markets",
    "breakingviews",
    "technology",
    "sustainability",
    "science",
    "sports",
    "lifestyle",
];

/// The section filter of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Section {
    All,
    Named(String),
}

impl Section {
    /// Interpret a raw config value.
    ///
    /// Missing, null and blank strings mean "all sections"; any other string is
    /// lower-cased. Numbers, lists and maps are rejected.
    pub fn from_value(value: Option<&Value>) -> Result<Self> {
        match value {
            None | Some(Value::Null) => Ok(Section::All),
            Some(Value::String(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    Ok(Section::All)
                } else {
                    let slug = s.to_lowercase();
                    if !KNOWN_SECTIONS.contains(&slug.as_str()) && slug != "all" {
                        warn!(section = %slug, "Section is not one of the known categories");
                    }
                    if slug == "all" {
                        Ok(Section::All)
                    } else {
                        Ok(Section::Named(slug))
                    }
                }
            }
            Some(other) => Err(ScrapeError::invalid(format!(
                "section must be a string, got {}",
                describe(other)
            ))),
        }
    }

    /// The `section` value sent to the site.
    pub fn as_str(&self) -> &str {
        match self {
            Section::All => "all",
            Section::Named(s) => s,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Section> for String {
    fn from(section: Section) -> Self {
        section.as_str().to_string()
    }
}

/// The `date` token of the search URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecencyWindow {
    PastMonth,
    PastYear,
    All,
}

impl RecencyWindow {
    /// Map a recency in months onto the coarser window the site filters by.
    ///
    /// # Returns
    /// `PastMonth` for 1, `PastYear` for 2 through 12, `All` beyond that.
    ///
    /// # Errors
    /// [`ScrapeError::InvalidInput`] for zero.
    pub fn from_months(months: u32) -> Result<Self> {
        match months {
            0 => Err(ScrapeError::invalid("months must be greater than zero")),
            1 => Ok(RecencyWindow::PastMonth),
            2..=12 => Ok(RecencyWindow::PastYear),
            _ => Ok(RecencyWindow::All),
        }
    }

    /// The `date` token sent to the site.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecencyWindow::PastMonth => "past_month",
            RecencyWindow::PastYear => "past_year",
            RecencyWindow::All => "all",
        }
    }

    /// Inverse of [`RecencyWindow::as_str`].
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "past_month" => Some(RecencyWindow::PastMonth),
            "past_year" => Some(RecencyWindow::PastYear),
            "all" => Some(RecencyWindow::All),
            _ => None,
        }
    }
}

/// Parse the months value: a positive integer, nothing else.
///
/// # Errors
/// [`ScrapeError::InvalidInput`] when the value is missing, blank, zero,
/// negative, fractional or not a number.
pub fn months_from_value(value: Option<&Value>) -> Result<u32> {
    match value {
        None | Some(Value::Null) => Err(ScrapeError::invalid("months is not set")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ScrapeError::invalid("months is not set"))
        }
        Some(Value::Number(n)) => match n.as_i64() {
            Some(m) if m > 0 => u32::try_from(m)
                .map_err(|_| ScrapeError::invalid(format!("months {m} is out of range"))),
            Some(m) => Err(ScrapeError::invalid(format!(
                "months must be greater than zero, got {m}"
            ))),
            None => Err(ScrapeError::invalid(format!(
                "months must be a whole number, got {n}"
            ))),
        },
        Some(other) => Err(ScrapeError::invalid(format!(
            "months must be an integer, got {}",
            describe(other)
        ))),
    }
}

/// A search that is known to be expressible as a site-search URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub phrase: String,
    pub section: Section,
    pub recency_months: u32,
    pub recency: RecencyWindow,
}

impl SearchQuery {
    /// Validate raw parameters into a query.
    ///
    /// # Arguments
    /// * `phrase` - Search phrase; surrounding whitespace is trimmed
    /// * `section` - Raw section value, see [`Section::from_value`]
    /// * `months` - Raw months value, see [`months_from_value`]
    ///
    /// # Errors
    /// [`ScrapeError::InvalidInput`] for a blank phrase, a non-string
    /// section or a months value that is not a positive integer.
    pub fn new(phrase: &str, section: Option<&Value>, months: Option<&Value>) -> Result<Self> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(ScrapeError::invalid("search phrase is empty"));
        }
        let section = Section::from_value(section)?;
        let recency_months = months_from_value(months)?;
        let recency = RecencyWindow::from_months(recency_months)?;
        Ok(SearchQuery {
            phrase: phrase.to_string(),
            section,
            recency_months,
            recency,
        })
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
