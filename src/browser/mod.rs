//! Browser session abstraction.
//!
//! The harvester only ever talks to a [`BrowserSession`]: open a URL, wait for
//! something to show up, read text and attributes, click. Two sessions
//! implement it:
//!
//! | Session | Module | Backed by |
//! |---------|--------|-----------|
//! | Live WebDriver | [`webdriver`] | `fantoccini` against chromedriver |
//! | Replay | [`replay`] | captured HTML pages parsed with `scraper` |
//!
//! Elements are addressed with a [`Locator`]: a chain of CSS steps, each
//! optionally narrowed to its n-th match (1-based), the same shape as an XPath
//! expression like `(//li[@class="item"])[3]//time`.

pub mod locators;
pub mod replay;
pub mod webdriver;

use crate::error::Result;
use std::fmt;
use std::time::Duration;

/// One CSS step of a [`Locator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub css: String,
    pub nth: Option<usize>,
}

/// A scoped element query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    steps: Vec<Step>,
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator {
            steps: vec![Step {
                css: selector.into(),
                nth: None,
            }],
        }
    }

    /// Keep only the `n`-th (1-based) match of the last step.
    pub fn nth(mut self, n: usize) -> Self {
        if let Some(last) = self.steps.last_mut() {
            last.nth = Some(n);
        }
        self
    }

    /// Descend into matches of `selector` below the current matches.
    pub fn then(mut self, selector: impl Into<String>) -> Self {
        self.steps.push(Step {
            css: selector.into(),
            nth: None,
        });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" >> ")?;
            }
            match step.nth {
                Some(n) => write!(f, "({})[{}]", step.css, n)?,
                None => f.write_str(&step.css)?,
            }
        }
        Ok(())
    }
}

/// Everything the search flow needs from a browser.
///
/// Queries that address a missing element return `Ok(false)` / `Ok(None)`
/// where the answer is a yes/no, and [`ScrapeError::ElementNotFound`] where a
/// value was required.
///
/// [`ScrapeError::ElementNotFound`]: crate::error::ScrapeError::ElementNotFound
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// URL of the page currently loaded.
    async fn current_url(&mut self) -> Result<String>;

    /// Poll until `locator` is visible or `timeout` passes.
    async fn wait_until_visible(&mut self, locator: &Locator, timeout: Duration) -> Result<bool>;

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool>;

    /// True if the element exists and is not disabled.
    async fn is_enabled(&mut self, locator: &Locator) -> Result<bool>;

    async fn count(&mut self, locator: &Locator) -> Result<usize>;

    /// Visible text of the first match, whitespace-collapsed.
    async fn text(&mut self, locator: &Locator) -> Result<String>;

    async fn attribute(&mut self, locator: &Locator, name: &str) -> Result<Option<String>>;

    async fn click(&mut self, locator: &Locator) -> Result<()>;

    async fn close(self) -> Result<()>;
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_chain() {
        let loc = Locator::css("li.item").nth(3).then("time");
        assert_eq!(loc.steps().len(), 2);
        assert_eq!(loc.steps()[0].nth, Some(3));
        assert_eq!(loc.steps()[1].nth, None);
        assert_eq!(loc.to_string(), "(li.item)[3] >> time");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Oil \n rises\t"), "Oil rises");
    }
}
