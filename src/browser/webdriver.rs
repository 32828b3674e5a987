//! Live browser session over WebDriver.
//!
//! Connects to a running chromedriver (default `http://localhost:9515`) with
//! `fantoccini` and resolves [`Locator`] chains one CSS step at a time.

use super::{BrowserSession, Locator, collapse_whitespace};
use crate::error::{Result, ScrapeError};
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument};
use ::webdriver::capabilities::Capabilities;

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct WebDriverSession {
    client: Client,
}

/// Chrome capabilities for a maximised, optionally headless window.
pub fn chrome_capabilities(headless: bool) -> Capabilities {
    let mut args = vec![json!("--start-maximized"), json!("--window-size=1920,1080")];
    if headless {
        args.push(json!("--headless"));
        args.push(json!("--disable-gpu"));
    }
    let mut caps = Capabilities::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

impl WebDriverSession {
    #[instrument(level = "info", skip_all, fields(%webdriver_url, headless = headless))]
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self> {
        let client = ClientBuilder::native()
            .capabilities(chrome_capabilities(headless))
            .connect(webdriver_url)
            .await?;
        info!("WebDriver session established");
        Ok(WebDriverSession { client })
    }

    async fn resolve(&self, locator: &Locator) -> Result<Vec<Element>> {
        let mut scope: Option<Vec<Element>> = None;
        for step in locator.steps() {
            let mut matched = match scope {
                None => self.client.find_all(WdLocator::Css(&step.css)).await?,
                Some(parents) => {
                    let mut found = Vec::new();
                    for parent in &parents {
                        found.extend(parent.find_all(WdLocator::Css(&step.css)).await?);
                    }
                    found
                }
            };
            if let Some(n) = step.nth {
                matched = n
                    .checked_sub(1)
                    .and_then(|i| matched.into_iter().nth(i))
                    .into_iter()
                    .collect();
            }
            scope = Some(matched);
        }
        Ok(scope.unwrap_or_default())
    }

    async fn first(&self, locator: &Locator) -> Result<Option<Element>> {
        Ok(self.resolve(locator).await?.into_iter().next())
    }
}

impl BrowserSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        debug!(%url, "Navigating");
        self.client.goto(url).await?;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn wait_until_visible(&mut self, locator: &Locator, timeout: Duration) -> Result<bool> {
        let t0 = Instant::now();
        loop {
            if self.is_visible(locator).await? {
                debug!(%locator, elapsed_ms = t0.elapsed().as_millis() as u64, "Element visible");
                return Ok(true);
            }
            if t0.elapsed() >= timeout {
                debug!(%locator, ?timeout, "Gave up waiting for element");
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn is_visible(&mut self, locator: &Locator) -> Result<bool> {
        match self.first(locator).await? {
            Some(el) => Ok(el.is_displayed().await?),
            None => Ok(false),
        }
    }

    async fn is_enabled(&mut self, locator: &Locator) -> Result<bool> {
        match self.first(locator).await? {
            Some(el) => Ok(el.is_enabled().await?),
            None => Ok(false),
        }
    }

    async fn count(&mut self, locator: &Locator) -> Result<usize> {
        Ok(self.resolve(locator).await?.len())
    }

    async fn text(&mut self, locator: &Locator) -> Result<String> {
        let el = self
            .first(locator)
            .await?
            .ok_or_else(|| ScrapeError::ElementNotFound(locator.to_string()))?;
        Ok(collapse_whitespace(&el.text().await?))
    }

    async fn attribute(&mut self, locator: &Locator, name: &str) -> Result<Option<String>> {
        match self.first(locator).await? {
            Some(el) => Ok(el.attr(name).await?),
            None => Ok(None),
        }
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        let el = self
            .first(locator)
            .await?
            .ok_or_else(|| ScrapeError::ElementNotFound(locator.to_string()))?;
        el.click().await?;
        Ok(())
    }

    async fn close(self) -> Result<()> {
        self.client.close().await?;
        info!("WebDriver session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_capabilities() {
        let caps = chrome_capabilities(true);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless")));
        assert!(args.contains(&json!("--start-maximized")));
    }

    #[test]
    fn test_headed_capabilities() {
        let caps = chrome_capabilities(false);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.contains(&json!("--headless")));
    }
}
