//! Run settings: YAML file merged with command-line flags.
//!
//! ```yaml
//! phrase: oil
//! section: ""          # blank or missing = all sections
//! months: 1
//! output: output/news.xlsx
//! image_dir: output/images
//! locators:
//!   next_button: 'button[aria-label*="Next stories"]'
//! ```
//!
//! `section` and `months` are kept as raw YAML values until
//! [`Settings::query`] validates them, so a file that says `section: 42`
//! fails as invalid input rather than as a YAML type error.

use crate::browser::locators::Locators;
use crate::browser::webdriver::DEFAULT_WEBDRIVER_URL;
use crate::cli::Cli;
use crate::error::{Result, ScrapeError};
use crate::query::SearchQuery;
use crate::search::DEFAULT_BASE_URL;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_OUTPUT: &str = "output/news.xlsx";
pub const DEFAULT_IMAGE_DIR: &str = "output/images";
pub const DEFAULT_WAIT_SECS: u64 = 30;

/// Contents of the optional YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub phrase: Option<String>,
    pub section: Option<Value>,
    pub months: Option<Value>,
    pub output: Option<PathBuf>,
    pub json_output: Option<PathBuf>,
    pub image_dir: Option<PathBuf>,
    pub webdriver_url: Option<String>,
    pub headless: Option<bool>,
    pub base_url: Option<String>,
    pub wait_secs: Option<u64>,
    pub max_pages: Option<usize>,
    pub locators: Option<Locators>,
}

impl FileConfig {
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let config: FileConfig = serde_yaml::from_str(&raw)?;
        debug!(?config, "Loaded config file");
        Ok(config)
    }
}

/// Fully merged settings for one run.
#[derive(Debug)]
pub struct Settings {
    pub phrase: Option<String>,
    pub section: Option<Value>,
    pub months: Option<Value>,
    pub output: PathBuf,
    pub json_output: Option<PathBuf>,
    pub image_dir: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,
    pub base_url: String,
    pub wait: Duration,
    pub max_pages: Option<usize>,
    pub locators: Locators,
    pub replay: Vec<PathBuf>,
}

impl Settings {
    /// Merge `cli` over `file`, then fall back to defaults.
    pub fn merge(cli: Cli, file: FileConfig) -> Self {
        Settings {
            phrase: cli.phrase.or(file.phrase),
            section: cli.section.map(Value::String).or(file.section),
            months: cli.months.map(Value::from).or(file.months),
            output: cli
                .output
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            json_output: cli.json_output.or(file.json_output),
            image_dir: cli
                .image_dir
                .or(file.image_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR)),
            webdriver_url: cli
                .webdriver_url
                .or(file.webdriver_url)
                .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string()),
            headless: cli.headless || file.headless.unwrap_or(false),
            base_url: file.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            wait: Duration::from_secs(cli.wait_secs.or(file.wait_secs).unwrap_or(DEFAULT_WAIT_SECS)),
            max_pages: cli.max_pages.or(file.max_pages),
            locators: file.locators.unwrap_or_default(),
            replay: cli.replay,
        }
    }

    /// Validate the search parameters.
    pub fn query(&self) -> Result<SearchQuery> {
        let phrase = self
            .phrase
            .as_deref()
            .ok_or_else(|| ScrapeError::invalid("search phrase is not set"))?;
        SearchQuery::new(phrase, self.section.as_ref(), self.months.as_ref())
    }
}
