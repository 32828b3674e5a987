//! Command-line interface definitions.
//!
//! Every search parameter can come from a flag, an environment variable or
//! the YAML file named by `--config`; flags win over the file.

use clap::Parser;
use std::path::PathBuf;

/// Search Reuters for a phrase and export recent headlines to a spreadsheet.
///
/// # Examples
///
/// ```sh
/// # Last month of "oil" across all sections
/// news_search_export --phrase oil --months 1
///
/// # Business section, past six months, headless, with a JSON report
/// news_search_export -p "interest rates" -s business -n 6 --headless --json-output output/news.json
///
/// # Offline run against saved result pages
/// news_search_export -p oil -n 1 --replay page1.html --replay page2.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Phrase to search for
    #[arg(short, long, env = "NEWS_PHRASE")]
    pub phrase: Option<String>,

    /// Section to search in; empty means all sections
    #[arg(short, long, env = "NEWS_SECTION")]
    pub section: Option<String>,

    /// Recency window in months
    #[arg(short = 'n', long, env = "NEWS_MONTHS", allow_negative_numbers = true)]
    pub months: Option<i64>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Spreadsheet output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional JSON report path
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Directory downloaded images are written to
    #[arg(long)]
    pub image_dir: Option<PathBuf>,

    /// WebDriver endpoint (chromedriver)
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Seconds to wait for the results to appear
    #[arg(long)]
    pub wait_secs: Option<u64>,

    /// Stop after this many result pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Replay captured result pages instead of opening a browser (repeatable)
    #[arg(long)]
    pub replay: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "news_search_export",
            "--phrase",
            "oil",
            "--section",
            "Business",
            "--months",
            "3",
            "--headless",
        ]);

        assert_eq!(cli.phrase.as_deref(), Some("oil"));
        assert_eq!(cli.section.as_deref(), Some("Business"));
        assert_eq!(cli.months, Some(3));
        assert!(cli.headless);
        assert!(cli.replay.is_empty());
    }

    #[test]
    fn test_cli_short_flags_and_replay() {
        let cli = Cli::parse_from([
            "news_search_export",
            "-p",
            "oil",
            "-n",
            "-1",
            "-o",
            "/tmp/news.csv",
            "--replay",
            "a.html",
            "--replay",
            "b.html",
        ]);

        assert_eq!(cli.months, Some(-1));
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/news.csv")));
        assert_eq!(cli.replay.len(), 2);
    }
}
