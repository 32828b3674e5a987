//! JSON report output.
//!
//! Serialises a [`SearchReport`] next to the spreadsheet so the normalised
//! dates and the exact query that produced the rows are kept alongside it.

use crate::error::Result;
use crate::models::SearchReport;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `report` as pretty-printed JSON to `path`, creating parent
/// directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(report: &SearchReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        info!(dir = %parent.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(items = report.items.len(), "Wrote JSON report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultItem;
    use crate::query::SearchQuery;
    use chrono::NaiveDate;
    use serde_yaml::Value;

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("oil.json");
        let report = SearchReport {
            query: SearchQuery::new("oil", Some(&Value::from("World")), Some(&Value::from(3))).unwrap(),
            search_url: "https://www.reuters.com/site-search/?query=oil".to_string(),
            generated_at: "2024-03-15T12:00:00+00:00".to_string(),
            cutoff: NaiveDate::from_ymd_opt(2023, 12, 15).unwrap(),
            items: vec![ResultItem {
                headline: "Oil rises".to_string(),
                published: "3 hours ago".to_string(),
                normalized_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                image_file: Some("image_news1.png".to_string()),
                has_money: false,
                phrase_count: 1,
            }],
        };

        write_report(&report, &path).await.unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["query"]["section"], "world");
        assert_eq!(parsed["items"][0]["normalized_date"], "2024-03-15");
        assert_eq!(parsed["items"][0]["image_file"], "image_news1.png");
    }
}
