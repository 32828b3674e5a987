//! Spreadsheet export.
//!
//! One row per kept result, in extraction order, under the header
//! `Title, Date, Image FileName, Count of Search Phrase, Money Present`.
//! The `Date` column carries the date text as it appeared on the card.
//!
//! A path ending in `.xlsx` gets an Excel workbook with a single sheet;
//! anything else is written as CSV.

use crate::error::Result;
use crate::models::ResultItem;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::{info, instrument};

pub const HEADER: [&str; 5] = [
    "Title",
    "Date",
    "Image FileName",
    "Count of Search Phrase",
    "Money Present",
];

/// Output format picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => SheetFormat::Xlsx,
            _ => SheetFormat::Csv,
        }
    }
}

/// Write `items` to `path`, replacing any existing file.
///
/// # Arguments
/// * `items` - Kept results in extraction order
/// * `path` - Destination; parent directories are created as needed
///
/// # Errors
/// I/O failures and writer errors from `csv` or `rust_xlsxwriter`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = items.len()))]
pub fn write_results(items: &[ResultItem], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let format = SheetFormat::for_path(path);
    match format {
        SheetFormat::Xlsx => write_xlsx(items, path)?,
        SheetFormat::Csv => write_csv(items, path)?,
    }
    info!(?format, "Wrote spreadsheet");
    Ok(())
}

fn money_label(item: &ResultItem) -> &'static str {
    if item.has_money { "True" } else { "False" }
}

fn write_csv(items: &[ResultItem], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(HEADER)?;
    for item in items {
        let count = item.phrase_count.to_string();
        wtr.write_record([
            item.headline.as_str(),
            item.published.as_str(),
            item.image_file.as_deref().unwrap_or(""),
            count.as_str(),
            money_label(item),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_xlsx(items: &[ResultItem], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, title) in (0u16..).zip(HEADER) {
        sheet.write_string_with_format(0, col, title, &bold)?;
    }
    for (row, item) in (1u32..).zip(items) {
        sheet.write_string(row, 0, item.headline.as_str())?;
        sheet.write_string(row, 1, item.published.as_str())?;
        sheet.write_string(row, 2, item.image_file.as_deref().unwrap_or(""))?;
        sheet.write_number(row, 3, item.phrase_count as f64)?;
        sheet.write_string(row, 4, money_label(item))?;
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(headline: &str, image: Option<&str>, money: bool, count: usize) -> ResultItem {
        ResultItem {
            headline: headline.to_string(),
            published: "Jan. 5, 2024".to_string(),
            normalized_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            image_file: image.map(str::to_string),
            has_money: money,
            phrase_count: count,
        }
    }

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(SheetFormat::for_path(Path::new("out/news.xlsx")), SheetFormat::Xlsx);
        assert_eq!(SheetFormat::for_path(Path::new("NEWS.XLSX")), SheetFormat::Xlsx);
        assert_eq!(SheetFormat::for_path(Path::new("news.csv")), SheetFormat::Csv);
        assert_eq!(SheetFormat::for_path(Path::new("news")), SheetFormat::Csv);
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("news.csv");
        let items = vec![
            item("Oil, gas rally", Some("image_news1.png"), false, 1),
            item("Fine of $5 USD", None, true, 0),
        ];
        write_results(&items, &path).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines[0],
            "Title,Date,Image FileName,Count of Search Phrase,Money Present"
        );
        assert_eq!(lines[1], "\"Oil, gas rally\",\"Jan. 5, 2024\",image_news1.png,1,False");
        assert_eq!(lines[2], "Fine of $5 USD,\"Jan. 5, 2024\",,0,True");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_results_still_get_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.csv");
        write_results(&[], &path).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body.lines().count(), 1);
    }

    #[test]
    fn test_writes_xlsx_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("news.xlsx");
        let items = vec![item("Oil prices climb", Some("image_news1.png"), true, 2)];
        write_results(&items, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }
}
