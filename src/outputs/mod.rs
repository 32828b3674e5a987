//! Output generation for a finished search.
//!
//! # Submodules
//!
//! - [`sheet`]: the spreadsheet (`.xlsx` workbook or CSV) with one row per kept result
//! - [`json`]: optional JSON report with normalised dates and the query
//!
//! # Output Structure
//!
//! ```text
//! output/
//! ├── news.xlsx
//! ├── news.json            # only with --json-output
//! └── images/
//!     ├── image_news1.png
//!     └── image_news4.png
//! ```

pub mod json;
pub mod sheet;
