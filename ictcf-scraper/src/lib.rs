//! Scraper for the iCTCF patient resource.
//!
//! Walks the paginated results table, follows each patient's detail page
//! for extra overview fields, and exports everything to one workbook.
//!
//! - [`urls`]: request URL construction
//! - [`record`]: row-oriented dataset
//! - [`table`]: results-table parsing and pagination detection
//! - [`detail`]: per-patient overview lookup
//! - [`export`]: xlsx output
//! - [`run()`] / [`scrape()`]: the end-to-end workflow
pub mod detail;
pub mod export;
pub mod record;
pub mod run;
pub mod screenshot;
pub mod table;
pub mod urls;

pub use record::{Dataset, PatientRecord, RowOrigin};
pub use run::{RunSummary, run, run_and_close, scrape};
