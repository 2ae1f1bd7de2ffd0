//! Common types shared across the iCTCF scraper crates.
//!
//! - [`IctcfError`] and [`Result`]: error handling for the scraping pipeline
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use ictcf_common::IctcfError;
//!
//! let err = IctcfError::MissingOverviewField {
//!     label: "Body temperature".into(),
//!     url: "http://ictcf.biocuckoo.cn/view.php?id=Patient%201".into(),
//! };
//! assert!(err.to_string().contains("Body temperature"));
//! ```

pub mod observability;

/// Error types raised by the scraping pipeline.
///
/// The driver layer speaks `anyhow`; everything above it converts into this
/// enum so callers can tell layout problems apart from browser failures.
#[derive(thiserror::Error, Debug)]
pub enum IctcfError {
    /// The browser collaborator (WebDriver session, element lookup, click) failed.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Filesystem access failed (export directory, screenshot).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The results table had no rows at all.
    #[error("Results table contains no rows")]
    EmptyTable,

    /// A later results page announced different columns than the first one.
    #[error("Header mismatch: expected {expected:?}, found {found:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A data row did not have one cell per header. `row` counts data rows
    /// from 1 within results page `page`.
    #[error("Row {row} on page {page} has {found} cells, expected {expected}")]
    RowShape {
        page: usize,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Clicking "next" did not bring up any new records.
    #[error("Results page {page} added no new records after clicking next")]
    PageNotAdvanced { page: usize },

    /// A patient overview page did not carry a requested field label.
    #[error("Overview field {label:?} not found on {url}")]
    MissingOverviewField { label: String, url: String },

    /// An unlabelled overview page had too few values for a field's position.
    #[error("No value at position {position} for {label:?} on {url} ({found} values)")]
    OverviewPosition {
        label: String,
        position: usize,
        found: usize,
        url: String,
    },

    /// Label and value cells of an overview page could not be paired.
    #[error("Overview on {url} has {labels} labels for {values} values")]
    OverviewLayout {
        labels: usize,
        values: usize,
        url: String,
    },

    /// Writing the spreadsheet failed.
    #[error("Export error: {0}")]
    Export(String),
}

/// Convenient alias for results that use [`IctcfError`].
pub type Result<T> = std::result::Result<T, IctcfError>;
