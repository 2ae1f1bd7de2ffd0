//! Row-oriented dataset accumulated while scraping.
//!
//! Each table row becomes one [`PatientRecord`] that carries its own detail
//! link, so overview fields fetched later always land on the row they
//! belong to. The column-oriented view only exists at export time.

use ictcf_common::{IctcfError, Result};
use std::collections::HashSet;
use tracing::warn;

/// One scraped results-table row plus the overview values fetched for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRecord {
    /// Cell texts, aligned with [`Dataset::headers`].
    pub cells: Vec<String>,
    /// First link found in the row's cells.
    pub detail_link: Option<String>,
    /// Aligned with [`Dataset::overview_fields`]; empty until fetched.
    pub overview: Vec<String>,
}

impl PatientRecord {
    pub fn new(cells: Vec<String>, detail_link: Option<String>) -> Self {
        Self {
            cells,
            detail_link,
            overview: Vec::new(),
        }
    }

    fn key(&self) -> RecordKey {
        match &self.detail_link {
            Some(link) => RecordKey::Link(link.clone()),
            None => RecordKey::Cells(self.cells.clone()),
        }
    }
}

/// Where a row sits in the results table: 1-based page, and 1-based data
/// row within that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOrigin {
    pub page: usize,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RecordKey {
    Link(String),
    Cells(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Option<Vec<String>>,
    overview_fields: Vec<String>,
    records: Vec<PatientRecord>,
    seen: HashSet<RecordKey>,
}

impl Dataset {
    pub fn new(overview_fields: Vec<String>) -> Self {
        Self {
            headers: None,
            overview_fields,
            records: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Fix the table headers on first use; later pages must repeat them.
    pub fn set_headers(&mut self, headers: Vec<String>) -> Result<()> {
        match &self.headers {
            None => {
                self.headers = Some(headers);
                Ok(())
            }
            Some(expected) if *expected == headers => Ok(()),
            Some(expected) => Err(IctcfError::HeaderMismatch {
                expected: expected.clone(),
                found: headers,
            }),
        }
    }

    pub fn headers(&self) -> &[String] {
        self.headers.as_deref().unwrap_or_default()
    }

    pub fn overview_fields(&self) -> &[String] {
        &self.overview_fields
    }

    /// Table headers followed by the overview fields.
    pub fn columns(&self) -> Vec<String> {
        self.headers()
            .iter()
            .chain(self.overview_fields.iter())
            .cloned()
            .collect()
    }

    /// Append a record read at `origin`. Returns `false` when an identical
    /// record (same detail link, or same cells if it has none) is already
    /// present.
    pub fn push(&mut self, record: PatientRecord, origin: RowOrigin) -> Result<bool> {
        let expected = self.headers().len();
        if record.cells.len() != expected {
            return Err(IctcfError::RowShape {
                page: origin.page,
                row: origin.row,
                expected,
                found: record.cells.len(),
            });
        }
        let key = record.key();
        if self.seen.contains(&key) {
            if let RecordKey::Cells(cells) = &key {
                warn!(
                    target: "ictcf.table",
                    page = origin.page,
                    row = origin.row,
                    ?cells,
                    "row without detail link repeats an earlier row; skipped"
                );
            }
            return Ok(false);
        }
        self.seen.insert(key);
        self.records.push(record);
        Ok(true)
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [PatientRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row-major values for each record, one value per [`Dataset::columns`]
    /// entry. Missing overview values are rendered as empty strings.
    fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        let extra = self.overview_fields.len();
        self.records.iter().map(move |record| {
            let overview = (0..extra).map(|i| record.overview.get(i).map_or("", String::as_str));
            record.cells.iter().map(String::as_str).chain(overview).collect()
        })
    }

    /// Column-oriented view: every column paired with one value per record.
    pub fn to_columns(&self) -> Vec<(String, Vec<String>)> {
        let mut columns: Vec<(String, Vec<String>)> = self
            .columns()
            .into_iter()
            .map(|name| (name, Vec::with_capacity(self.records.len())))
            .collect();
        for row in self.rows() {
            for ((_, values), cell) in columns.iter_mut().zip(row) {
                values.push(cell.to_string());
            }
        }
        columns
    }
}
