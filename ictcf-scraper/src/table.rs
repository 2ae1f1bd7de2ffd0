use crate::record::{Dataset, PatientRecord, RowOrigin};
use ictcf_common::{IctcfError, Result};
use ictcf_config::Selectors;
use ictcf_drivers::ictcf_browser::DomElement;
use tracing::debug;

/// Result of parsing one results page.
pub struct PageOutcome<E> {
    /// Records added to the dataset by this page (duplicates excluded).
    pub appended: usize,
    /// Pagination control, `None` on the last page.
    pub next: Option<E>,
}

/// Parse results page `page` (1-based) into `dataset`.
///
/// The first row holds the headers, the last row the pagination controls,
/// and everything in between is patient data.
pub async fn parse_table<E: DomElement>(
    table: &E,
    dataset: &mut Dataset,
    selectors: &Selectors,
    page: usize,
) -> Result<PageOutcome<E>> {
    let rows = table.query_all("tr").await?;
    let (header_row, rest) = rows.split_first().ok_or(IctcfError::EmptyTable)?;

    dataset.set_headers(header_row.texts_of("th").await?)?;

    let data_rows = match rest.split_last() {
        Some((_, data)) => data,
        None => &[],
    };

    let mut appended = 0;
    for (idx, row) in data_rows.iter().enumerate() {
        let cells = row.texts_of("td").await?;
        let detail_link = row
            .hrefs_of(&selectors.detail_links)
            .await?
            .into_iter()
            .next();
        let origin = RowOrigin { page, row: idx + 1 };
        if dataset.push(PatientRecord::new(cells, detail_link), origin)? {
            appended += 1;
        }
    }

    // A header-only table is its own pagination row.
    let pagination = rows.last().ok_or(IctcfError::EmptyTable)?;
    let next = pagination
        .xpath(&selectors.next_xpath())
        .await?
        .into_iter()
        .next();

    debug!(
        target: "ictcf.table",
        page,
        rows = data_rows.len(),
        appended,
        has_next = next.is_some(),
        "parsed results page"
    );

    Ok(PageOutcome { appended, next })
}
