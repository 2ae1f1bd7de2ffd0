use crate::record::Dataset;
use ictcf_common::{IctcfError, Result};
use ictcf_config::{OverviewField, Selectors};
use ictcf_drivers::ictcf_browser::BrowserSession;
use tracing::{debug, info, warn};

/// Visit every record's detail page in order and fill its overview values.
///
/// Pages are fetched one at a time. Returns the number of pages visited.
pub async fn fetch_patient_details<S: BrowserSession>(
    session: &mut S,
    dataset: &mut Dataset,
    fields: &[OverviewField],
    selectors: &Selectors,
) -> Result<usize> {
    let total = dataset.len();
    info!(target: "ictcf.detail", total, "found patient pages");

    let overview = [
        selectors.overview_values.as_str(),
        selectors.overview_labels.as_str(),
    ];
    let mut visited = 0;
    for (idx, record) in dataset.records_mut().iter_mut().enumerate() {
        let Some(link) = record.detail_link.as_deref() else {
            warn!(
                target: "ictcf.detail",
                row = idx + 1,
                "row has no detail link; overview fields left empty"
            );
            continue;
        };

        info!(
            target: "ictcf.detail",
            current = idx + 1,
            total,
            url = %link,
            "scraping patient page"
        );
        let mut texts = session.texts_in_new_page(link, &overview).await?.into_iter();
        let values = texts.next().unwrap_or_default();
        let labels = texts.next().unwrap_or_default();
        record.overview = lookup_fields(&values, &labels, fields, link)?;
        visited += 1;
    }

    info!(target: "ictcf.detail", visited, "patient pages done");
    Ok(visited)
}

/// Resolve each field against an overview table.
///
/// With labels, `labels[i]` names `values[i]` and fields are found by label
/// (case-insensitive, ignoring surrounding whitespace and a trailing colon).
/// Without labels, each field takes the value at its configured position.
pub fn lookup_fields(
    values: &[String],
    labels: &[String],
    fields: &[OverviewField],
    url: &str,
) -> Result<Vec<String>> {
    if labels.is_empty() {
        debug!(target: "ictcf.detail", %url, "overview has no labels; using positions");
        return fields
            .iter()
            .map(|field| {
                values
                    .get(field.position)
                    .cloned()
                    .ok_or_else(|| IctcfError::OverviewPosition {
                        label: field.label.clone(),
                        position: field.position,
                        found: values.len(),
                        url: url.to_string(),
                    })
            })
            .collect();
    }

    if labels.len() != values.len() {
        return Err(IctcfError::OverviewLayout {
            labels: labels.len(),
            values: values.len(),
            url: url.to_string(),
        });
    }

    fields
        .iter()
        .map(|field| {
            labels
                .iter()
                .position(|label| label_matches(label, &field.label))
                .map(|pos| values[pos].clone())
                .ok_or_else(|| IctcfError::MissingOverviewField {
                    label: field.label.clone(),
                    url: url.to_string(),
                })
        })
        .collect()
}

fn label_matches(cell: &str, label: &str) -> bool {
    let cell = cell.trim();
    let cell = cell.strip_suffix(':').unwrap_or(cell).trim_end();
    cell.eq_ignore_ascii_case(label.trim())
}
