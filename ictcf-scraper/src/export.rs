use crate::record::Dataset;
use ictcf_common::{IctcfError, Result};
use ictcf_config::ExportConfig;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::PathBuf;
use tracing::info;

/// Write the dataset to `<dir>/<file_name>` as a single-sheet workbook:
/// a bold header row followed by one row per patient, filled column by
/// column from [`Dataset::to_columns`].
///
/// The export directory must already exist.
pub fn export_xlsx(dataset: &Dataset, config: &ExportConfig) -> Result<PathBuf> {
    let path = config.file_path();

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(&config.sheet_name).map_err(xlsx)?;

    for (col, (name, values)) in dataset.to_columns().iter().enumerate() {
        let col = column_index(col)?;
        sheet
            .write_string_with_format(0, col, name, &header_format)
            .map_err(xlsx)?;
        for (idx, value) in values.iter().enumerate() {
            let row = u32::try_from(idx + 1)
                .map_err(|_| IctcfError::Export(format!("row {idx} exceeds the sheet limit")))?;
            sheet.write_string(row, col, value).map_err(xlsx)?;
        }
    }

    workbook.save(&path).map_err(xlsx)?;
    info!(
        target: "ictcf.export",
        path = %path.display(),
        rows = dataset.len(),
        "file exported"
    );
    Ok(path)
}

fn xlsx(err: XlsxError) -> IctcfError {
    IctcfError::Export(err.to_string())
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| IctcfError::Export(format!("column {col} exceeds the sheet limit")))
}
