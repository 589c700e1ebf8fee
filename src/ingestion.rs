use crate::config::PipelineConfig;
use crate::error::{FinancialInsightsError, Result};
use crate::normalizer::normalize_or_zero;
use crate::schema::{AccountRecord, Cell, FinancialTable, RawGrid};
use crate::utils::{fiscal_month_labels, parse_month_name};
use chrono::Month;
use calamine::{open_workbook_auto, Data, Range, Reader};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Column holding the account name in data rows. Column 0 is a spacer.
pub const ACCOUNT_NAME_COLUMN: usize = 1;
/// First column that can carry a month label.
pub const FIRST_MONTH_COLUMN: usize = 2;

const WORKBOOK_EXTENSIONS: [&str; 6] = ["xlsx", "xlsm", "xlsb", "xls", "xla", "ods"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
}

/// Finds the header row inside an unstructured grid and rebuilds the account table beneath it.
///
/// The header is the first row with a cell equal to `config.anchor_month`. Its labels from
/// column 2 onward become the month labels; every later row with a name in column 1 becomes an
/// [`AccountRecord`]. Returns [`FinancialInsightsError::NoTableFound`] when no row qualifies.
pub fn reconstruct_table(grid: &RawGrid, config: &PipelineConfig) -> Result<FinancialTable> {
    let anchor = config.anchor_month.as_str();

    let header_idx = grid
        .iter()
        .position(|row| row.iter().any(|cell| cell.as_text() == anchor))
        .ok_or_else(|| FinancialInsightsError::NoTableFound(anchor.to_string()))?;

    info!("Header row found at row {}", header_idx);

    let fiscal_year_caption = grid[..header_idx]
        .iter()
        .rev()
        .find(|row| {
            row.iter()
                .any(|cell| cell.as_text().contains(&config.fiscal_year_marker))
        })
        .map(|row| {
            row.iter()
                .map(Cell::as_text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        });

    let header_columns: Vec<(usize, String)> = grid[header_idx]
        .iter()
        .enumerate()
        .skip(FIRST_MONTH_COLUMN)
        .map(|(idx, cell)| (idx, cell.as_text()))
        .filter(|(_, label)| !label.is_empty())
        .collect();

    let mut month_labels: Vec<String> = Vec::with_capacity(header_columns.len());
    for (_, label) in &header_columns {
        if month_labels.contains(label) {
            warn!(
                "Month label '{}' appears more than once; the right-most column wins",
                label
            );
        } else {
            month_labels.push(label.clone());
        }
    }

    let mut records = Vec::new();
    for row in &grid[header_idx + 1..] {
        let account_name = row
            .get(ACCOUNT_NAME_COLUMN)
            .map(Cell::as_text)
            .unwrap_or_default();

        if account_name.is_empty() || account_name == config.missing_value_token {
            continue;
        }

        let mut record = AccountRecord::new(account_name);
        for (col, label) in &header_columns {
            record
                .monthly_values
                .insert(label.clone(), normalize_or_zero(row.get(*col)));
        }

        if record.monthly_values.is_empty() {
            continue;
        }

        records.push(record);
    }

    if records
        .first()
        .is_some_and(|r| r.account_name.contains(&config.section_heading_marker))
    {
        debug!("Dropping section heading row '{}'", records[0].account_name);
        records.remove(0);
    }

    let summary_labels: Vec<String> = month_labels
        .iter()
        .filter(|label| config.summary_labels.contains(label))
        .cloned()
        .collect();

    if let Some(first_month) = parse_month_name(anchor) {
        for label in non_month_labels(&month_labels, &summary_labels, first_month) {
            warn!(
                "Column '{}' is neither a month nor a summary label; treating it as a period",
                label
            );
        }
    }

    debug!(
        "Reconstructed {} accounts across {} columns ({} summary)",
        records.len(),
        month_labels.len(),
        summary_labels.len()
    );

    Ok(FinancialTable {
        month_labels,
        summary_labels,
        records,
        fiscal_year_caption,
    })
}

/// Header labels that are neither one of the twelve fiscal months nor a summary label.
fn non_month_labels<'a>(
    month_labels: &'a [String],
    summary_labels: &[String],
    first_month: Month,
) -> Vec<&'a str> {
    let fiscal_year = fiscal_month_labels(first_month, 12);
    month_labels
        .iter()
        .filter(|label| !fiscal_year.contains(label) && !summary_labels.contains(label))
        .map(String::as_str)
        .collect()
}

/// Reads the configured sheet of a workbook, or a CSV file, into a [`RawGrid`].
pub fn load_grid(path: impl AsRef<Path>, config: &PipelineConfig) -> Result<RawGrid> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if extension == "csv" {
        let file = std::fs::File::open(path)?;
        return read_csv_grid(file);
    }

    if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        return read_workbook_grid(path, config.sheet_name.as_deref());
    }

    Err(FinancialInsightsError::UnsupportedFormat(
        path.display().to_string(),
    ))
}

/// Reads one worksheet as an untyped grid. With no `sheet_name`, the first sheet is used.
pub fn read_workbook_grid(path: &Path, sheet_name: Option<&str>) -> Result<RawGrid> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();

    let sheet = match sheet_name {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(FinancialInsightsError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| FinancialInsightsError::EmptyWorkbook(path.display().to_string()))?,
    };

    info!("Reading sheet '{}' from {}", sheet, path.display());
    let range = workbook.worksheet_range(&sheet)?;
    Ok(grid_from_range(&range))
}

/// Converts a worksheet range to a grid addressed by absolute sheet columns.
///
/// A used range that starts at column C still yields rows whose first cell is column A, so the
/// fixed account-name and month columns line up with the sheet.
pub fn grid_from_range(range: &Range<Data>) -> RawGrid {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let mut grid: RawGrid = vec![Vec::new(); first_row as usize];

    for row in range.rows() {
        let mut cells: Vec<Cell> = vec![Cell::Empty; first_col as usize];
        cells.extend(row.iter().map(cell_from_data));
        grid.push(cells);
    }

    grid
}

pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::from(s.as_str()),
        other => Cell::Text(other.to_string()),
    }
}

/// Reads CSV content as an untyped grid: no header row, ragged rows allowed.
pub fn read_csv_grid<R: Read>(reader: R) -> Result<RawGrid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        grid.push(record.iter().map(Cell::from).collect());
    }

    Ok(grid)
}

/// Lists every sheet in a workbook with its used dimensions.
pub fn inspect_workbook(path: impl AsRef<Path>) -> Result<Vec<SheetSummary>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)?;

    let mut summaries = Vec::new();
    for name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&name) {
            Ok(r) => r,
            Err(e) => {
                warn!("Cannot read sheet '{}': {}", name, e);
                continue;
            }
        };

        let (rows, columns) = range.get_size();
        summaries.push(SheetSummary {
            name,
            rows,
            columns,
        });
    }

    Ok(summaries)
}
