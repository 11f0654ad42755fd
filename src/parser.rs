//! Decodes uploaded bytes into a [`Table`].
//!
//! CSV is read with the `csv` crate, workbooks with `calamine`. Both paths
//! share the same header handling and skip rows whose cells are all empty.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::collections::HashSet;
use std::io::Cursor;
use tracing::debug;

use crate::config::{InputFormat, PipelineOptions, SheetSelector};
use crate::error::{PipelineError, PipelineResult};
use crate::table::{Cell, Table};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes `bytes` according to the format and sheet in `options`.
///
/// # Errors
///
/// [`PipelineError::Format`] if the bytes are not valid for the declared
/// format, [`PipelineError::SheetNotFound`] if the selected sheet does not exist.
#[tracing::instrument(skip(bytes, options), fields(len = bytes.len(), format = %options.input))]
pub fn parse_table(bytes: &[u8], options: &PipelineOptions) -> PipelineResult<Table> {
    let table = match options.input {
        InputFormat::Csv => parse_csv(bytes)?,
        InputFormat::Spreadsheet => parse_workbook(bytes, &options.sheet)?,
    };
    debug!(
        columns = table.columns().len(),
        rows = table.row_count(),
        "Table decoded"
    );
    Ok(table)
}

/// Decodes comma-separated UTF-8 text with a header row.
pub fn parse_csv(bytes: &[u8]) -> PipelineResult<Table> {
    let fail = |e: csv::Error| PipelineError::format(InputFormat::Csv, e);
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = rdr.headers().map_err(fail)?.iter().map(str::to_string).collect();
    let columns = normalize_headers(headers, InputFormat::Csv)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(fail)?;
        let row: Vec<Cell> = record.iter().map(Cell::from_text).collect();
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

/// Decodes a workbook, reading the sheet picked by `selector`.
///
/// The container is detected from the bytes: XLSX, XLSM, XLSB, XLS and ODS
/// are accepted.
pub fn parse_workbook(bytes: &[u8], selector: &SheetSelector) -> PipelineResult<Table> {
    let fail = |e: calamine::Error| PipelineError::format(InputFormat::Spreadsheet, e);

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(fail)?;
    let available = workbook.sheet_names();

    let sheet_name = match selector {
        SheetSelector::Index(idx) => available.get(*idx).cloned(),
        SheetSelector::Name(name) => available.iter().find(|s| *s == name).cloned(),
    };
    let Some(sheet_name) = sheet_name else {
        return Err(PipelineError::SheetNotFound {
            selector: selector.clone(),
            available,
        });
    };
    debug!(sheet = %sheet_name, "Reading worksheet");

    let range = workbook.worksheet_range(&sheet_name).map_err(fail)?;
    let mut sheet_rows = range.rows();

    let Some(header_row) = sheet_rows.next() else {
        return Err(PipelineError::format(
            InputFormat::Spreadsheet,
            format!("sheet '{sheet_name}' has no header row"),
        ));
    };
    let headers = header_row.iter().map(|d| data_to_cell(d).to_string()).collect();
    let columns = normalize_headers(headers, InputFormat::Spreadsheet)?;

    let rows = sheet_rows
        .map(|r| r.iter().map(data_to_cell).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(Cell::is_empty))
        .collect();

    Ok(Table::new(columns, rows))
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

/// Names blank headers positionally and rejects duplicates, so that every
/// column name in a [`Table`] is unique.
fn normalize_headers(headers: Vec<String>, format: InputFormat) -> PipelineResult<Vec<String>> {
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(PipelineError::format(format, "no header row"));
    }

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(headers.len());
    for (idx, header) in headers.into_iter().enumerate() {
        let name = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header
        };
        if !seen.insert(name.clone()) {
            return Err(PipelineError::format(
                format,
                format!("duplicate column '{name}'"),
            ));
        }
        columns.push(name);
    }
    Ok(columns)
}
