//! Export encoding and rendering of result tables.
//!
//! Supports XLSX and CSV encoding, log and JSON rendering, and writing the
//! encoded result to disk.

use anyhow::Result;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::compare::{COMPARISON_SUFFIX, ORIGINAL_SUFFIX};
use crate::analyzers::types::{AggregateRow, ComparedRow, ReconciledRow, ARTIKEL, AVERAGE_LABEL, NAME};
use crate::config::ExportFormat;
use crate::error::{PipelineError, PipelineResult};
use crate::table::Cell;

/// Name of the single worksheet in exported workbooks.
pub const SHEET_NAME: &str = "Sheet1";

/// A row type that can be written as one line of an exported table.
pub trait ExportRow {
    /// Column headers, in output order.
    fn headers() -> Vec<String>;

    /// Cell values, aligned with [`ExportRow::headers`].
    fn cells(&self) -> Vec<Cell>;
}

fn mean_cell(mean: Option<f64>) -> Cell {
    mean.map_or(Cell::Empty, Cell::Float)
}

impl ExportRow for AggregateRow {
    fn headers() -> Vec<String> {
        vec![ARTIKEL.to_string(), AVERAGE_LABEL.to_string()]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![Cell::Text(self.product.clone()), mean_cell(self.mean)]
    }
}

impl ExportRow for ReconciledRow {
    fn headers() -> Vec<String> {
        vec![ARTIKEL.to_string(), NAME.to_string(), AVERAGE_LABEL.to_string()]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.product.clone()),
            Cell::Text(self.name.clone()),
            mean_cell(self.mean),
        ]
    }
}

impl ExportRow for ComparedRow {
    fn headers() -> Vec<String> {
        vec![
            ARTIKEL.to_string(),
            format!("{NAME}{ORIGINAL_SUFFIX}"),
            format!("{AVERAGE_LABEL}{ORIGINAL_SUFFIX}"),
            format!("{NAME}{COMPARISON_SUFFIX}"),
            format!("{AVERAGE_LABEL}{COMPARISON_SUFFIX}"),
        ]
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.product.clone()),
            Cell::Text(self.original_name.clone()),
            mean_cell(self.original_mean),
            Cell::Text(self.comparison_name.clone()),
            mean_cell(self.comparison_mean),
        ]
    }
}

/// Encoded result, ready to be sent as-is.
#[derive(Debug, Clone)]
pub struct Export {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl Export {
    /// Suggested file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn file_name(&self) -> String {
        self.format.default_file_name()
    }
}

/// Encodes `rows` in the requested format.
pub fn export<R: ExportRow>(rows: &[R], format: ExportFormat) -> PipelineResult<Export> {
    let bytes = match format {
        ExportFormat::Spreadsheet => to_xlsx(rows)?,
        ExportFormat::Csv => to_csv(rows)?,
    };
    debug!(rows = rows.len(), bytes = bytes.len(), format = format.extension(), "Result encoded");
    Ok(Export { format, bytes })
}

/// Writes a one-sheet workbook: a bold header row, then one row per entry.
pub fn to_xlsx<R: ExportRow>(rows: &[R]) -> PipelineResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in R::headers().iter().enumerate() {
        sheet.write_string_with_format(0, column(col)?, header, &header_format)?;
    }

    for (i, entry) in rows.iter().enumerate() {
        let row = u32::try_from(i + 1)
            .map_err(|_| PipelineError::Export(format!("row {} out of range", i + 1)))?;
        for (col, cell) in entry.cells().iter().enumerate() {
            let col = column(col)?;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    sheet.write_string(row, col, s)?;
                }
                Cell::Int(v) => {
                    sheet.write_number(row, col, *v as f64)?;
                }
                Cell::Float(v) => {
                    sheet.write_number(row, col, *v)?;
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(row, col, *b)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn column(idx: usize) -> PipelineResult<u16> {
    u16::try_from(idx).map_err(|_| PipelineError::Export(format!("column {idx} out of range")))
}

/// Writes comma-separated UTF-8 with a header row and `\n` line endings.
pub fn to_csv<R: ExportRow>(rows: &[R]) -> PipelineResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(R::headers())?;
    for entry in rows {
        writer.write_record(entry.cells().iter().map(csv_field))?;
    }

    writer
        .into_inner()
        .map_err(|e| PipelineError::Export(e.to_string()))
}

fn csv_field(cell: &Cell) -> String {
    match cell {
        Cell::Float(v) => format_number(*v),
        other => other.to_string(),
    }
}

/// Renders a number in plain decimal notation with at least one fractional
/// digit: `110.0`, `110.5`, never exponent form.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Logs each result row at `info` level.
pub fn print_table<R: ExportRow>(rows: &[R]) {
    let headers = R::headers();
    info!("{}", headers.join(" | "));
    for entry in rows {
        let line: Vec<String> = entry.cells().iter().map(csv_field).collect();
        info!("{}", line.join(" | "));
    }
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes an encoded result to `path`, replacing any existing file.
pub fn write_export(path: impl AsRef<Path>, export: &Export) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &export.bytes)?;
    info!(path = %path.display(), bytes = export.bytes.len(), "Result written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetSelector;
    use crate::parser::{parse_csv, parse_workbook};
    use std::fs;

    fn rows() -> Vec<ReconciledRow> {
        vec![
            ReconciledRow {
                product: "001".into(),
                name: "Milch 1L".into(),
                mean: Some(110.0),
            },
            ReconciledRow {
                product: "002".into(),
                name: "Butter, gesalzen".into(),
                mean: Some(147.5),
            },
        ]
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(110.0), "110.0");
        assert_eq!(format_number(147.5), "147.5");
        assert_eq!(format_number(1e20), "100000000000000000000.0");
        assert_eq!(format_number(0.0000001), "0.0000001");
    }

    #[test]
    fn test_csv_layout() {
        let bytes = to_csv(&rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "Artikel,Name,Durchschnittliche Menge pro Woche\n\
             001,Milch 1L,110.0\n\
             002,\"Butter, gesalzen\",147.5\n"
        );
    }

    #[test]
    fn test_csv_empty_mean_is_blank() {
        let row = ReconciledRow {
            product: "009".into(),
            name: "Brot".into(),
            mean: None,
        };
        let text = String::from_utf8(to_csv(&[row]).unwrap()).unwrap();
        assert!(text.ends_with("009,Brot,\n"));
    }

    #[test]
    fn test_csv_reads_back() {
        let table = parse_csv(&to_csv(&rows()).unwrap()).unwrap();

        assert_eq!(table.columns(), &["Artikel", "Name", AVERAGE_LABEL]);
        assert_eq!(table.rows()[0][0], Cell::Text("001".into()));
        assert_eq!(table.rows()[1][1], Cell::Text("Butter, gesalzen".into()));
        assert_eq!(table.rows()[1][2].as_number(), Some(147.5));
    }

    #[test]
    fn test_xlsx_reads_back() {
        let bytes = to_xlsx(&rows()).unwrap();
        let table = parse_workbook(&bytes, &SheetSelector::Name(SHEET_NAME.into())).unwrap();

        assert_eq!(table.columns(), &["Artikel", "Name", AVERAGE_LABEL]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0][0], Cell::Text("001".into()));
        assert_eq!(table.rows()[0][2].as_number(), Some(110.0));
        assert_eq!(table.rows()[1][2].as_number(), Some(147.5));
    }

    #[test]
    fn test_compared_row_headers_are_suffixed() {
        let headers = ComparedRow::headers();
        assert_eq!(headers[0], "Artikel");
        assert_eq!(headers[1], "Name_Original");
        assert_eq!(headers[2], "Durchschnittliche Menge pro Woche_Original");
        assert_eq!(headers[3], "Name_Comparison");
        assert_eq!(headers[4], "Durchschnittliche Menge pro Woche_Comparison");
    }

    #[test]
    fn test_export_carries_format() {
        let encoded = export(&rows(), ExportFormat::Csv).unwrap();
        assert_eq!(encoded.extension(), "csv");
        assert_eq!(encoded.file_name(), "ergebnisse.csv");
    }

    #[test]
    fn test_write_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("ergebnisse.xlsx");

        let encoded = export(&rows(), ExportFormat::Spreadsheet).unwrap();
        write_export(&path, &encoded).unwrap();

        assert_eq!(fs::read(&path).unwrap(), encoded.bytes);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&rows()).unwrap();
    }
}
