//! Example input offered to users who need to see the expected layout.

use crate::analyzers::types::{ARTIKEL, MENGE, NAME, WOCHE};
use crate::error::PipelineResult;
use crate::output::{to_xlsx, ExportRow};
use crate::table::Cell;

pub const SAMPLE_FILE_NAME: &str = "beispiel_abverkauf.xlsx";

/// One observation in the example file.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub product: &'static str,
    pub name: &'static str,
    pub week: i64,
    pub quantity: i64,
}

impl ExportRow for SampleRow {
    fn headers() -> Vec<String> {
        [ARTIKEL, NAME, WOCHE, MENGE].map(str::to_string).to_vec()
    }

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.product.to_string()),
            Cell::Text(self.name.to_string()),
            Cell::Int(self.week),
            Cell::Int(self.quantity),
        ]
    }
}

pub fn sample_rows() -> Vec<SampleRow> {
    vec![
        SampleRow { product: "001", name: "Milch 1L", week: 1, quantity: 100 },
        SampleRow { product: "002", name: "Butter 250g", week: 2, quantity: 150 },
        SampleRow { product: "003", name: "Käse 500g", week: 3, quantity: 200 },
    ]
}

/// The example rows as an XLSX workbook.
pub fn sample_workbook() -> PipelineResult<Vec<u8>> {
    to_xlsx(&sample_rows())
}
