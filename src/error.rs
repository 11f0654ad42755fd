//! Failure classes of a pipeline run.
//!
//! Every variant terminates the run; no partial table is ever returned.

use crate::config::{InputFormat, SheetSelector};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The bytes could not be decoded as the declared format.
    #[error("cannot read input as {format}: {reason}")]
    Format { format: InputFormat, reason: String },

    #[error("sheet {selector} not found, workbook has {available:?}")]
    SheetNotFound {
        selector: SheetSelector,
        available: Vec<String>,
    },

    #[error("missing required columns: {}", join(.missing))]
    MissingColumns { missing: BTreeSet<String> },

    /// Row numbers are 1-based and exclude the header row.
    #[error("row {row}: column '{column}' is empty")]
    IncompleteData { row: usize, column: String },

    #[error("row {row}: quantity '{value}' of product '{product}' is not a number")]
    NonNumericQuantity {
        row: usize,
        product: String,
        value: String,
    },

    /// Encoding the result failed. Not a data problem.
    #[error("export failed: {0}")]
    Export(String),
}

impl PipelineError {
    pub(crate) fn format(format: InputFormat, reason: impl ToString) -> Self {
        PipelineError::Format {
            format,
            reason: reason.to_string(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for PipelineError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        PipelineError::Export(e.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        PipelineError::Export(e.to_string())
    }
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
