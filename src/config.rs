//! Enumerated pipeline configuration.
//!
//! The pipeline recognizes exactly these knobs: how to decode the upload,
//! which sheet to read, whether the weekly column is part of the schema,
//! whether empty cells are rejected, and how to encode the result.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How the uploaded bytes are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputFormat {
    Csv,
    #[default]
    #[value(name = "xlsx")]
    Spreadsheet,
}

impl InputFormat {
    /// Infers the format from a file name: `.csv` is CSV, everything else
    /// is treated as a workbook.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let is_csv = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv {
            InputFormat::Csv
        } else {
            InputFormat::Spreadsheet
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Csv => f.write_str("csv"),
            InputFormat::Spreadsheet => f.write_str("xlsx"),
        }
    }
}

/// Which worksheet of a workbook to read. Defaults to the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl FromStr for SheetSelector {
    type Err = std::convert::Infallible;

    /// Digits select by position, anything else by name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<usize>() {
            Ok(idx) => SheetSelector::Index(idx),
            Err(_) => SheetSelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(idx) => write!(f, "#{idx}"),
            SheetSelector::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Encoding of the exported result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    #[value(name = "xlsx")]
    Spreadsheet,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    /// File name offered for the result download.
    pub fn default_file_name(&self) -> String {
        format!("ergebnisse.{}", self.extension())
    }
}

/// Options for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub input: InputFormat,
    pub sheet: SheetSelector,
    /// Require the `Woche` column.
    pub weekly: bool,
    /// Reject any empty cell.
    pub strict: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input: InputFormat::default(),
            sheet: SheetSelector::default(),
            weekly: true,
            strict: false,
        }
    }
}

impl PipelineOptions {
    pub fn csv() -> Self {
        Self {
            input: InputFormat::Csv,
            ..Default::default()
        }
    }

    pub fn spreadsheet() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: SheetSelector) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn weekly(mut self, weekly: bool) -> Self {
        self.weekly = weekly;
        self
    }
}
