//! In-memory table decoded from an uploaded file.

use std::fmt;

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// Builds a cell from raw text, mapping blank strings to [`Cell::Empty`].
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Renders the cell as a grouping key. Text is kept verbatim so that
    /// zero-padded identifiers like `"001"` stay distinct from `"1"`. Numbers
    /// render in shortest decimal form, so a numeric `1` and a text `"1"`
    /// are the same product.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            other => Some(other.to_string()),
        }
    }

    /// Numeric value of the cell. Text is trimmed and parsed; non-finite
    /// values and booleans are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Int(i) => *i as f64,
            Cell::Float(f) => *f,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty | Cell::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Ordered rows sharing one column set. Column order and row order follow the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates a table. Every row is padded or truncated to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index_of(column).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_blank_is_empty() {
        assert_eq!(Cell::from_text(""), Cell::Empty);
        assert_eq!(Cell::from_text("   "), Cell::Empty);
        assert_eq!(Cell::from_text("001"), Cell::Text("001".to_string()));
    }

    #[test]
    fn test_key_keeps_zero_padding() {
        assert_eq!(Cell::Text("001".into()).as_key().as_deref(), Some("001"));
        assert_eq!(Cell::Float(1.0).as_key().as_deref(), Some("1"));
        assert_eq!(Cell::Int(42).as_key().as_deref(), Some("42"));
        assert_eq!(Cell::Empty.as_key(), None);
    }

    #[test]
    fn test_numeric_and_text_keys_share_a_product() {
        assert_eq!(Cell::Float(1.0).as_key(), Cell::Text("1".into()).as_key());
        assert_eq!(Cell::Int(1).as_key(), Cell::Text("1".into()).as_key());
        assert_ne!(Cell::Float(1.0).as_key(), Cell::Text("001".into()).as_key());
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Cell::Text(" 120 ".into()).as_number(), Some(120.0));
        assert_eq!(Cell::Text("1.5".into()).as_number(), Some(1.5));
        assert_eq!(Cell::Int(7).as_number(), Some(7.0));
        assert_eq!(Cell::Text("N/A".into()).as_number(), None);
        assert_eq!(Cell::Text("NaN".into()).as_number(), None);
        assert_eq!(Cell::Text("inf".into()).as_number(), None);
        assert_eq!(Cell::Bool(true).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }

    #[test]
    fn test_table_pads_short_rows() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::Int(1)]],
        );
        assert_eq!(table.rows()[0], vec![Cell::Int(1), Cell::Empty]);
        assert_eq!(table.index_of("b"), Some(1));
        assert!(!table.has_column("c"));
    }
}
