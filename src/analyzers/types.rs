//! Data types produced by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Product identifier column.
pub const ARTIKEL: &str = "Artikel";
/// Display name column.
pub const NAME: &str = "Name";
/// Sold quantity column.
pub const MENGE: &str = "Menge";
/// Week column, required only for weekly input.
pub const WOCHE: &str = "Woche";

/// Header of the averaged quantity in exported results.
pub const AVERAGE_LABEL: &str = "Durchschnittliche Menge pro Woche";

/// Mean quantity of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub product: String,
    /// `None` when no row of this product carried a quantity.
    pub mean: Option<f64>,
    /// Rows that contributed a quantity.
    pub count: usize,
}

/// Mean quantity of one product together with its display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRow {
    #[serde(rename = "Artikel")]
    pub product: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Durchschnittliche Menge pro Woche")]
    pub mean: Option<f64>,
}

/// One product present in both an original and a comparison result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedRow {
    pub product: String,
    pub original_name: String,
    pub original_mean: Option<f64>,
    pub comparison_name: String,
    pub comparison_mean: Option<f64>,
}

/// Result listing rendered as JSON for callers that display it directly.
#[derive(Debug, Serialize)]
pub struct ResultSummary<'a> {
    pub generated_at: DateTime<Utc>,
    pub source: &'a str,
    pub product_count: usize,
    pub products: &'a [ReconciledRow],
}

impl<'a> ResultSummary<'a> {
    pub fn new(source: &'a str, products: &'a [ReconciledRow]) -> Self {
        Self {
            generated_at: Utc::now(),
            source,
            product_count: products.len(),
            products,
        }
    }
}
