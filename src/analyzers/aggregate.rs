use crate::analyzers::types::{AggregateRow, ARTIKEL, MENGE};
use crate::analyzers::utility::mean;
use crate::analyzers::validate::column_index;
use crate::error::{PipelineError, PipelineResult};
use crate::table::Table;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Groups a validated [`Table`] by product and averages the quantity column.
///
/// Products appear in the order of their first row. Identifiers are compared
/// as text, so `"001"` and `"1"` are different products. Empty quantity cells
/// do not count towards the mean; rows without an identifier are ignored.
///
/// # Errors
///
/// Fails with [`PipelineError::NonNumericQuantity`] on the first quantity
/// that is neither empty nor a finite number. Nothing is returned in that case.
pub fn aggregate(table: &Table) -> PipelineResult<Vec<AggregateRow>> {
    let product_idx = column_index(table, ARTIKEL)?;
    let quantity_idx = column_index(table, MENGE)?;

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unidentified = 0usize;

    for (i, row) in table.rows().iter().enumerate() {
        let Some(product) = row[product_idx].as_key() else {
            unidentified += 1;
            continue;
        };

        let cell = &row[quantity_idx];
        let quantity = if cell.is_empty() {
            None
        } else {
            let value = cell.as_number().ok_or_else(|| PipelineError::NonNumericQuantity {
                row: i + 1,
                product: product.clone(),
                value: cell.to_string(),
            })?;
            Some(value)
        };

        let slot = match positions.get(&product) {
            Some(&slot) => slot,
            None => {
                positions.insert(product.clone(), groups.len());
                groups.push((product, Vec::new()));
                groups.len() - 1
            }
        };

        if let Some(quantity) = quantity {
            groups[slot].1.push(quantity);
        }
    }

    if unidentified > 0 {
        warn!(rows = unidentified, "Ignoring rows without product identifier");
    }

    let aggregates: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(product, values)| AggregateRow {
            mean: mean(&values),
            count: values.len(),
            product,
        })
        .collect();

    debug!(products = aggregates.len(), "Quantities aggregated");
    Ok(aggregates)
}
