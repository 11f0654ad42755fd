//! Schema gate run before any aggregation.

use std::collections::BTreeSet;
use tracing::debug;

use crate::analyzers::types::{ARTIKEL, MENGE, NAME, WOCHE};
use crate::config::PipelineOptions;
use crate::error::{PipelineError, PipelineResult};
use crate::table::Table;

/// Column names the input must carry. Matched exactly, case-sensitive.
pub fn required_columns(weekly: bool) -> Vec<&'static str> {
    let mut columns = vec![ARTIKEL, NAME, MENGE];
    if weekly {
        columns.push(WOCHE);
    }
    columns
}

/// Checks required columns first, then (in strict mode) that no cell is empty.
///
/// # Errors
///
/// [`PipelineError::MissingColumns`] naming every absent column, or
/// [`PipelineError::IncompleteData`] for the first empty cell in row order.
pub fn validate(table: &Table, options: &PipelineOptions) -> PipelineResult<()> {
    let missing: BTreeSet<String> = required_columns(options.weekly)
        .into_iter()
        .filter(|c| !table.has_column(c))
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns { missing });
    }

    if options.strict {
        for (i, row) in table.rows().iter().enumerate() {
            if let Some(col) = row.iter().position(|c| c.is_empty()) {
                return Err(PipelineError::IncompleteData {
                    row: i + 1,
                    column: table.columns()[col].clone(),
                });
            }
        }
    }

    debug!(rows = table.row_count(), strict = options.strict, "Table validated");
    Ok(())
}

/// Position of a required column, for stages that run after [`validate`].
pub(crate) fn column_index(table: &Table, column: &str) -> PipelineResult<usize> {
    table
        .index_of(column)
        .ok_or_else(|| PipelineError::MissingColumns {
            missing: BTreeSet::from([column.to_string()]),
        })
}
