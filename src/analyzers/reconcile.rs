//! Joins aggregates back onto product names in first-seen order.

use crate::analyzers::types::{AggregateRow, ReconciledRow, ARTIKEL, NAME};
use crate::analyzers::validate::column_index;
use crate::error::PipelineResult;
use crate::table::Table;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// A product identifier with the name it first appeared under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub product: String,
    pub name: String,
}

/// Deduplicated `(identifier, name)` pairs in source order, reduced to the
/// first name of each identifier. Later rows that name the same identifier
/// differently are logged and dropped.
pub fn identities(table: &Table) -> PipelineResult<Vec<Identity>> {
    let product_idx = column_index(table, ARTIKEL)?;
    let name_idx = column_index(table, NAME)?;

    let mut pairs: HashSet<(String, String)> = HashSet::new();
    let mut first_name: HashMap<String, usize> = HashMap::new();
    let mut identities: Vec<Identity> = Vec::new();

    for row in table.rows() {
        let Some(product) = row[product_idx].as_key() else {
            continue;
        };
        let name = row[name_idx].to_string();

        if !pairs.insert((product.clone(), name.clone())) {
            continue;
        }

        match first_name.get(&product) {
            Some(&idx) => {
                warn!(
                    product = %product,
                    kept = %identities[idx].name,
                    dropped = %name,
                    "Product listed under more than one name, keeping the first"
                );
            }
            None => {
                first_name.insert(product.clone(), identities.len());
                identities.push(Identity { product, name });
            }
        }
    }

    Ok(identities)
}

/// Attaches names to `aggregates`.
///
/// The result follows the order of [`identities`], one row per product.
pub fn reconcile(table: &Table, aggregates: &[AggregateRow]) -> PipelineResult<Vec<ReconciledRow>> {
    let by_product: HashMap<&str, &AggregateRow> = aggregates
        .iter()
        .map(|a| (a.product.as_str(), a))
        .collect();

    let mut rows = Vec::with_capacity(aggregates.len());
    for identity in identities(table)? {
        let Some(aggregate) = by_product.get(identity.product.as_str()) else {
            warn!(product = %identity.product, "No aggregate for product");
            continue;
        };
        rows.push(ReconciledRow {
            mean: aggregate.mean,
            product: identity.product,
            name: identity.name,
        });
    }

    debug!(products = rows.len(), "Names reconciled");
    Ok(rows)
}
