//! Side-by-side comparison of two result tables.

use crate::analyzers::types::{ComparedRow, ReconciledRow};
use std::collections::HashMap;
use tracing::info;

/// Suffix of columns taken from the first table.
pub const ORIGINAL_SUFFIX: &str = "_Original";
/// Suffix of columns taken from the second table.
pub const COMPARISON_SUFFIX: &str = "_Comparison";

/// Inner join of `original` and `comparison` on product identifier.
///
/// Rows keep the order of `original`. Products present on only one side are
/// dropped; how many is logged.
pub fn compare(original: &[ReconciledRow], comparison: &[ReconciledRow]) -> Vec<ComparedRow> {
    let by_product: HashMap<&str, &ReconciledRow> = comparison
        .iter()
        .map(|r| (r.product.as_str(), r))
        .collect();

    let joined: Vec<ComparedRow> = original
        .iter()
        .filter_map(|left| {
            let right = by_product.get(left.product.as_str())?;
            Some(ComparedRow {
                product: left.product.clone(),
                original_name: left.name.clone(),
                original_mean: left.mean,
                comparison_name: right.name.clone(),
                comparison_mean: right.mean,
            })
        })
        .collect();

    info!(
        matched = joined.len(),
        only_original = original.len() - joined.len(),
        only_comparison = comparison.len().saturating_sub(joined.len()),
        "Results compared"
    );
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(product: &str, name: &str, mean: f64) -> ReconciledRow {
        ReconciledRow {
            product: product.to_string(),
            name: name.to_string(),
            mean: Some(mean),
        }
    }

    #[test]
    fn test_inner_join_keeps_shared_products() {
        let original = vec![row("001", "Milch 1L", 110.0), row("002", "Butter 250g", 150.0)];
        let comparison = vec![row("002", "Butter 250g", 175.0), row("003", "Käse 500g", 200.0)];

        let joined = compare(&original, &comparison);

        assert_eq!(
            joined,
            vec![ComparedRow {
                product: "002".into(),
                original_name: "Butter 250g".into(),
                original_mean: Some(150.0),
                comparison_name: "Butter 250g".into(),
                comparison_mean: Some(175.0),
            }]
        );
    }

    #[test]
    fn test_order_follows_original() {
        let original = vec![row("b", "B", 1.0), row("a", "A", 2.0)];
        let comparison = vec![row("a", "A", 3.0), row("b", "B", 4.0)];

        let products: Vec<_> = compare(&original, &comparison)
            .into_iter()
            .map(|r| r.product)
            .collect();
        assert_eq!(products, vec!["b", "a"]);
    }

    #[test]
    fn test_disjoint_inputs_give_nothing() {
        let joined = compare(&[row("001", "x", 1.0)], &[row("002", "y", 2.0)]);
        assert!(joined.is_empty());
    }
}
