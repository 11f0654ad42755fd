use crate::analyzers::aggregate::aggregate;
use crate::analyzers::compare::compare;
use crate::analyzers::reconcile::reconcile;
use crate::analyzers::types::{ComparedRow, ReconciledRow};
use crate::analyzers::validate::validate;
use crate::config::{ExportFormat, PipelineOptions};
use crate::error::PipelineResult;
use crate::output::{export, Export};
use crate::parser::parse_table;
use crate::table::Table;
use tracing::info;

/// Runs read, validate, aggregate and reconcile over one uploaded file.
///
/// Either the complete result table is returned or the first failure; no
/// stage output is surfaced on error.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn summarize(bytes: &[u8], options: &PipelineOptions) -> PipelineResult<Vec<ReconciledRow>> {
    let table = parse_table(bytes, options)?;
    summarize_table(&table, options)
}

/// Same as [`summarize`] for a table that is already decoded.
pub fn summarize_table(table: &Table, options: &PipelineOptions) -> PipelineResult<Vec<ReconciledRow>> {
    validate(table, options)?;
    let aggregates = aggregate(table)?;
    let rows = reconcile(table, &aggregates)?;

    info!(rows = table.row_count(), products = rows.len(), "Summary computed");
    Ok(rows)
}

/// Runs [`summarize`] and encodes the result.
pub fn summarize_to(
    bytes: &[u8],
    options: &PipelineOptions,
    format: ExportFormat,
) -> PipelineResult<Export> {
    let rows = summarize(bytes, options)?;
    export(&rows, format)
}

/// Summarizes two files independently and joins the results on product.
///
/// Only products present in both files are returned.
#[tracing::instrument(skip_all, fields(original_len = original.len(), comparison_len = comparison.len()))]
pub fn compare_files(
    original: &[u8],
    original_options: &PipelineOptions,
    comparison: &[u8],
    comparison_options: &PipelineOptions,
) -> PipelineResult<Vec<ComparedRow>> {
    let left = summarize(original, original_options)?;
    let right = summarize(comparison, comparison_options)?;
    Ok(compare(&left, &right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    const SALES: &[u8] = b"Artikel,Name,Woche,Menge\n\
        001,Milch 1L,1,100\n002,Butter 250g,1,150\n003,K\xC3\xA4se 500g,1,200\n\
        001,Milch 1L,2,120\n002,Butter 250g,2,140\n003,K\xC3\xA4se 500g,2,210\n\
        001,Milch 1L,3,110\n002,Butter 250g,3,160\n003,K\xC3\xA4se 500g,3,190\n";

    #[test]
    fn test_summarize_orders_by_first_appearance() {
        let rows = summarize(SALES, &PipelineOptions::csv()).unwrap();

        let summary: Vec<_> = rows
            .iter()
            .map(|r| (r.product.as_str(), r.name.as_str(), r.mean))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("001", "Milch 1L", Some(110.0)),
                ("002", "Butter 250g", Some(150.0)),
                ("003", "Käse 500g", Some(200.0)),
            ]
        );
    }

    #[test]
    fn test_missing_column_stops_before_aggregation() {
        let result = summarize(b"Artikel,Woche,Menge\n001,1,N/A\n", &PipelineOptions::csv());
        assert!(matches!(result, Err(PipelineError::MissingColumns { .. })));
    }

    #[test]
    fn test_strict_mode_rejects_null_quantity() {
        let input = b"Artikel,Name,Woche,Menge\n001,Milch 1L,1,100\n001,Milch 1L,2,\n";
        let result = summarize(input, &PipelineOptions::csv().strict(true));
        assert!(matches!(result, Err(PipelineError::IncompleteData { .. })));
    }

    #[test]
    fn test_non_numeric_quantity_fails_whole_run() {
        let input = b"Artikel,Name,Woche,Menge\n001,Milch 1L,1,100\n001,Milch 1L,2,N/A\n";
        let result = summarize(input, &PipelineOptions::csv());
        assert!(matches!(result, Err(PipelineError::NonNumericQuantity { .. })));
    }

    #[test]
    fn test_huge_quantities_stay_finite() {
        let input = b"Artikel,Name,Woche,Menge\n001,A,1,1e308\n001,A,2,1e308\n";

        let rows = summarize(input, &PipelineOptions::csv()).unwrap();
        assert_eq!(rows[0].mean, Some(1e308));

        let export = summarize_to(input, &PipelineOptions::csv(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(export.bytes).unwrap();
        assert!(!text.contains("inf"));
        assert!(text.contains("\n001,A,1000000000000000"));
    }

    #[test]
    fn test_summarize_to_csv() {
        let export = summarize_to(SALES, &PipelineOptions::csv(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(export.bytes).unwrap();

        assert_eq!(
            text,
            "Artikel,Name,Durchschnittliche Menge pro Woche\n\
             001,Milch 1L,110.0\n\
             002,Butter 250g,150.0\n\
             003,Käse 500g,200.0\n"
        );
    }

    #[test]
    fn test_compare_files_inner_join() {
        let original = b"Artikel,Name,Woche,Menge\n001,Milch 1L,1,100\n002,Butter 250g,1,150\n";
        let comparison = b"Artikel,Name,Woche,Menge\n002,Butter 250g,1,180\n003,K\xC3\xA4se 500g,1,200\n";

        let rows = compare_files(
            original,
            &PipelineOptions::csv(),
            comparison,
            &PipelineOptions::csv(),
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product, "002");
        assert_eq!(rows[0].original_mean, Some(150.0));
        assert_eq!(rows[0].comparison_mean, Some(180.0));
    }

    #[test]
    fn test_compare_files_propagates_errors() {
        let good = b"Artikel,Name,Woche,Menge\n001,Milch 1L,1,100\n";
        let bad = b"Artikel,Menge\n001,100\n";

        let result = compare_files(good, &PipelineOptions::csv(), bad, &PipelineOptions::csv());
        assert!(matches!(result, Err(PipelineError::MissingColumns { .. })));
    }
}
