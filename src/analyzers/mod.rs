//! Sales aggregation pipeline.
//!
//! A decoded table is validated against the required columns, grouped by
//! product to average the sold quantity, and joined back onto product names
//! in the order products first appear. Two results can be compared by
//! joining them on product.

pub mod aggregate;
pub mod analyzer;
pub mod compare;
pub mod reconcile;
pub mod types;
pub mod utility;
pub mod validate;
