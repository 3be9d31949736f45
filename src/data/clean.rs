//! Target cleaning

use crate::error::{PalmerError, Result};
use polars::prelude::*;
use tracing::info;

/// Remove every row whose `target` value is missing.
///
/// Postcondition: the returned frame has zero nulls in `target`.
pub fn drop_missing_target(df: &DataFrame, target: &str) -> Result<DataFrame> {
    let column = df
        .column(target)
        .map_err(|_| PalmerError::ColumnNotFound(target.to_string()))?;

    let mask = column.as_materialized_series().is_not_null();
    let cleaned = df
        .filter(&mask)
        .map_err(|e| PalmerError::DataError(e.to_string()))?;

    let dropped = df.height() - cleaned.height();
    if dropped > 0 {
        info!(dropped, column = target, "dropped rows with missing target");
    }

    Ok(cleaned)
}
