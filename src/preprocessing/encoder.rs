//! One-hot encoding

use crate::error::{PalmerError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One-hot encoder for categorical columns.
///
/// Categories are learned at fit time and sorted lexicographically. A
/// two-category column collapses to a single indicator for the later
/// category (the earlier one is the implicit baseline); columns with three
/// or more categories emit one indicator per category. Values unseen at fit
/// time encode as all zeros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Encoded columns in fit-call order
    columns: Vec<String>,
    /// Sorted categories per column
    categories: HashMap<String, Vec<String>>,
    is_fitted: bool,
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl OneHotEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            categories: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Learn the category sets of `columns`
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.columns.clear();
        self.categories.clear();

        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PalmerError::ColumnNotFound(col_name.to_string()))?;
            let ca = column
                .as_materialized_series()
                .str()
                .map_err(|e| PalmerError::DataError(e.to_string()))?;

            let mut cats: Vec<String> = ca
                .into_iter()
                .flatten()
                .map(|s| s.to_string())
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect();
            cats.sort();

            if cats.is_empty() {
                return Err(PalmerError::DataError(format!(
                    "column {} has no categories to encode",
                    col_name
                )));
            }

            self.columns.push(col_name.to_string());
            self.categories.insert(col_name.to_string(), cats);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Indicator column names emitted for one encoded column
    fn emitted_for(&self, col_name: &str, cats: &[String]) -> Vec<(String, String)> {
        // (output name, category the indicator fires on)
        let selected: &[String] = if cats.len() == 2 { &cats[1..] } else { cats };
        selected
            .iter()
            .map(|cat| (format!("{}_{}", col_name, cat), cat.clone()))
            .collect()
    }

    /// All indicator column names, in fit-call column order
    pub fn feature_names(&self) -> Result<Vec<String>> {
        if !self.is_fitted {
            return Err(PalmerError::ModelNotFitted);
        }
        let mut names = Vec::new();
        for col_name in &self.columns {
            let cats = &self.categories[col_name];
            names.extend(
                self.emitted_for(col_name, cats)
                    .into_iter()
                    .map(|(name, _)| name),
            );
        }
        Ok(names)
    }

    /// Replace each encoded column with its indicator columns.
    /// Untouched columns keep their positions; indicators append at the end.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PalmerError::ModelNotFitted);
        }

        let mut result = df.clone();

        for col_name in &self.columns {
            let column = result
                .column(col_name)
                .map_err(|_| PalmerError::ColumnNotFound(col_name.clone()))?;
            let ca = column
                .as_materialized_series()
                .str()
                .map_err(|e| PalmerError::DataError(e.to_string()))?;

            let cats = &self.categories[col_name];
            let mut indicators = Vec::new();
            for (out_name, cat) in self.emitted_for(col_name, cats) {
                let values: Float64Chunked = ca
                    .into_iter()
                    .map(|opt| {
                        Some(match opt {
                            Some(v) if v == cat => 1.0,
                            _ => 0.0,
                        })
                    })
                    .collect();
                indicators.push(values.with_name(out_name.as_str().into()).into_series());
            }

            result = result
                .drop(col_name)
                .map_err(|e| PalmerError::DataError(e.to_string()))?;
            for indicator in indicators {
                result = result
                    .with_column(indicator)
                    .map_err(|e| PalmerError::DataError(e.to_string()))?
                    .clone();
            }
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }
}
