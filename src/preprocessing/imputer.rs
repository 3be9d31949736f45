//! Missing value imputation

use crate::error::{PalmerError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strategy for filling missing values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Column mean (numeric columns only)
    Mean,
    /// Column median (numeric columns only)
    Median,
    /// Most frequent value (string columns; ties pick the
    /// lexicographically smallest value)
    MostFrequent,
}

/// Fitted fill value for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
enum FillValue {
    Number(f64),
    Category(String),
}

/// Missing value imputer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    strategy: ImputeStrategy,
    fill_values: HashMap<String, FillValue>,
    is_fitted: bool,
}

impl Imputer {
    /// Create a new imputer
    pub fn new(strategy: ImputeStrategy) -> Self {
        Self {
            strategy,
            fill_values: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Fit fill values for `columns`
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| PalmerError::ColumnNotFound(col_name.to_string()))?;
            let series = column.as_materialized_series();

            let fill = self.compute_fill(series)?;
            self.fill_values.insert(col_name.to_string(), fill);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Replace missing values with the fitted fill values.
    /// Builds all replacement columns first, then applies them in one pass.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PalmerError::ModelNotFitted);
        }

        let replacements: Vec<Series> = self
            .fill_values
            .iter()
            .filter_map(|(col_name, fill)| {
                df.column(col_name).ok().map(|column| {
                    let series = column.as_materialized_series();
                    self.fill_series(series, fill)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for filled in replacements {
            result = result
                .with_column(filled)
                .map_err(|e| PalmerError::DataError(e.to_string()))?
                .clone();
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    fn compute_fill(&self, series: &Series) -> Result<FillValue> {
        match self.strategy {
            ImputeStrategy::Mean => {
                let ca = series
                    .f64()
                    .map_err(|e| PalmerError::DataError(e.to_string()))?;
                Ok(FillValue::Number(ca.mean().unwrap_or(0.0)))
            }
            ImputeStrategy::Median => {
                let ca = series
                    .f64()
                    .map_err(|e| PalmerError::DataError(e.to_string()))?;
                Ok(FillValue::Number(ca.median().unwrap_or(0.0)))
            }
            ImputeStrategy::MostFrequent => {
                let ca = series
                    .str()
                    .map_err(|e| PalmerError::DataError(e.to_string()))?;

                let mut counts: HashMap<&str, usize> = HashMap::new();
                for value in ca.into_iter().flatten() {
                    *counts.entry(value).or_insert(0) += 1;
                }

                let mode = counts
                    .into_iter()
                    .max_by(|(a_val, a_n), (b_val, b_n)| {
                        a_n.cmp(b_n).then(b_val.cmp(a_val))
                    })
                    .map(|(val, _)| val.to_string())
                    .ok_or_else(|| {
                        PalmerError::DataError(format!(
                            "column {} has no values to impute from",
                            series.name()
                        ))
                    })?;

                Ok(FillValue::Category(mode))
            }
        }
    }

    fn fill_series(&self, series: &Series, fill: &FillValue) -> Result<Series> {
        match fill {
            FillValue::Number(value) => {
                let ca = series
                    .f64()
                    .map_err(|e| PalmerError::DataError(e.to_string()))?;
                let filled: Float64Chunked =
                    ca.into_iter().map(|opt| opt.or(Some(*value))).collect();
                Ok(filled.with_name(series.name().clone()).into_series())
            }
            FillValue::Category(value) => {
                let ca = series
                    .str()
                    .map_err(|e| PalmerError::DataError(e.to_string()))?;
                let filled: StringChunked = ca
                    .into_iter()
                    .map(|opt| opt.or(Some(value.as_str())))
                    .collect();
                Ok(filled.with_name(series.name().clone()).into_series())
            }
        }
    }
}
