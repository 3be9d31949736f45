//! Declared dataset schema
//!
//! Preprocessing dispatch is driven by an explicit list of
//! `{column name, role}` pairs instead of runtime dtype inspection, so the
//! routing is fixed at construction and verifiable against any frame before
//! work starts.

use crate::error::{PalmerError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Semantic role of a column in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Imputed (most frequent) then one-hot encoded
    Categorical,
    /// Imputed (mean) then scaled
    Numeric,
    /// Prediction target, excluded from features
    Target,
    /// Forwarded into the feature matrix unchanged
    Passthrough,
}

/// A single column declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub role: ColumnRole,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, role: ColumnRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// Ordered set of column declarations for one dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSchema {
    columns: Vec<ColumnSpec>,
}

impl DatasetSchema {
    /// Build a schema from column declarations.
    /// Requires exactly one `Target` column and unique names.
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &columns {
            if !seen.insert(spec.name.as_str()) {
                return Err(PalmerError::SchemaError(format!(
                    "duplicate column declaration: {}",
                    spec.name
                )));
            }
        }

        let n_targets = columns
            .iter()
            .filter(|c| c.role == ColumnRole::Target)
            .count();
        if n_targets != 1 {
            return Err(PalmerError::SchemaError(format!(
                "schema must declare exactly one target column, found {}",
                n_targets
            )));
        }

        Ok(Self { columns })
    }

    /// Schema of the Palmer Penguins dataset.
    ///
    /// `year` is declared numeric: it is an integer column and the original
    /// workflow scaled it along with the measurements.
    pub fn penguins() -> Self {
        Self::new(vec![
            ColumnSpec::new("species", ColumnRole::Categorical),
            ColumnSpec::new("island", ColumnRole::Categorical),
            ColumnSpec::new("bill_length_mm", ColumnRole::Numeric),
            ColumnSpec::new("bill_depth_mm", ColumnRole::Numeric),
            ColumnSpec::new("flipper_length_mm", ColumnRole::Numeric),
            ColumnSpec::new("body_mass_g", ColumnRole::Numeric),
            ColumnSpec::new("year", ColumnRole::Numeric),
            ColumnSpec::new("sex", ColumnRole::Target),
        ])
        .expect("penguins schema is well-formed")
    }

    /// All column declarations, in declaration order
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Name of the target column
    pub fn target(&self) -> &str {
        self.columns
            .iter()
            .find(|c| c.role == ColumnRole::Target)
            .map(|c| c.name.as_str())
            .expect("schema always holds one target")
    }

    fn names_with_role(&self, role: ColumnRole) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.role == role)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Categorical column names in declaration order
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.names_with_role(ColumnRole::Categorical)
    }

    /// Numeric column names in declaration order
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.names_with_role(ColumnRole::Numeric)
    }

    /// Passthrough column names in declaration order
    pub fn passthrough_columns(&self) -> Vec<&str> {
        self.names_with_role(ColumnRole::Passthrough)
    }

    /// Check that every declared column (target included) exists in `df`
    pub fn validate_frame(&self, df: &DataFrame) -> Result<()> {
        self.validate_columns(df, true)
    }

    /// Check that every declared feature column exists in `df`.
    /// Used for frames the target has already been split away from.
    pub fn validate_features(&self, df: &DataFrame) -> Result<()> {
        self.validate_columns(df, false)
    }

    fn validate_columns(&self, df: &DataFrame, require_target: bool) -> Result<()> {
        let present: HashSet<&str> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.as_str())
            .collect();

        for spec in &self.columns {
            if spec.role == ColumnRole::Target && !require_target {
                continue;
            }
            if !present.contains(spec.name.as_str()) {
                return Err(PalmerError::ColumnNotFound(spec.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penguins_schema() {
        let schema = DatasetSchema::penguins();
        assert_eq!(schema.target(), "sex");
        assert_eq!(schema.categorical_columns(), vec!["species", "island"]);
        assert_eq!(schema.numeric_columns().len(), 5);
        assert!(schema.passthrough_columns().is_empty());
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let result = DatasetSchema::new(vec![
            ColumnSpec::new("a", ColumnRole::Numeric),
            ColumnSpec::new("a", ColumnRole::Categorical),
            ColumnSpec::new("y", ColumnRole::Target),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_missing_target() {
        let result = DatasetSchema::new(vec![ColumnSpec::new("a", ColumnRole::Numeric)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_frame() {
        let schema = DatasetSchema::new(vec![
            ColumnSpec::new("a", ColumnRole::Numeric),
            ColumnSpec::new("y", ColumnRole::Target),
        ])
        .unwrap();

        let df = df!("a" => &[1.0, 2.0], "y" => &["x", "y"]).unwrap();
        assert!(schema.validate_frame(&df).is_ok());

        let features_only = df.drop("y").unwrap();
        assert!(schema.validate_frame(&features_only).is_err());
        assert!(schema.validate_features(&features_only).is_ok());
    }
}
