//! Combined preprocessing pipeline

use super::{config::PreprocessingConfig, Imputer, OneHotEncoder, Scaler, ScalerType};
use crate::error::{PalmerError, Result};
use crate::schema::DatasetSchema;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Schema-routed preprocessing pipeline.
///
/// Categorical columns are imputed then one-hot encoded; numeric columns
/// are imputed then scaled; passthrough columns are forwarded unchanged.
/// The transformed frame carries the one-hot columns first, then the
/// numeric columns, then any passthrough columns, so downstream coefficient
/// reporting can rely on [`PreprocessPipeline::feature_names`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessPipeline {
    config: PreprocessingConfig,
    schema: DatasetSchema,
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    passthrough_columns: Vec<String>,
    numeric_imputer: Option<Imputer>,
    categorical_imputer: Option<Imputer>,
    scaler: Option<Scaler>,
    encoder: Option<OneHotEncoder>,
    is_fitted: bool,
}

impl PreprocessPipeline {
    /// Create a pipeline with the default configuration
    pub fn new(schema: DatasetSchema) -> Self {
        Self::with_config(schema, PreprocessingConfig::default())
    }

    /// Create a pipeline with a custom configuration
    pub fn with_config(schema: DatasetSchema, config: PreprocessingConfig) -> Self {
        let numeric_columns = schema
            .numeric_columns()
            .into_iter()
            .map(String::from)
            .collect();
        let categorical_columns = schema
            .categorical_columns()
            .into_iter()
            .map(String::from)
            .collect();
        let passthrough_columns = schema
            .passthrough_columns()
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            config,
            schema,
            numeric_columns,
            categorical_columns,
            passthrough_columns,
            numeric_imputer: None,
            categorical_imputer: None,
            scaler: None,
            encoder: None,
            is_fitted: false,
        }
    }

    /// Cast declared numeric columns to Float64 for consistent processing
    fn cast_numeric_to_f64(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        for col_name in &self.numeric_columns {
            let column = result
                .column(col_name)
                .map_err(|_| PalmerError::ColumnNotFound(col_name.clone()))?;
            if column.dtype() != &DataType::Float64 {
                let casted = column
                    .cast(&DataType::Float64)
                    .map_err(|e| PalmerError::DataError(e.to_string()))?;
                result = result
                    .with_column(casted.as_materialized_series().clone())
                    .map_err(|e| PalmerError::DataError(e.to_string()))?
                    .clone();
            }
        }
        Ok(result)
    }

    /// Fit the pipeline to the data
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        self.schema.validate_features(df)?;
        let df = self.cast_numeric_to_f64(df)?;

        if !self.numeric_columns.is_empty() {
            let mut imputer = Imputer::new(self.config.numeric_impute_strategy.clone());
            let cols: Vec<&str> = self.numeric_columns.iter().map(|s| s.as_str()).collect();
            imputer.fit(&df, &cols)?;
            self.numeric_imputer = Some(imputer);
        }

        if !self.categorical_columns.is_empty() {
            let mut imputer = Imputer::new(self.config.categorical_impute_strategy.clone());
            let cols: Vec<&str> = self
                .categorical_columns
                .iter()
                .map(|s| s.as_str())
                .collect();
            imputer.fit(&df, &cols)?;
            self.categorical_imputer = Some(imputer);
        }

        // Scaler and encoder fit on imputed data
        if !self.numeric_columns.is_empty() && self.config.scaler_type != ScalerType::None {
            let mut scaler = Scaler::new(self.config.scaler_type.clone());
            let cols: Vec<&str> = self.numeric_columns.iter().map(|s| s.as_str()).collect();

            let imputed = match &self.numeric_imputer {
                Some(imputer) => imputer.transform(&df)?,
                None => df.clone(),
            };

            scaler.fit(&imputed, &cols)?;
            self.scaler = Some(scaler);
        }

        if !self.categorical_columns.is_empty() {
            let mut encoder = OneHotEncoder::new();
            let cols: Vec<&str> = self
                .categorical_columns
                .iter()
                .map(|s| s.as_str())
                .collect();

            let imputed = match &self.categorical_imputer {
                Some(imputer) => imputer.transform(&df)?,
                None => df.clone(),
            };

            encoder.fit(&imputed, &cols)?;
            self.encoder = Some(encoder);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the data into the ordered feature frame
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(PalmerError::ModelNotFitted);
        }
        self.schema.validate_features(df)?;

        let mut result = self.cast_numeric_to_f64(df)?;

        if let Some(ref imputer) = self.numeric_imputer {
            result = imputer.transform(&result)?;
        }
        if let Some(ref imputer) = self.categorical_imputer {
            result = imputer.transform(&result)?;
        }
        if let Some(ref scaler) = self.scaler {
            result = scaler.transform(&result)?;
        }
        if let Some(ref encoder) = self.encoder {
            result = encoder.transform(&result)?;
        }

        let names = self.feature_names()?;
        result
            .select(names.iter().map(|s| s.as_str()))
            .map_err(|e| PalmerError::DataError(e.to_string()))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Emitted feature column names: one-hot columns first, then numeric,
    /// then passthrough, each group in schema declaration order
    pub fn feature_names(&self) -> Result<Vec<String>> {
        if !self.is_fitted {
            return Err(PalmerError::ModelNotFitted);
        }

        let mut names = Vec::new();
        if let Some(ref encoder) = self.encoder {
            names.extend(encoder.feature_names()?);
        }
        names.extend(self.numeric_columns.iter().cloned());
        names.extend(self.passthrough_columns.iter().cloned());
        Ok(names)
    }

    /// Number of emitted feature columns
    pub fn n_features(&self) -> Result<usize> {
        Ok(self.feature_names()?.len())
    }

    /// Numeric column names routed to the scaler
    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    /// Categorical column names routed to the encoder
    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    /// Convert a transformed frame into a dense feature matrix
    pub fn to_feature_matrix(df: &DataFrame) -> Result<Array2<f64>> {
        let n_rows = df.height();
        let n_cols = df.width();
        let mut matrix = Array2::zeros((n_rows, n_cols));

        for (j, column) in df.get_columns().iter().enumerate() {
            let casted = column
                .cast(&DataType::Float64)
                .map_err(|e| PalmerError::DataError(e.to_string()))?;
            let ca = casted
                .f64()
                .map_err(|e| PalmerError::DataError(e.to_string()))?;

            for (i, value) in ca.into_iter().enumerate() {
                let value = value.ok_or_else(|| {
                    PalmerError::DataError(format!(
                        "null value in transformed column {}",
                        column.name()
                    ))
                })?;
                matrix[[i, j]] = value;
            }
        }

        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnRole, ColumnSpec};

    fn test_schema() -> DatasetSchema {
        DatasetSchema::new(vec![
            ColumnSpec::new("species", ColumnRole::Categorical),
            ColumnSpec::new("island", ColumnRole::Categorical),
            ColumnSpec::new("bill_length_mm", ColumnRole::Numeric),
            ColumnSpec::new("body_mass_g", ColumnRole::Numeric),
            ColumnSpec::new("sex", ColumnRole::Target),
        ])
        .unwrap()
    }

    fn test_df() -> DataFrame {
        df!(
            "species" => &[Some("Adelie"), Some("Gentoo"), None, Some("Chinstrap"), Some("Adelie")],
            "island" => &[Some("Biscoe"), Some("Dream"), Some("Biscoe"), None, Some("Biscoe")],
            "bill_length_mm" => &[Some(39.1), None, Some(45.2), Some(48.8), Some(38.9)],
            "body_mass_g" => &[Some(3750.0), Some(5000.0), Some(4100.0), Some(3900.0), None],
        )
        .unwrap()
    }

    #[test]
    fn test_output_has_no_missing_values() {
        let mut pipeline = PreprocessPipeline::new(test_schema());
        let result = pipeline.fit_transform(&test_df()).unwrap();

        for column in result.get_columns() {
            assert_eq!(column.null_count(), 0, "column {}", column.name());
        }
    }

    #[test]
    fn test_feature_order_onehot_then_numeric() {
        let mut pipeline = PreprocessPipeline::new(test_schema());
        pipeline.fit(&test_df()).unwrap();

        let names = pipeline.feature_names().unwrap();
        assert_eq!(
            names,
            vec![
                "species_Adelie",
                "species_Chinstrap",
                "species_Gentoo",
                "island_Dream",
                "bill_length_mm",
                "body_mass_g",
            ]
        );
    }

    #[test]
    fn test_transform_output_matches_feature_names() {
        let mut pipeline = PreprocessPipeline::new(test_schema());
        let result = pipeline.fit_transform(&test_df()).unwrap();

        let names: Vec<String> = result
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, pipeline.feature_names().unwrap());
    }

    #[test]
    fn test_numeric_columns_are_standardized() {
        let mut pipeline = PreprocessPipeline::new(test_schema());
        let result = pipeline.fit_transform(&test_df()).unwrap();

        let col = result.column("bill_length_mm").unwrap().f64().unwrap();
        assert!(col.mean().unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_to_feature_matrix() {
        let mut pipeline = PreprocessPipeline::new(test_schema());
        let result = pipeline.fit_transform(&test_df()).unwrap();

        let matrix = PreprocessPipeline::to_feature_matrix(&result).unwrap();
        assert_eq!(matrix.nrows(), 5);
        assert_eq!(matrix.ncols(), pipeline.n_features().unwrap());
    }

    #[test]
    fn test_integer_numeric_columns_are_cast() {
        let schema = DatasetSchema::new(vec![
            ColumnSpec::new("year", ColumnRole::Numeric),
            ColumnSpec::new("sex", ColumnRole::Target),
        ])
        .unwrap();
        let df = df!("year" => &[2007i64, 2008, 2009]).unwrap();

        let mut pipeline = PreprocessPipeline::new(schema);
        let result = pipeline.fit_transform(&df).unwrap();
        assert_eq!(
            result.column("year").unwrap().dtype(),
            &DataType::Float64
        );
    }

    #[test]
    fn test_transform_before_fit_fails() {
        let pipeline = PreprocessPipeline::new(test_schema());
        assert!(matches!(
            pipeline.transform(&test_df()),
            Err(PalmerError::ModelNotFitted)
        ));
    }
}
