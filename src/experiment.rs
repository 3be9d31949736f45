//! End-to-end experiment orchestration
//!
//! Owns the fixed workflow: clean the target, split, grid-search the
//! hyperparameters with cross-validation, refit the winner, and evaluate
//! on the untouched test split.

use crate::config::RunConfig;
use crate::data::{drop_missing_target, train_test_split};
use crate::error::{PalmerError, Result};
use crate::preprocessing::{PreprocessPipeline, PreprocessingConfig};
use crate::report::CoefficientReport;
use crate::schema::DatasetSchema;
use crate::training::{ClassificationReport, GridPoint, GridSearchCv};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Row counts and class names of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub n_rows_raw: usize,
    pub n_rows_clean: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub classes: Vec<String>,
}

/// Everything the reporter needs from one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub summary: DatasetSummary,
    /// Cross-validation table, one entry per grid point
    pub evaluations: Vec<GridPoint>,
    pub best_l1_ratio: f64,
    pub best_c: f64,
    pub best_cv_score: f64,
    pub coefficients: CoefficientReport,
    pub test_metrics: ClassificationReport,
}

/// A configured experiment, ready to run on a loaded frame
pub struct Experiment {
    config: RunConfig,
    schema: DatasetSchema,
    preprocessing: PreprocessingConfig,
}

impl Experiment {
    /// Create an experiment; fails on an invalid configuration
    pub fn new(config: RunConfig, schema: DatasetSchema) -> Result<Self> {
        config.validate()?;
        if schema.target() != config.target_column {
            return Err(PalmerError::SchemaError(format!(
                "schema target {} does not match configured target {}",
                schema.target(),
                config.target_column
            )));
        }
        Ok(Self {
            config,
            schema,
            preprocessing: PreprocessingConfig::default(),
        })
    }

    /// Override the preprocessing configuration
    pub fn with_preprocessing(mut self, preprocessing: PreprocessingConfig) -> Self {
        self.preprocessing = preprocessing;
        self
    }

    /// Run the full workflow on a loaded frame
    pub fn run(&self, df: &DataFrame) -> Result<ExperimentReport> {
        self.schema.validate_frame(df)?;
        let target = self.schema.target();

        let cleaned = drop_missing_target(df, target)?;
        info!(
            raw = df.height(),
            clean = cleaned.height(),
            "target cleaned"
        );

        let split = train_test_split(
            &cleaned,
            target,
            self.config.test_fraction,
            self.config.seed,
        )?;

        if split.classes.len() != 2 {
            return Err(PalmerError::ValidationError(format!(
                "binary classifier requires two classes, found {}",
                split.classes.len()
            )));
        }

        let search = GridSearchCv::new(
            self.schema.clone(),
            self.preprocessing.clone(),
            self.config.cv_folds,
            self.config.seed,
        );
        let result = search.fit(&self.config.grid, &split.train, &split.y_train)?;
        let best = result.best().clone();

        // Evaluate on the untouched test split
        let x_test =
            PreprocessPipeline::to_feature_matrix(&result.pipeline.transform(&split.test)?)?;
        let y_pred = result.model.predict(&x_test)?;
        let test_metrics = ClassificationReport::compute(
            split.y_test.as_slice().unwrap_or(&[]),
            y_pred.as_slice().unwrap_or(&[]),
            &split.classes,
        );

        let feature_names = result.pipeline.feature_names()?;
        let coefficients = CoefficientReport::from_model(&feature_names, &result.model)?;

        info!(
            test_accuracy = test_metrics.accuracy,
            "experiment complete"
        );

        Ok(ExperimentReport {
            summary: DatasetSummary {
                n_rows_raw: df.height(),
                n_rows_clean: cleaned.height(),
                n_train: split.train.height(),
                n_test: split.test.height(),
                classes: split.classes,
            },
            evaluations: result.evaluations,
            best_l1_ratio: best.l1_ratio,
            best_c: best.c,
            best_cv_score: best.mean_score,
            coefficients,
            test_metrics,
        })
    }
}
