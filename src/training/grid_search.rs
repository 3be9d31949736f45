//! Exhaustive hyperparameter grid search

use super::cross_validation::{CVResults, CVSplit, CVStrategy, CrossValidator};
use super::logistic::ElasticNetLogisticRegression;
use crate::config::SearchGrid;
use crate::data::take_rows;
use crate::error::{PalmerError, Result};
use crate::preprocessing::{PreprocessPipeline, PreprocessingConfig};
use crate::schema::DatasetSchema;
use ndarray::Array1;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Cross-validation outcome of one grid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridPoint {
    pub l1_ratio: f64,
    pub c: f64,
    /// Validation accuracy of each fold
    pub fold_scores: Vec<f64>,
    /// Mean fold accuracy; the selection criterion
    pub mean_score: f64,
    pub std_score: f64,
}

/// Grid search over (l1_ratio, C) with stratified k-fold cross-validation.
///
/// The preprocessing pipeline is refit inside every fold on that fold's
/// training rows only, so no statistics leak from validation rows. Grid
/// points are evaluated in parallel; every score is a pure function of the
/// inputs, so the result does not depend on evaluation order.
pub struct GridSearchCv {
    schema: DatasetSchema,
    preprocessing: PreprocessingConfig,
    cv_folds: usize,
    seed: u64,
}

/// Outcome of a grid search: the full evaluation table plus the winning
/// configuration refit on the complete training set
#[derive(Debug, Clone)]
pub struct GridSearchResult {
    /// One entry per grid point, in enumeration order
    pub evaluations: Vec<GridPoint>,
    /// Index of the winner within `evaluations`
    pub best_index: usize,
    /// Pipeline fitted on the full training set
    pub pipeline: PreprocessPipeline,
    /// Model refit on the full training set with the winning configuration
    pub model: ElasticNetLogisticRegression,
}

impl GridSearchResult {
    /// The winning grid point
    pub fn best(&self) -> &GridPoint {
        &self.evaluations[self.best_index]
    }
}

impl GridSearchCv {
    /// Create a new grid search
    pub fn new(
        schema: DatasetSchema,
        preprocessing: PreprocessingConfig,
        cv_folds: usize,
        seed: u64,
    ) -> Self {
        Self {
            schema,
            preprocessing,
            cv_folds,
            seed,
        }
    }

    /// Evaluate every grid point on `train`, pick the best, refit it.
    ///
    /// Ties are broken by enumeration order: a candidate replaces the
    /// incumbent only on a strictly greater mean score.
    pub fn fit(
        &self,
        grid: &SearchGrid,
        train: &DataFrame,
        y: &Array1<f64>,
    ) -> Result<GridSearchResult> {
        if grid.is_empty() {
            return Err(PalmerError::ValidationError(
                "hyperparameter grid is empty".to_string(),
            ));
        }
        if train.height() != y.len() {
            return Err(PalmerError::ShapeError {
                expected: format!("{} labels", train.height()),
                actual: format!("{} labels", y.len()),
            });
        }

        let splits = CrossValidator::new(CVStrategy::StratifiedKFold {
            n_splits: self.cv_folds,
            shuffle: true,
        })
        .with_random_state(self.seed)
        .split(train.height(), Some(y))?;

        let candidates = grid.candidates();
        info!(
            n_candidates = candidates.len(),
            cv_folds = self.cv_folds,
            "starting grid search"
        );

        let evaluations: Vec<GridPoint> = candidates
            .par_iter()
            .map(|&(l1_ratio, c)| self.evaluate(l1_ratio, c, train, y, &splits))
            .collect::<Result<Vec<_>>>()?;

        let mut best_index = 0;
        for (i, point) in evaluations.iter().enumerate() {
            if point.mean_score > evaluations[best_index].mean_score {
                best_index = i;
            }
        }

        let best = &evaluations[best_index];
        info!(
            l1_ratio = best.l1_ratio,
            c = best.c,
            mean_score = best.mean_score,
            "grid search complete"
        );

        // Refit the winner on the full training set
        let mut pipeline =
            PreprocessPipeline::with_config(self.schema.clone(), self.preprocessing.clone());
        let transformed = pipeline.fit_transform(train)?;
        let x = PreprocessPipeline::to_feature_matrix(&transformed)?;

        let mut model = ElasticNetLogisticRegression::new(best.c, best.l1_ratio);
        model.fit(&x, y)?;

        Ok(GridSearchResult {
            evaluations,
            best_index,
            pipeline,
            model,
        })
    }

    fn evaluate(
        &self,
        l1_ratio: f64,
        c: f64,
        train: &DataFrame,
        y: &Array1<f64>,
        splits: &[CVSplit],
    ) -> Result<GridPoint> {
        let mut fold_scores = Vec::with_capacity(splits.len());

        for split in splits {
            let fold_train = take_rows(train, &split.train_indices)?;
            let fold_valid = take_rows(train, &split.test_indices)?;
            let y_train = Array1::from_iter(split.train_indices.iter().map(|&i| y[i]));
            let y_valid = Array1::from_iter(split.test_indices.iter().map(|&i| y[i]));

            // Pipeline statistics come from the fold's training rows only
            let mut pipeline =
                PreprocessPipeline::with_config(self.schema.clone(), self.preprocessing.clone());
            let x_train =
                PreprocessPipeline::to_feature_matrix(&pipeline.fit_transform(&fold_train)?)?;
            let x_valid = PreprocessPipeline::to_feature_matrix(&pipeline.transform(&fold_valid)?)?;

            let mut model = ElasticNetLogisticRegression::new(c, l1_ratio);
            model.fit(&x_train, &y_train)?;
            fold_scores.push(model.score(&x_valid, &y_valid)?);
        }

        let results = CVResults::from_scores(fold_scores);
        Ok(GridPoint {
            l1_ratio,
            c,
            fold_scores: results.scores,
            mean_score: results.mean_score,
            std_score: results.std_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnRole, ColumnSpec};

    fn test_schema() -> DatasetSchema {
        DatasetSchema::new(vec![
            ColumnSpec::new("f1", ColumnRole::Numeric),
            ColumnSpec::new("f2", ColumnRole::Numeric),
            ColumnSpec::new("label", ColumnRole::Target),
        ])
        .unwrap()
    }

    fn separable_data(n_per_class: usize) -> (DataFrame, Array1<f64>) {
        let mut f1 = Vec::new();
        let mut f2 = Vec::new();
        let mut y = Vec::new();
        for i in 0..n_per_class {
            let offset = (i as f64) * 0.01;
            f1.push(-1.0 - offset);
            f2.push(-1.0 + offset);
            y.push(0.0);
            f1.push(1.0 + offset);
            f2.push(1.0 - offset);
            y.push(1.0);
        }
        let df = df!("f1" => &f1, "f2" => &f2).unwrap();
        (df, Array1::from_vec(y))
    }

    #[test]
    fn test_scores_exactly_the_configured_grid() {
        let (df, y) = separable_data(15);
        let grid = SearchGrid {
            l1_ratios: vec![0.0, 0.5],
            c_values: vec![0.1, 1.0, 10.0],
        };

        let search = GridSearchCv::new(test_schema(), PreprocessingConfig::default(), 3, 42);
        let result = search.fit(&grid, &df, &y).unwrap();

        assert_eq!(result.evaluations.len(), 6);
        let evaluated: Vec<(f64, f64)> = result
            .evaluations
            .iter()
            .map(|p| (p.l1_ratio, p.c))
            .collect();
        assert_eq!(evaluated, grid.candidates());
    }

    #[test]
    fn test_separable_data_reaches_full_accuracy() {
        let (df, y) = separable_data(15);
        let grid = SearchGrid {
            l1_ratios: vec![0.0],
            c_values: vec![1.0, 100.0],
        };

        let search = GridSearchCv::new(test_schema(), PreprocessingConfig::default(), 3, 42);
        let result = search.fit(&grid, &df, &y).unwrap();

        assert!(result.best().mean_score > 0.95);
        assert!(result.model.is_fitted);
    }

    #[test]
    fn test_tie_breaks_to_first_candidate() {
        // Perfectly separable data scores 1.0 for every configuration, so
        // the winner must be the first grid point enumerated
        let (df, y) = separable_data(15);
        let grid = SearchGrid {
            l1_ratios: vec![0.0, 0.2],
            c_values: vec![10.0, 100.0],
        };

        let search = GridSearchCv::new(test_schema(), PreprocessingConfig::default(), 3, 42);
        let result = search.fit(&grid, &df, &y).unwrap();

        let top_score = result.best().mean_score;
        let first_with_top = result
            .evaluations
            .iter()
            .position(|p| p.mean_score == top_score)
            .unwrap();
        assert_eq!(result.best_index, first_with_top);
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        let (df, y) = separable_data(10);
        let grid = SearchGrid {
            l1_ratios: vec![],
            c_values: vec![1.0],
        };

        let search = GridSearchCv::new(test_schema(), PreprocessingConfig::default(), 3, 42);
        assert!(search.fit(&grid, &df, &y).is_err());
    }
}
