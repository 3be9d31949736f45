//! Run configuration
//!
//! All workflow constants live here as an explicit record passed into each
//! stage, rather than as free-standing globals.

use crate::error::{PalmerError, Result};
use serde::{Deserialize, Serialize};

/// Default remote location of the Palmer Penguins CSV
pub const PENGUINS_CSV_URL: &str =
    "https://raw.githubusercontent.com/allisonhorst/palmerpenguins/main/inst/extdata/penguins.csv";

/// Hyperparameter grid for the elastic-net logistic regression search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchGrid {
    /// L1/L2 mixing ratios (0.0 = pure L2, 1.0 = pure L1)
    pub l1_ratios: Vec<f64>,
    /// Inverse regularization strengths
    pub c_values: Vec<f64>,
}

impl Default for SearchGrid {
    fn default() -> Self {
        Self {
            l1_ratios: vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0],
            c_values: vec![0.001, 0.01, 0.1, 1.0, 10.0, 100.0, 1000.0],
        }
    }
}

impl SearchGrid {
    /// Enumerate every (l1_ratio, c) pair, l1_ratio outer, c inner.
    /// Selection ties are broken by this order.
    pub fn candidates(&self) -> Vec<(f64, f64)> {
        let mut pairs = Vec::with_capacity(self.len());
        for &l1_ratio in &self.l1_ratios {
            for &c in &self.c_values {
                pairs.push((l1_ratio, c));
            }
        }
        pairs
    }

    /// Number of grid points
    pub fn len(&self) -> usize {
        self.l1_ratios.len() * self.c_values.len()
    }

    /// Whether the grid is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Configuration for a full experiment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// CSV location: an http(s) URL or a filesystem path
    pub data_source: String,

    /// Name of the target column
    pub target_column: String,

    /// Seed for the train/test split and cross-validation shuffles
    pub seed: u64,

    /// Fraction of rows held out for the test set
    pub test_fraction: f64,

    /// Number of cross-validation folds
    pub cv_folds: usize,

    /// Hyperparameter grid to search
    pub grid: SearchGrid,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_source: PENGUINS_CSV_URL.to_string(),
            target_column: "sex".to_string(),
            seed: 2435,
            test_fraction: 0.25,
            cv_folds: 5,
            grid: SearchGrid::default(),
        }
    }
}

impl RunConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the data source
    pub fn with_data_source(mut self, source: impl Into<String>) -> Self {
        self.data_source = source.into();
        self
    }

    /// Builder method to set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the test fraction
    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    /// Builder method to set the fold count
    pub fn with_cv_folds(mut self, folds: usize) -> Self {
        self.cv_folds = folds;
        self
    }

    /// Builder method to set the hyperparameter grid
    pub fn with_grid(mut self, grid: SearchGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Check the configuration for values no stage can work with
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PalmerError::ValidationError(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.cv_folds < 2 {
            return Err(PalmerError::ValidationError(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if self.grid.is_empty() {
            return Err(PalmerError::ValidationError(
                "hyperparameter grid is empty".to_string(),
            ));
        }
        if self.grid.l1_ratios.iter().any(|&r| !(0.0..=1.0).contains(&r)) {
            return Err(PalmerError::ValidationError(
                "l1_ratios must lie in [0, 1]".to_string(),
            ));
        }
        if self.grid.c_values.iter().any(|&c| c <= 0.0) {
            return Err(PalmerError::ValidationError(
                "c_values must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.target_column, "sex");
        assert_eq!(config.seed, 2435);
        assert_eq!(config.test_fraction, 0.25);
        assert_eq!(config.cv_folds, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RunConfig::new()
            .with_seed(7)
            .with_test_fraction(0.2)
            .with_cv_folds(10);

        assert_eq!(config.seed, 7);
        assert_eq!(config.test_fraction, 0.2);
        assert_eq!(config.cv_folds, 10);
    }

    #[test]
    fn test_grid_enumeration_order() {
        let grid = SearchGrid {
            l1_ratios: vec![0.0, 1.0],
            c_values: vec![0.1, 1.0],
        };
        let pairs = grid.candidates();
        assert_eq!(pairs, vec![(0.0, 0.1), (0.0, 1.0), (1.0, 0.1), (1.0, 1.0)]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(RunConfig::new().with_test_fraction(0.0).validate().is_err());
        assert!(RunConfig::new().with_cv_folds(1).validate().is_err());

        let bad_grid = SearchGrid {
            l1_ratios: vec![1.5],
            c_values: vec![1.0],
        };
        assert!(RunConfig::new().with_grid(bad_grid).validate().is_err());
    }
}
