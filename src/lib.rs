//! Palmer ML - penguin sex classification pipeline
//!
//! Trains an elastic-net logistic regression classifier that predicts
//! penguin sex from morphological and categorical features of the Palmer
//! Penguins dataset. The crate covers the complete workflow:
//!
//! - [`data`] - dataset loading (remote or local CSV), target cleaning,
//!   stratified train/test splitting
//! - [`schema`] - declared column schema driving preprocessing dispatch
//! - [`preprocessing`] - imputation, scaling, one-hot encoding
//! - [`training`] - elastic-net logistic regression, k-fold
//!   cross-validation, grid search
//! - [`report`] - signed coefficient extraction for interpretability
//! - [`experiment`] - end-to-end orchestration of the above
//! - [`cli`] - command-line entry point

pub mod error;

pub mod config;
pub mod schema;

pub mod data;
pub mod preprocessing;
pub mod training;

pub mod report;
pub mod experiment;

pub mod cli;

pub use error::{PalmerError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{PalmerError, Result};

    // Configuration
    pub use crate::config::{RunConfig, SearchGrid};
    pub use crate::schema::{ColumnRole, ColumnSpec, DatasetSchema};

    // Data handling
    pub use crate::data::{drop_missing_target, train_test_split, DatasetLoader, TrainTestSplit};

    // Preprocessing
    pub use crate::preprocessing::{
        ImputeStrategy, Imputer, OneHotEncoder, PreprocessPipeline, PreprocessingConfig, Scaler,
        ScalerType,
    };

    // Training
    pub use crate::training::{
        CVResults, CVSplit, CVStrategy, ClassificationReport, CrossValidator,
        ElasticNetLogisticRegression, GridPoint, GridSearchCv, GridSearchResult,
    };

    // Reporting
    pub use crate::report::{Coefficient, CoefficientReport};

    // Orchestration
    pub use crate::experiment::{Experiment, ExperimentReport};
}
