//! Data preprocessing module
//!
//! Schema-routed preprocessing:
//! - Missing value imputation (mean / median / most frequent)
//! - Feature scaling (standard, min-max)
//! - One-hot encoding with binary-column collapse
//! - The combined [`PreprocessPipeline`]

mod config;
mod encoder;
mod imputer;
mod pipeline;
mod scaler;

pub use config::PreprocessingConfig;
pub use encoder::OneHotEncoder;
pub use imputer::{ImputeStrategy, Imputer};
pub use pipeline::PreprocessPipeline;
pub use scaler::{Scaler, ScalerType};
