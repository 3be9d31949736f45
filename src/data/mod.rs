//! Dataset handling
//!
//! Loading the penguins CSV (remote or local), dropping rows with a missing
//! target label, and the seeded stratified train/test split.

mod clean;
mod loader;
mod split;

pub use clean::drop_missing_target;
pub use loader::DatasetLoader;
pub use split::{encode_labels, take_rows, train_test_split, TrainTestSplit};
