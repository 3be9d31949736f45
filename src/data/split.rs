//! Stratified train/test splitting

use crate::error::{PalmerError, Result};
use ndarray::Array1;
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::info;

/// Output of [`train_test_split`]: disjoint feature frames plus encoded
/// labels, with row correspondence preserved on both sides.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Training features (target column removed)
    pub train: DataFrame,
    /// Test features (target column removed)
    pub test: DataFrame,
    /// Training labels as class ids
    pub y_train: Array1<f64>,
    /// Test labels as class ids
    pub y_test: Array1<f64>,
    /// Class names; position is the encoded id
    pub classes: Vec<String>,
    /// Source row indices of the training side, ascending
    pub train_indices: Vec<usize>,
    /// Source row indices of the test side, ascending
    pub test_indices: Vec<usize>,
}

/// Select `indices` rows of `df`, in the given order
pub fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec(
        "idx".into(),
        indices.iter().map(|&i| i as IdxSize).collect(),
    );
    df.take(&idx)
        .map_err(|e| PalmerError::DataError(e.to_string()))
}

/// Encode a string target column as f64 class ids.
///
/// Class names are sorted lexicographically; the id of a class is its
/// position in that ordering. Requires a cleaned (null-free) target.
pub fn encode_labels(df: &DataFrame, target: &str) -> Result<(Array1<f64>, Vec<String>)> {
    let column = df
        .column(target)
        .map_err(|_| PalmerError::ColumnNotFound(target.to_string()))?;
    let ca = column
        .as_materialized_series()
        .str()
        .map_err(|e| PalmerError::DataError(e.to_string()))?;

    if ca.null_count() > 0 {
        return Err(PalmerError::ValidationError(format!(
            "target column {} contains missing values; clean the data first",
            target
        )));
    }

    let mut classes: Vec<String> = ca
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    classes.sort();

    if classes.len() < 2 {
        return Err(PalmerError::ValidationError(format!(
            "target column {} has fewer than two classes",
            target
        )));
    }

    let labels: Vec<f64> = ca
        .into_iter()
        .flatten()
        .map(|v| classes.iter().position(|c| c.as_str() == v).unwrap() as f64)
        .collect();

    Ok((Array1::from_vec(labels), classes))
}

/// Stratified train/test split, deterministic given `seed`.
///
/// Rows are grouped per class, shuffled with a seeded ChaCha8 generator,
/// and `round(class_len * test_fraction)` rows of each class (at least one,
/// never all) go to the test side. Returned frames keep the source row
/// order within each side.
pub fn train_test_split(
    df: &DataFrame,
    target: &str,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PalmerError::ValidationError(format!(
            "test_fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let (labels, classes) = encode_labels(df, target)?;

    let mut by_class: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in labels.iter().enumerate() {
        by_class.entry(label as i64).or_default().push(idx);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for (class_id, indices) in by_class.iter_mut() {
        if indices.len() < 2 {
            return Err(PalmerError::ValidationError(format!(
                "class {} has too few members ({}) to stratify",
                classes[*class_id as usize],
                indices.len()
            )));
        }

        indices.shuffle(&mut rng);

        let n_test = ((indices.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.clamp(1, indices.len() - 1);

        test_indices.extend_from_slice(&indices[..n_test]);
        train_indices.extend_from_slice(&indices[n_test..]);
    }

    train_indices.sort_unstable();
    test_indices.sort_unstable();

    let features = df
        .drop(target)
        .map_err(|e| PalmerError::DataError(e.to_string()))?;

    let train = take_rows(&features, &train_indices)?;
    let test = take_rows(&features, &test_indices)?;

    let y_train = Array1::from_iter(train_indices.iter().map(|&i| labels[i]));
    let y_test = Array1::from_iter(test_indices.iter().map(|&i| labels[i]));

    info!(
        n_train = train_indices.len(),
        n_test = test_indices.len(),
        seed,
        "stratified split"
    );

    Ok(TrainTestSplit {
        train,
        test,
        y_train,
        y_test,
        classes,
        train_indices,
        test_indices,
    })
}
