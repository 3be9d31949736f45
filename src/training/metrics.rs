//! Classification metrics

use serde::{Deserialize, Serialize};

/// Precision, recall, and F1 for one class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of true samples of this class
    pub support: usize,
}

/// Per-class metrics plus overall accuracy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub n_samples: usize,
}

impl ClassificationReport {
    /// Compute the report from encoded labels.
    ///
    /// `class_names[i]` is the name of class id `i`; labels are matched by
    /// rounding, consistent with the 0.0/1.0 encoding used throughout.
    pub fn compute(y_true: &[f64], y_pred: &[f64], class_names: &[String]) -> Self {
        let n_samples = y_true.len();

        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| (*t - *p).abs() < 0.5)
            .count();
        let accuracy = if n_samples > 0 {
            correct as f64 / n_samples as f64
        } else {
            0.0
        };

        let mut classes = Vec::with_capacity(class_names.len());
        for (class_id, name) in class_names.iter().enumerate() {
            let id = class_id as f64;

            let mut tp = 0usize;
            let mut fp = 0usize;
            let mut fn_ = 0usize;

            for (t, p) in y_true.iter().zip(y_pred.iter()) {
                let t_is = (*t - id).abs() < 0.5;
                let p_is = (*p - id).abs() < 0.5;
                match (t_is, p_is) {
                    (true, true) => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fn_ += 1,
                    (false, false) => {}
                }
            }

            let precision = if tp + fp > 0 {
                tp as f64 / (tp + fp) as f64
            } else {
                0.0
            };
            let recall = if tp + fn_ > 0 {
                tp as f64 / (tp + fn_) as f64
            } else {
                0.0
            };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            classes.push(ClassMetrics {
                class: name.clone(),
                precision,
                recall,
                f1,
                support: tp + fn_,
            });
        }

        Self {
            classes,
            accuracy,
            n_samples,
        }
    }
}
