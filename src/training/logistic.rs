//! Elastic-net logistic regression

use crate::error::{PalmerError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Binary logistic regression with elastic-net regularization.
///
/// Minimizes mean log-loss plus
/// `1/(c*n) * (l1_ratio * ||w||_1 + (1 - l1_ratio)/2 * ||w||_2^2)`
/// by proximal gradient descent: a gradient step on the smooth part (loss
/// and L2 term) followed by soft-thresholding for the L1 term. The
/// intercept is never penalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticNetLogisticRegression {
    /// Fitted coefficients, one per feature column
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: Option<f64>,
    /// Inverse regularization strength
    pub c: f64,
    /// L1 ratio (0.0 = pure L2, 1.0 = pure L1)
    pub l1_ratio: f64,
    /// Whether to fit an intercept
    pub fit_intercept: bool,
    /// Maximum iterations
    pub max_iter: usize,
    /// Convergence tolerance on the parameter update
    pub tol: f64,
    /// Gradient step size
    pub learning_rate: f64,
    /// Whether the model is fitted
    pub is_fitted: bool,
}

impl Default for ElasticNetLogisticRegression {
    fn default() -> Self {
        Self::new(1.0, 0.5)
    }
}

impl ElasticNetLogisticRegression {
    /// Create a new model with the given hyperparameters
    pub fn new(c: f64, l1_ratio: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            c,
            l1_ratio: l1_ratio.clamp(0.0, 1.0),
            fit_intercept: true,
            max_iter: 2000,
            tol: 1e-6,
            learning_rate: 0.1,
            is_fitted: false,
        }
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the gradient step size
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Sigmoid function
    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Soft-threshold operator for the L1 proximal step
    fn soft_threshold(val: f64, threshold: f64) -> f64 {
        if val > threshold {
            val - threshold
        } else if val < -threshold {
            val + threshold
        } else {
            0.0
        }
    }

    /// Fit the model with proximal gradient descent.
    /// Labels must be 0.0/1.0 class ids.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(PalmerError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PalmerError::ValidationError(
                "cannot fit on an empty matrix".to_string(),
            ));
        }

        let n = n_samples as f64;
        let l1_penalty = self.l1_ratio / (self.c * n);
        let l2_penalty = (1.0 - self.l1_ratio) / (self.c * n);

        let mut weights: Array1<f64> = Array1::zeros(n_features);
        let mut bias = 0.0;

        // Step size capped at the inverse Lipschitz constant of the smooth
        // part (sigmoid curvature is at most 1/4)
        let lipschitz = x.iter().map(|v| v * v).sum::<f64>() / (4.0 * n) + l2_penalty;
        let lr = if lipschitz > 0.0 {
            self.learning_rate.min(1.0 / lipschitz)
        } else {
            self.learning_rate
        };

        for _iter in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let errors = Self::sigmoid(&linear) - y;

            // Gradient of the smooth part: mean log-loss plus L2 term
            let grad = x.t().dot(&errors) / n + l2_penalty * &weights;
            let db = if self.fit_intercept {
                errors.mean().unwrap_or(0.0)
            } else {
                0.0
            };

            // Proximal step: gradient descent then soft-threshold
            let stepped = &weights - &(lr * &grad);
            let new_weights = stepped.mapv(|v| Self::soft_threshold(v, lr * l1_penalty));
            let new_bias = bias - lr * db;

            let delta = (&new_weights - &weights)
                .mapv(f64::abs)
                .fold(0.0f64, |a, &b| a.max(b))
                .max((new_bias - bias).abs());

            weights = new_weights;
            bias = new_bias;

            if delta < self.tol {
                break;
            }
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        self.is_fitted = true;

        Ok(self)
    }

    /// Predict class-1 probabilities
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(PalmerError::ModelNotFitted)?;
        let intercept = self.intercept.unwrap_or(0.0);

        if x.ncols() != coefficients.len() {
            return Err(PalmerError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        let linear = x.dot(coefficients) + intercept;
        Ok(Self::sigmoid(&linear))
    }

    /// Predict class labels (0.5 threshold)
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    /// Accuracy on the given data
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;

        let correct = y_pred
            .iter()
            .zip(y.iter())
            .filter(|(pred, actual)| (*pred - *actual).abs() < 0.5)
            .count();

        Ok(correct as f64 / y.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_separable_data() {
        let x = array![
            [-2.0, -2.0],
            [-1.5, -1.5],
            [-1.0, -1.0],
            [1.0, 1.0],
            [1.5, 1.5],
            [2.0, 2.0],
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut model = ElasticNetLogisticRegression::new(1.0, 0.5);
        model.fit(&x, &y).unwrap();
        assert!(model.is_fitted);

        let accuracy = model.score(&x, &y).unwrap();
        assert!(accuracy >= 0.99, "accuracy = {}", accuracy);
    }

    #[test]
    fn test_predict_proba_ordering() {
        let x = array![[-3.0], [-1.0], [1.0], [3.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];

        let mut model = ElasticNetLogisticRegression::new(10.0, 0.0);
        model.fit(&x, &y).unwrap();

        let proba = model.predict_proba(&x).unwrap();
        assert!(proba[0] < proba[1]);
        assert!(proba[1] < proba[2]);
        assert!(proba[2] < proba[3]);
        assert!(proba[0] < 0.5);
        assert!(proba[3] > 0.5);
    }

    #[test]
    fn test_strong_l1_zeroes_noise_feature() {
        // Second feature carries no signal; pure L1 with small C should
        // drive its weight to exactly zero
        let x = array![
            [-2.0, 0.1],
            [-1.5, -0.1],
            [-1.0, 0.05],
            [1.0, -0.05],
            [1.5, 0.1],
            [2.0, -0.1],
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut model = ElasticNetLogisticRegression::new(0.5, 1.0);
        model.fit(&x, &y).unwrap();

        let coefs = model.coefficients.as_ref().unwrap();
        assert_eq!(coefs[1], 0.0, "noise coefficient = {}", coefs[1]);
    }

    #[test]
    fn test_stronger_regularization_shrinks_weights() {
        let x = array![[-2.0], [-1.0], [1.0], [2.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];

        let mut weak = ElasticNetLogisticRegression::new(100.0, 0.0);
        weak.fit(&x, &y).unwrap();
        let mut strong = ElasticNetLogisticRegression::new(0.01, 0.0);
        strong.fit(&x, &y).unwrap();

        let w_weak = weak.coefficients.as_ref().unwrap()[0].abs();
        let w_strong = strong.coefficients.as_ref().unwrap()[0].abs();
        assert!(w_strong < w_weak, "strong {} vs weak {}", w_strong, w_weak);
    }

    #[test]
    fn test_shape_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![0.0, 1.0, 1.0];

        let mut model = ElasticNetLogisticRegression::default();
        assert!(matches!(
            model.fit(&x, &y),
            Err(PalmerError::ShapeError { .. })
        ));
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = ElasticNetLogisticRegression::default();
        let x = array![[1.0]];
        assert!(matches!(
            model.predict(&x),
            Err(PalmerError::ModelNotFitted)
        ));
    }
}
