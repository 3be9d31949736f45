//! Coefficient extraction for model interpretability

use crate::error::{PalmerError, Result};
use crate::training::ElasticNetLogisticRegression;
use serde::{Deserialize, Serialize};

/// One feature's fitted coefficient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coefficient {
    pub feature: String,
    pub value: f64,
}

impl Coefficient {
    /// Absolute magnitude, for ranking
    pub fn magnitude(&self) -> f64 {
        self.value.abs()
    }

    /// Sign of the coefficient: +1, -1, or 0
    pub fn sign(&self) -> i8 {
        if self.value > 0.0 {
            1
        } else if self.value < 0.0 {
            -1
        } else {
            0
        }
    }
}

/// Fitted coefficients paired with the pipeline's emitted feature columns,
/// in emission order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefficientReport {
    pub intercept: f64,
    coefficients: Vec<Coefficient>,
}

impl CoefficientReport {
    /// Pair each feature name with its coefficient.
    /// `feature_names` must match the model's feature count and order.
    pub fn from_model(
        feature_names: &[String],
        model: &ElasticNetLogisticRegression,
    ) -> Result<Self> {
        let weights = model
            .coefficients
            .as_ref()
            .ok_or(PalmerError::ModelNotFitted)?;

        if weights.len() != feature_names.len() {
            return Err(PalmerError::ShapeError {
                expected: format!("{} feature names", weights.len()),
                actual: format!("{} feature names", feature_names.len()),
            });
        }

        let coefficients = feature_names
            .iter()
            .zip(weights.iter())
            .map(|(name, &value)| Coefficient {
                feature: name.clone(),
                value,
            })
            .collect();

        Ok(Self {
            intercept: model.intercept.unwrap_or(0.0),
            coefficients,
        })
    }

    /// Coefficients in pipeline emission order
    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coefficients
    }

    /// Coefficients ranked by descending magnitude
    pub fn ranked(&self) -> Vec<&Coefficient> {
        let mut sorted: Vec<&Coefficient> = self.coefficients.iter().collect();
        sorted.sort_by(|a, b| {
            b.magnitude()
                .partial_cmp(&a.magnitude())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    /// Largest coefficient magnitude, used to scale rendered bars
    pub fn max_magnitude(&self) -> f64 {
        self.coefficients
            .iter()
            .map(|c| c.magnitude())
            .fold(0.0f64, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn fitted_model(weights: Vec<f64>) -> ElasticNetLogisticRegression {
        let mut model = ElasticNetLogisticRegression::new(1.0, 0.0);
        model.coefficients = Some(Array1::from_vec(weights));
        model.intercept = Some(0.25);
        model.is_fitted = true;
        model
    }

    fn feature_names() -> Vec<String> {
        vec![
            "species_Gentoo".to_string(),
            "bill_depth_mm".to_string(),
            "body_mass_g".to_string(),
        ]
    }

    #[test]
    fn test_order_matches_feature_names() {
        let model = fitted_model(vec![0.5, -2.0, 1.0]);
        let report = CoefficientReport::from_model(&feature_names(), &model).unwrap();

        let coefs = report.coefficients();
        assert_eq!(coefs[0].feature, "species_Gentoo");
        assert_eq!(coefs[0].value, 0.5);
        assert_eq!(coefs[1].value, -2.0);
        assert_eq!(report.intercept, 0.25);
    }

    #[test]
    fn test_ranked_by_magnitude() {
        let model = fitted_model(vec![0.5, -2.0, 1.0]);
        let report = CoefficientReport::from_model(&feature_names(), &model).unwrap();

        let ranked = report.ranked();
        assert_eq!(ranked[0].feature, "bill_depth_mm");
        assert_eq!(ranked[1].feature, "body_mass_g");
        assert_eq!(ranked[2].feature, "species_Gentoo");
    }

    #[test]
    fn test_sign() {
        let model = fitted_model(vec![0.5, -2.0, 0.0]);
        let report = CoefficientReport::from_model(&feature_names(), &model).unwrap();

        let coefs = report.coefficients();
        assert_eq!(coefs[0].sign(), 1);
        assert_eq!(coefs[1].sign(), -1);
        assert_eq!(coefs[2].sign(), 0);
    }

    #[test]
    fn test_name_count_mismatch() {
        let model = fitted_model(vec![0.5, -2.0]);
        assert!(matches!(
            CoefficientReport::from_model(&feature_names(), &model),
            Err(PalmerError::ShapeError { .. })
        ));
    }

    #[test]
    fn test_unfitted_model() {
        let model = ElasticNetLogisticRegression::new(1.0, 0.0);
        assert!(matches!(
            CoefficientReport::from_model(&feature_names(), &model),
            Err(PalmerError::ModelNotFitted)
        ));
    }
}
