use std::ops::Range;

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1};

use crate::dataset::{Dataset, Label};
use crate::error::{LmsError, Result};
use crate::least_mean_squares::{activate, predict};

/// Closed-form least-squares weights over a window of the dataset, the fixed
/// point LMS drifts towards. The bias weight is not regularized.
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    weights: Array1<f64>,
    regularization: f64,
}

impl RidgeRegression {
    pub fn new(regularization: f64) -> Self {
        Self {
            weights: Array1::zeros(0),
            regularization,
        }
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    pub fn fit(&mut self, dataset: &Dataset, window: Range<usize>) -> Result<()> {
        if window.is_empty() {
            return Err(LmsError::EmptyDataset);
        }

        let dimension = dataset.dimension();

        // X
        let features = DMatrix::from_fn(window.len(), dimension, |i, j| {
            dataset.features(window.start + i)[j]
        });

        // y
        let labels = DVector::from_iterator(
            window.len(),
            window.clone().map(|index| dataset.label(index).value()),
        );

        let features_transpose = features.transpose();

        // (tau * I)
        let mut regularization = DMatrix::<f64>::identity(dimension, dimension) * self.regularization;
        regularization[(0, 0)] = 0.0;

        // (X^T * X + tau * I)
        let covariance = &features_transpose * &features + regularization;

        // (X^T * X + tau * I)^-1
        let covariance_inverse = covariance.try_inverse().ok_or(LmsError::SingularSystem)?;

        // (X^T * X + tau * I)^-1 * (X^T * y)
        let weights = covariance_inverse * (features_transpose * labels);

        self.weights = weights.iter().copied().collect();

        Ok(())
    }

    pub fn predict(&self, features: ArrayView1<'_, f64>) -> Result<Label> {
        Ok(activate(predict(self.weights.view(), features)?))
    }

    /// Euclidean distance to another weight vector.
    pub fn distance(&self, weights: ArrayView1<'_, f64>) -> Result<f64> {
        if weights.len() != self.weights.len() {
            return Err(LmsError::ShapeMismatch {
                expected: self.weights.len(),
                actual: weights.len(),
            });
        }

        let difference = &self.weights - &weights;

        Ok(difference.dot(&difference).sqrt())
    }
}
