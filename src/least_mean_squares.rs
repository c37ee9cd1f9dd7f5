use ndarray::{Array1, ArrayView1};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::dataset::Label;
use crate::error::{LmsError, Result};

/// Linear score `w·x`.
pub fn predict(weights: ArrayView1<'_, f64>, features: ArrayView1<'_, f64>) -> Result<f64> {
    if weights.len() != features.len() {
        return Err(LmsError::ShapeMismatch {
            expected: weights.len(),
            actual: features.len(),
        });
    }

    Ok(weights.dot(&features))
}

/// Maps a score to a class. A score of exactly zero is negative.
pub fn activate(score: f64) -> Label {
    if score > 0.0 {
        Label::Positive
    } else {
        Label::Negative
    }
}

/// Sign disagreement between the raw score and the true label. A zero score
/// is not a misclassification.
pub fn is_misclassified(score: f64, label: Label) -> bool {
    score * label.value() < 0.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub weights: Array1<f64>,
    /// `w·x - y` before the step.
    pub error: f64,
}

/// One Widrow-Hoff step: `w <- w - mu * (w·x - y) * x`.
pub fn update(
    mut weights: Array1<f64>,
    features: ArrayView1<'_, f64>,
    label: Label,
    learning_rate: f64,
) -> Result<Update> {
    let error = predict(weights.view(), features)? - label.value();

    weights.scaled_add(-learning_rate * error, &features);

    Ok(Update { weights, error })
}

/// Independent standard normal draws, one per feature dimension.
pub fn initial_weights<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Array1<f64> {
    (0..dimension)
        .map(|_| -> f64 { StandardNormal.sample(&mut *rng) })
        .collect()
}

/// The line `w0 + w1·x1 + w2·x2 = 0` written as `x2 = slope·x1 + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionBoundary {
    pub slope: f64,
    pub intercept: f64,
}

impl DecisionBoundary {
    /// Only defined for two explanatory variables and a non-zero `w2`.
    pub fn from_weights(weights: ArrayView1<'_, f64>) -> Option<Self> {
        if weights.len() != 3 || weights[2] == 0.0 {
            return None;
        }

        Some(Self {
            slope: -weights[1] / weights[2],
            intercept: -weights[0] / weights[2],
        })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
