//! Learning hyperparameters and the stopping/partition policy.
//!
//! Two presets cover the known variants of the classifier:
//! - [`LearningConfig::default`]: overall accuracy above 0.8, samples in the
//!   first 70% trained on, validation cut at 75%.
//! - [`LearningConfig::per_class`]: both class accuracies above 0.5, training
//!   window and validation cut at 75%.

use crate::error::{LmsError, Result};
use crate::validation::{Accuracy, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoppingPolicy {
    /// Stop once correct / total exceeds `threshold`.
    OverallAccuracy { threshold: f64 },
    /// Stop once the accuracy of each class exceeds `threshold`.
    PerClassAccuracy { threshold: f64 },
}

impl StoppingPolicy {
    pub fn threshold(&self) -> f64 {
        match *self {
            StoppingPolicy::OverallAccuracy { threshold }
            | StoppingPolicy::PerClassAccuracy { threshold } => threshold,
        }
    }

    /// A not applicable accuracy never satisfies the policy.
    pub fn is_satisfied(&self, report: &ValidationReport) -> bool {
        let above = |accuracy: Accuracy| accuracy.value().is_some_and(|v| v > self.threshold());

        match self {
            StoppingPolicy::OverallAccuracy { .. } => above(report.overall),
            StoppingPolicy::PerClassAccuracy { .. } => {
                above(report.positive_class) && above(report.negative_class)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearningConfig {
    learning_rate: f64,
    max_iterations: usize,
    stopping: StoppingPolicy,
    training_fraction: f64,
    validation_fraction: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            max_iterations: 1000,
            stopping: StoppingPolicy::OverallAccuracy { threshold: 0.8 },
            training_fraction: 0.7,
            validation_fraction: 0.75,
        }
    }
}

impl LearningConfig {
    pub fn new(learning_rate: f64, max_iterations: usize, stopping: StoppingPolicy) -> Self {
        Self {
            learning_rate,
            max_iterations,
            stopping,
            ..Self::default()
        }
    }

    pub fn per_class() -> Self {
        Self {
            stopping: StoppingPolicy::PerClassAccuracy { threshold: 0.5 },
            training_fraction: 0.75,
            validation_fraction: 0.75,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_stopping(mut self, stopping: StoppingPolicy) -> Self {
        self.stopping = stopping;
        self
    }

    /// Fraction of the dataset, from the start, whose samples are trained on.
    #[must_use]
    pub fn with_training_fraction(mut self, fraction: f64) -> Self {
        self.training_fraction = fraction;
        self
    }

    /// Cut between the training-window validation pass and the held-out pass.
    #[must_use]
    pub fn with_validation_fraction(mut self, fraction: f64) -> Self {
        self.validation_fraction = fraction;
        self
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn stopping(&self) -> StoppingPolicy {
        self.stopping
    }

    pub fn training_fraction(&self) -> f64 {
        self.training_fraction
    }

    pub fn validation_fraction(&self) -> f64 {
        self.validation_fraction
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(LmsError::InvalidConfiguration(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }

        if self.max_iterations == 0 {
            return Err(LmsError::InvalidConfiguration(
                "max iterations must be positive".to_string(),
            ));
        }

        let threshold = self.stopping.threshold();
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(LmsError::InvalidConfiguration(format!(
                "stopping threshold must lie in (0, 1], got {threshold}"
            )));
        }

        for (name, fraction) in [
            ("training fraction", self.training_fraction),
            ("validation fraction", self.validation_fraction),
        ] {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(LmsError::InvalidConfiguration(format!(
                    "{name} must lie in (0, 1], got {fraction}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ConfusionMatrix;

    fn report(
        true_positives: usize,
        false_negatives: usize,
        true_negatives: usize,
        false_positives: usize,
    ) -> ValidationReport {
        ValidationReport::from_confusion(ConfusionMatrix {
            true_positives,
            true_negatives,
            false_positives,
            false_negatives,
        })
    }

    #[test]
    fn presets_are_valid() {
        assert!(LearningConfig::default().validate().is_ok());
        assert!(LearningConfig::per_class().validate().is_ok());
        assert_eq!(LearningConfig::per_class().training_fraction(), 0.75);
    }

    #[test]
    fn rejects_non_positive_learning_rate() {
        for rate in [0.0, -0.1, f64::NAN] {
            let config = LearningConfig::default().with_learning_rate(rate);
            assert!(matches!(
                config.validate(),
                Err(LmsError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn rejects_zero_iterations() {
        let config = LearningConfig::default().with_max_iterations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn threshold_bounds() {
        let at_one = LearningConfig::default()
            .with_stopping(StoppingPolicy::OverallAccuracy { threshold: 1.0 });
        assert!(at_one.validate().is_ok());

        for threshold in [0.0, 1.01, -0.5] {
            let config = LearningConfig::default()
                .with_stopping(StoppingPolicy::PerClassAccuracy { threshold });
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn rejects_fractions_outside_unit_interval() {
        assert!(LearningConfig::default()
            .with_training_fraction(0.0)
            .validate()
            .is_err());
        assert!(LearningConfig::default()
            .with_validation_fraction(1.5)
            .validate()
            .is_err());
    }

    #[test]
    fn overall_policy_is_strict() {
        let policy = StoppingPolicy::OverallAccuracy { threshold: 0.75 };

        assert!(!policy.is_satisfied(&report(2, 1, 1, 0)));
        assert!(policy.is_satisfied(&report(3, 0, 1, 0)));
    }

    #[test]
    fn per_class_policy_needs_both_classes() {
        let policy = StoppingPolicy::PerClassAccuracy { threshold: 0.5 };

        assert!(policy.is_satisfied(&report(2, 1, 2, 1)));
        assert!(!policy.is_satisfied(&report(3, 0, 1, 1)));
        assert!(!policy.is_satisfied(&report(4, 0, 0, 0)));
    }
}
