use std::fmt;
use std::ops::Range;

use ndarray::ArrayView1;

use crate::dataset::{Dataset, Label};
use crate::error::{LmsError, Result};
use crate::least_mean_squares::{activate, predict};

/// Ratio of correct predictions. `NotApplicable` when the denominator is zero,
/// e.g. a class that does not occur in the partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Accuracy {
    Ratio(f64),
    NotApplicable,
}

impl Accuracy {
    fn of(correct: usize, total: usize) -> Accuracy {
        if total == 0 {
            Accuracy::NotApplicable
        } else {
            Accuracy::Ratio(correct as f64 / total as f64)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Accuracy::Ratio(ratio) => Some(ratio),
            Accuracy::NotApplicable => None,
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accuracy::Ratio(ratio) => write!(f, "{:.3}%", ratio * 100.0),
            Accuracy::NotApplicable => f.write_str("n/a"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    fn record(&mut self, actual: Label, predicted: Label) {
        match (actual, predicted) {
            (Label::Positive, Label::Positive) => self.true_positives += 1,
            (Label::Negative, Label::Negative) => self.true_negatives += 1,
            (Label::Negative, Label::Positive) => self.false_positives += 1,
            (Label::Positive, Label::Negative) => self.false_negatives += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    pub fn correct(&self) -> usize {
        self.true_positives + self.true_negatives
    }

    /// Samples whose true label is positive.
    pub fn positives(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    pub fn negatives(&self) -> usize {
        self.true_negatives + self.false_positives
    }

    pub fn predicted_positives(&self) -> usize {
        self.true_positives + self.false_positives
    }

    pub fn predicted_negatives(&self) -> usize {
        self.true_negatives + self.false_negatives
    }
}

/// Both accuracy forms, so either stopping policy can read what it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationReport {
    pub confusion: ConfusionMatrix,
    pub overall: Accuracy,
    pub positive_class: Accuracy,
    pub negative_class: Accuracy,
}

impl ValidationReport {
    pub fn from_confusion(confusion: ConfusionMatrix) -> Self {
        Self {
            confusion,
            overall: Accuracy::of(confusion.correct(), confusion.total()),
            positive_class: Accuracy::of(confusion.true_positives, confusion.positives()),
            negative_class: Accuracy::of(confusion.true_negatives, confusion.negatives()),
        }
    }
}

/// Classifies the samples in `partition` with frozen `weights` and tallies the
/// outcome.
pub fn validate(
    weights: ArrayView1<'_, f64>,
    dataset: &Dataset,
    partition: Range<usize>,
) -> Result<ValidationReport> {
    if partition.end > dataset.len() || partition.start > partition.end {
        return Err(LmsError::InvalidPartition {
            start: partition.start,
            end: partition.end,
            len: dataset.len(),
        });
    }

    let mut confusion = ConfusionMatrix::default();

    for index in partition {
        let score = predict(weights, dataset.features(index))?;
        confusion.record(dataset.label(index), activate(score));
    }

    Ok(ValidationReport::from_confusion(confusion))
}
