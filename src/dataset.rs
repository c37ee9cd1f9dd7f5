use std::ops::Range;

use ndarray::{Array1, ArrayView1};

use crate::error::{LmsError, Result};

pub const BIAS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    pub fn value(self) -> f64 {
        match self {
            Label::Positive => 1.0,
            Label::Negative => -1.0,
        }
    }

    #[allow(clippy::float_cmp)]
    pub fn from_value(value: f64) -> Result<Label> {
        if value == 1.0 {
            Ok(Label::Positive)
        } else if value == -1.0 {
            Ok(Label::Negative)
        } else {
            Err(LmsError::InvalidLabel(value))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Bias term followed by the explanatory variables.
    pub features: Array1<f64>,
    pub label: Label,
}

/// Ordered, immutable set of samples. Partitions are derived from positions,
/// so the order given at construction is kept as is.
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Vec<Sample>,
    dimension: usize,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        let dimension = samples
            .first()
            .map(|sample| sample.features.len())
            .ok_or(LmsError::EmptyDataset)?;

        for (index, sample) in samples.iter().enumerate() {
            if sample.features.len() != dimension {
                return Err(LmsError::ShapeMismatch {
                    expected: dimension,
                    actual: sample.features.len(),
                });
            }

            #[allow(clippy::float_cmp)]
            if sample.features[0] != BIAS {
                return Err(LmsError::MissingBias { sample: index });
            }
        }

        Ok(Self { samples, dimension })
    }

    /// Builds a dataset from raw explanatory rows, prepending the bias term.
    pub fn from_rows(rows: Vec<Vec<f64>>, labels: Vec<Label>) -> Result<Self> {
        if rows.len() != labels.len() {
            return Err(LmsError::ShapeMismatch {
                expected: rows.len(),
                actual: labels.len(),
            });
        }

        let samples = rows
            .into_iter()
            .zip(labels)
            .map(|(row, label)| {
                let features = std::iter::once(BIAS).chain(row).collect::<Array1<f64>>();
                Sample { features, label }
            })
            .collect();

        Self::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length of every feature vector, bias included.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn features(&self, index: usize) -> ArrayView1<'_, f64> {
        self.samples[index].features.view()
    }

    pub fn label(&self, index: usize) -> Label {
        self.samples[index].label
    }

    /// Position of the cut point for `fraction`, truncated towards zero.
    pub fn cut(&self, fraction: f64) -> usize {
        #[allow(clippy::cast_possible_truncation)]
        #[allow(clippy::cast_sign_loss)]
        let cut = (self.samples.len() as f64 * fraction) as usize;

        cut.min(self.samples.len())
    }

    pub fn prefix(&self, fraction: f64) -> Range<usize> {
        0..self.cut(fraction)
    }

    pub fn suffix(&self, fraction: f64) -> Range<usize> {
        self.cut(fraction)..self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn four_samples() -> Dataset {
        Dataset::from_rows(
            vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![-1.0, -1.0], vec![2.0, 2.0]],
            vec![Label::Positive, Label::Positive, Label::Negative, Label::Negative],
        )
        .unwrap()
    }

    #[test]
    fn from_rows_prepends_bias() {
        let dataset = four_samples();

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.dimension(), 3);
        assert_eq!(dataset.features(1), array![1.0, 1.0, 1.0].view());
        assert_eq!(dataset.label(2), Label::Negative);
    }

    #[test]
    fn rejects_empty_dataset() {
        assert!(matches!(Dataset::new(Vec::new()), Err(LmsError::EmptyDataset)));
    }

    #[test]
    fn rejects_ragged_features() {
        let samples = vec![
            Sample {
                features: array![1.0, 2.0],
                label: Label::Positive,
            },
            Sample {
                features: array![1.0, 2.0, 3.0],
                label: Label::Negative,
            },
        ];

        assert!(matches!(
            Dataset::new(samples),
            Err(LmsError::ShapeMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn rejects_missing_bias() {
        let samples = vec![Sample {
            features: array![0.5, 2.0],
            label: Label::Positive,
        }];

        assert!(matches!(
            Dataset::new(samples),
            Err(LmsError::MissingBias { sample: 0 })
        ));
    }

    #[test]
    fn partitions_truncate_and_complement() {
        let dataset = four_samples();

        assert_eq!(dataset.prefix(0.7), 0..2);
        assert_eq!(dataset.suffix(0.7), 2..4);
        assert_eq!(dataset.prefix(0.75), 0..3);
        assert_eq!(dataset.suffix(0.75), 3..4);
        assert_eq!(dataset.suffix(1.0), 4..4);
    }

    #[test]
    fn label_values() {
        assert_eq!(Label::from_value(1.0).unwrap(), Label::Positive);
        assert_eq!(Label::from_value(-1.0).unwrap(), Label::Negative);
        assert!(matches!(Label::from_value(0.0), Err(LmsError::InvalidLabel(_))));
        assert_eq!(Label::Negative.value(), -1.0);
    }
}
