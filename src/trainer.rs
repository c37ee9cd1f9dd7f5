use log::{debug, info, warn};
use ndarray::Array1;
use rand::Rng;

use crate::config::LearningConfig;
use crate::dataset::{Dataset, Label};
use crate::error::{LmsError, Result};
use crate::least_mean_squares::{activate, initial_weights, is_misclassified, predict, update};
use crate::validation::{validate, Accuracy, ValidationReport};

/// Lifecycle of a run. Only the terminal states end up in a [`TrainingOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
    /// Initial weights are being checked against the dataset.
    Initializing,
    Running,
    /// Stopping criterion met right after the update on `sample`.
    Converged { iteration: usize, sample: usize },
    /// Every iteration ran without meeting the stopping criterion.
    Exhausted,
}

impl TrainingState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TrainingState::Converged { .. } | TrainingState::Exhausted
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRecord {
    pub error: f64,
    pub weights_after: Array1<f64>,
}

/// Snapshot of one visited training-window sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticRecord {
    pub iteration: usize,
    pub sample: usize,
    pub features: Array1<f64>,
    pub label: Label,
    pub weights_before: Array1<f64>,
    pub predicted: Label,
    pub update: Option<UpdateRecord>,
}

impl DiagnosticRecord {
    pub fn updated(&self) -> bool {
        self.update.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// `Converged` or `Exhausted`.
    pub state: TrainingState,
    pub weights: Array1<f64>,
    pub diagnostics: Vec<DiagnosticRecord>,
    /// Error of every accepted update, in order.
    pub errors: Vec<f64>,
    /// Last training-window validation, `None` when no update ever happened.
    pub training: Option<ValidationReport>,
    pub held_out: ValidationReport,
}

impl TrainingOutcome {
    pub fn converged(&self) -> bool {
        matches!(self.state, TrainingState::Converged { .. })
    }

    pub fn updates(&self) -> usize {
        self.errors.len()
    }
}

pub struct Trainer {
    config: LearningConfig,
}

impl Trainer {
    pub fn new(config: LearningConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Trains from standard normal initial weights drawn from `rng`.
    pub fn fit<R: Rng + ?Sized>(&self, dataset: &Dataset, rng: &mut R) -> Result<TrainingOutcome> {
        debug!("drawing {} initial weights", dataset.dimension());

        self.fit_from(dataset, initial_weights(dataset.dimension(), rng))
    }

    pub fn fit_from(&self, dataset: &Dataset, weights: Array1<f64>) -> Result<TrainingOutcome> {
        let mut state = TrainingState::Initializing;
        debug!("{state:?}: checking {} initial weights", weights.len());

        if weights.len() != dataset.dimension() {
            return Err(LmsError::ShapeMismatch {
                expected: dataset.dimension(),
                actual: weights.len(),
            });
        }

        let learning_rate = self.config.learning_rate();
        let stopping = self.config.stopping();
        let training_window = dataset.prefix(self.config.training_fraction());
        let validation_window = dataset.prefix(self.config.validation_fraction());

        info!(
            "training on {} of {} samples, mu = {learning_rate}, stopping = {stopping:?}",
            training_window.len(),
            dataset.len()
        );

        let mut weights = weights;
        let mut diagnostics = Vec::new();
        let mut errors = Vec::new();
        let mut training = None;
        state = TrainingState::Running;

        'iterations: for iteration in 0..self.config.max_iterations() {
            for sample in training_window.clone() {
                let features = dataset.features(sample);
                let label = dataset.label(sample);
                let score = predict(weights.view(), features)?;

                let mut record = DiagnosticRecord {
                    iteration,
                    sample,
                    features: features.to_owned(),
                    label,
                    weights_before: weights.clone(),
                    predicted: activate(score),
                    update: None,
                };

                if !is_misclassified(score, label) {
                    diagnostics.push(record);
                    continue;
                }

                let step = update(weights, features, label, learning_rate)?;
                weights = step.weights;
                errors.push(step.error);
                debug!("iteration {iteration}, sample {sample}: error {:.4}", step.error);

                record.update = Some(UpdateRecord {
                    error: step.error,
                    weights_after: weights.clone(),
                });
                diagnostics.push(record);

                let report = validate(weights.view(), dataset, validation_window.clone())?;
                let satisfied = stopping.is_satisfied(&report);
                training = Some(report);

                if satisfied {
                    state = TrainingState::Converged { iteration, sample };
                    break 'iterations;
                }
            }
        }

        if !state.is_terminal() {
            state = TrainingState::Exhausted;
        }

        match state {
            TrainingState::Converged { iteration, sample } => info!(
                "converged at iteration {iteration}, sample {sample} after {} updates",
                errors.len()
            ),
            _ => info!(
                "exhausted {} iterations after {} updates",
                self.config.max_iterations(),
                errors.len()
            ),
        }

        if weights.iter().any(|w| !w.is_finite()) {
            warn!("weights diverged, consider a smaller learning rate");
        }

        let held_out = validate(
            weights.view(),
            dataset,
            dataset.suffix(self.config.validation_fraction()),
        )?;

        if held_out.overall == Accuracy::NotApplicable {
            warn!("held-out partition is empty");
        } else if held_out.positive_class == Accuracy::NotApplicable
            || held_out.negative_class == Accuracy::NotApplicable
        {
            warn!("held-out partition is missing a class, per-class accuracy is not applicable");
        }

        Ok(TrainingOutcome {
            state,
            weights,
            diagnostics,
            errors,
            training,
            held_out,
        })
    }
}
