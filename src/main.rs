use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{info, warn};

use lms::{
    config::{LearningConfig, StoppingPolicy},
    dataset::Dataset,
    parse::{parse, ParseOptions},
    plot::{plot_decision_boundary, plot_errors},
    report::write_results_file,
    ridge_regression::RidgeRegression,
    trainer::{Trainer, TrainingOutcome},
    validation::ValidationReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Stop once overall accuracy exceeds the threshold
    Overall,
    /// Stop once both class accuracies exceed the threshold
    PerClass,
}

#[derive(Parser)]
#[command(name = "lms")]
#[command(about = "Trains a linear binary classifier with the LMS rule")]
#[command(version)]
struct Args {
    /// Delimited file, one sample per row with the label last
    #[arg(short = 'd', long, default_value = "data.csv")]
    data: PathBuf,

    /// Where the per-sample diagnostics table is written
    #[arg(short = 'o', long, default_value = "results.csv")]
    output: PathBuf,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// The first row holds column names
    #[arg(long)]
    has_headers: bool,

    /// Z-score each explanatory column before training
    #[arg(long)]
    normalize: bool,

    #[arg(long, value_enum, default_value = "overall")]
    policy: Policy,

    /// Learning rate (mu)
    #[arg(short = 'l', long)]
    learning_rate: Option<f64>,

    #[arg(short = 'i', long)]
    max_iterations: Option<usize>,

    /// Stopping accuracy threshold, in (0, 1]
    #[arg(short = 't', long)]
    threshold: Option<f64>,

    /// Leading fraction of samples that are trained on
    #[arg(long)]
    training_fraction: Option<f64>,

    /// Cut between the training-window and held-out validation passes
    #[arg(long)]
    validation_fraction: Option<f64>,

    /// Directory for the decision boundary and error charts
    #[arg(long)]
    plot_dir: Option<PathBuf>,

    /// Regularization of the closed-form least-squares reference
    #[arg(long, default_value_t = 0.0)]
    ridge_regularization: f64,
}

impl Args {
    fn learning_config(&self) -> LearningConfig {
        let mut config = match self.policy {
            Policy::Overall => LearningConfig::default(),
            Policy::PerClass => LearningConfig::per_class(),
        };

        if let Some(learning_rate) = self.learning_rate {
            config = config.with_learning_rate(learning_rate);
        }
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let Some(threshold) = self.threshold {
            config = config.with_stopping(match self.policy {
                Policy::Overall => StoppingPolicy::OverallAccuracy { threshold },
                Policy::PerClass => StoppingPolicy::PerClassAccuracy { threshold },
            });
        }
        if let Some(fraction) = self.training_fraction {
            config = config.with_training_fraction(fraction);
        }
        if let Some(fraction) = self.validation_fraction {
            config = config.with_validation_fraction(fraction);
        }

        config
    }

    fn parse_options(&self) -> Result<ParseOptions, Box<dyn std::error::Error>> {
        let delimiter = u8::try_from(self.delimiter)
            .map_err(|_| format!("delimiter must be a single byte, got {:?}", self.delimiter))?;

        Ok(ParseOptions {
            delimiter,
            has_headers: self.has_headers,
            normalize: self.normalize,
        })
    }
}

fn log_report(name: &str, report: &ValidationReport) {
    let confusion = report.confusion;

    info!(
        "{name}: {} positive, {} negative samples, {} correct; predicted {} positive, {} negative",
        confusion.positives(),
        confusion.negatives(),
        confusion.correct(),
        confusion.predicted_positives(),
        confusion.predicted_negatives(),
    );
    info!(
        "{name}: TP {} FP {} TN {} FN {}",
        confusion.true_positives,
        confusion.false_positives,
        confusion.true_negatives,
        confusion.false_negatives,
    );
    info!(
        "{name} accuracy: {}, positive class: {}, negative class: {}",
        report.overall, report.positive_class, report.negative_class,
    );
}

fn compare_with_reference(
    dataset: &Dataset,
    outcome: &TrainingOutcome,
    config: &LearningConfig,
    regularization: f64,
) {
    let mut reference = RidgeRegression::new(regularization);

    match reference.fit(dataset, dataset.prefix(config.training_fraction())) {
        Ok(()) => match reference.distance(outcome.weights.view()) {
            Ok(distance) => info!(
                "least-squares reference w: {}, distance from LMS weights: {distance:.4}",
                reference.weights()
            ),
            Err(e) => warn!("cannot compare with least-squares reference: {e}"),
        },
        Err(e) => warn!("least-squares reference unavailable: {e}"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = args.learning_config();
    let trainer = Trainer::new(config.clone())?;

    let dataset = parse(&args.data, &args.parse_options()?)?;
    info!(
        "loaded {} samples with {} explanatory variables from {}",
        dataset.len(),
        dataset.dimension() - 1,
        args.data.display()
    );

    let outcome = trainer.fit(&dataset, &mut rand::rng())?;

    if let Some(training) = &outcome.training {
        log_report("training window", training);
    }
    log_report("held-out", &outcome.held_out);
    info!("w: {}", outcome.weights);

    compare_with_reference(&dataset, &outcome, &config, args.ridge_regularization);

    write_results_file(&args.output, &outcome)?;
    info!(
        "wrote {} diagnostic rows to {}",
        outcome.diagnostics.len(),
        args.output.display()
    );

    if let Some(plot_dir) = &args.plot_dir {
        std::fs::create_dir_all(plot_dir)?;

        if dataset.dimension() == 3 {
            plot_decision_boundary(
                &plot_dir.join("decision_boundary.png"),
                &dataset,
                outcome.weights.view(),
            )?;
        } else {
            warn!("skipping decision boundary chart, it needs two explanatory variables");
        }
        plot_errors(&plot_dir.join("errors.png"), &outcome.errors)?;
        info!("charts written to {}", plot_dir.display());
    }

    Ok(())
}
