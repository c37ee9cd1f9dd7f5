use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::least_mean_squares::DecisionBoundary;
use crate::trainer::{DiagnosticRecord, TrainingOutcome};

fn decimal(value: f64) -> String {
    format!("{value:.4}")
}

pub fn header(dimension: usize) -> Vec<String> {
    let mut header = vec!["iteration".to_string(), "sample".to_string()];
    header.extend((0..dimension).map(|i| format!("x{i}")));
    header.push("y".to_string());
    header.extend((0..dimension).map(|i| format!("w{i}")));
    header.push("y'".to_string());
    header.push("update?".to_string());
    header.push("err".to_string());
    header.extend((0..dimension).map(|i| format!("w{i}'")));
    header.push("m".to_string());
    header.push("b".to_string());

    header
}

/// One table row. Update columns stay empty when no update happened, `m` and
/// `b` stay empty when the decision line is undefined.
pub fn row(record: &DiagnosticRecord) -> Vec<String> {
    let dimension = record.features.len();

    let mut row = vec![record.iteration.to_string(), record.sample.to_string()];
    row.extend(record.features.iter().copied().map(decimal));
    row.push(decimal(record.label.value()));
    row.extend(record.weights_before.iter().copied().map(decimal));
    row.push(decimal(record.predicted.value()));
    row.push(record.updated().to_string());

    let weights = if let Some(update) = &record.update {
        row.push(decimal(update.error));
        row.extend(update.weights_after.iter().copied().map(decimal));
        &update.weights_after
    } else {
        row.extend(vec![String::new(); dimension + 1]);
        &record.weights_before
    };

    if let Some(boundary) = DecisionBoundary::from_weights(weights.view()) {
        row.push(decimal(boundary.slope));
        row.push(decimal(boundary.intercept));
    } else {
        row.extend([String::new(), String::new()]);
    }

    row
}

/// Writes the diagnostics table followed by a final row holding the error log.
pub fn write_results<W: Write>(writer: W, outcome: &TrainingOutcome) -> csv::Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);
    let dimension = outcome.weights.len();

    writer.write_record(header(dimension))?;
    for record in &outcome.diagnostics {
        writer.write_record(row(record))?;
    }

    // the error row is shorter than the table
    let errors = outcome.errors.iter().copied().map(decimal).collect::<Vec<_>>();
    if !errors.is_empty() {
        writer.write_record(errors)?;
    }

    writer.flush()?;

    Ok(())
}

pub fn write_results_file<P: AsRef<Path>>(
    file_path: P,
    outcome: &TrainingOutcome,
) -> csv::Result<()> {
    write_results(File::create(file_path)?, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Label;
    use crate::trainer::{TrainingState, UpdateRecord};
    use crate::validation::{ConfusionMatrix, ValidationReport};
    use ndarray::array;

    fn record(update: Option<UpdateRecord>) -> DiagnosticRecord {
        DiagnosticRecord {
            iteration: 2,
            sample: 5,
            features: array![1.0, 0.5, -0.25],
            label: Label::Positive,
            weights_before: array![0.0, 1.0, 2.0],
            predicted: Label::Positive,
            update,
        }
    }

    #[test]
    fn header_matches_dimension() {
        let header = header(3);

        assert_eq!(header.len(), 2 + 3 + 1 + 3 + 3 + 3 + 2);
        assert_eq!(header[..3], ["iteration", "sample", "x0"]);
        assert_eq!(header[header.len() - 3..], ["w2'", "m", "b"]);
    }

    #[test]
    fn row_without_update_leaves_columns_empty() {
        let row = row(&record(None));

        assert_eq!(row.len(), header(3).len());
        assert_eq!(row[0], "2");
        assert_eq!(row[1], "5");
        assert_eq!(row[3], "0.5000");
        assert_eq!(row[10], "false");
        assert!(row[11..15].iter().all(String::is_empty));
        // m = -1/2, b = 0
        assert_eq!(row[15], "-0.5000");
        assert_eq!(row[16], "-0.0000");
    }

    #[test]
    fn row_with_update_reports_error_and_new_weights() {
        let row = row(&record(Some(UpdateRecord {
            error: -1.5,
            weights_after: array![1.0, 1.0, 4.0],
        })));

        assert_eq!(row[10], "true");
        assert_eq!(row[11], "-1.5000");
        assert_eq!(row[12..15], ["1.0000", "1.0000", "4.0000"]);
        assert_eq!(row[15], "-0.2500");
        assert_eq!(row[16], "-0.2500");
    }

    #[test]
    fn writes_table_and_error_row() {
        let held_out = ValidationReport::from_confusion(ConfusionMatrix::default());
        let outcome = TrainingOutcome {
            state: TrainingState::Exhausted,
            weights: array![1.0, 1.0, 4.0],
            diagnostics: vec![
                record(None),
                record(Some(UpdateRecord {
                    error: -1.5,
                    weights_after: array![1.0, 1.0, 4.0],
                })),
            ],
            errors: vec![-1.5],
            training: None,
            held_out,
        };

        let mut buffer = Vec::new();
        write_results(&mut buffer, &outcome).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("iteration,sample,x0,x1,x2,y,w0"));
        assert_eq!(lines[3], "-1.5000");
    }
}
