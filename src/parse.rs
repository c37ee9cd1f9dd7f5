use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::dataset::{Dataset, Label};
use crate::error::{LmsError, Result};

/// The label column value that marks the negative class; anything else is
/// positive.
pub const NEGATIVE_SENTINEL: &str = "-1";

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub delimiter: u8,
    pub has_headers: bool,
    /// Z-score every explanatory column before the bias is prepended.
    pub normalize: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
            normalize: false,
        }
    }
}

pub fn to_label(value: &str) -> Label {
    if value == NEGATIVE_SENTINEL {
        Label::Negative
    } else {
        Label::Positive
    }
}

/// Centers and scales each column in place. A constant column is only
/// centered.
pub fn z_score_normalize(rows: &mut [Vec<f64>]) {
    let Some(columns) = rows.first().map(Vec::len) else {
        return;
    };
    let count = rows.len() as f64;

    for column in 0..columns {
        let mean = rows.iter().map(|row| row[column]).sum::<f64>() / count;
        let variance = rows
            .iter()
            .map(|row| (row[column] - mean).powi(2))
            .sum::<f64>()
            / count;
        let std_dev = variance.sqrt();

        for row in rows.iter_mut() {
            row[column] -= mean;
            if std_dev > 0.0 {
                row[column] /= std_dev;
            }
        }
    }
}

pub fn parse<P: AsRef<Path>>(file_path: P, options: &ParseOptions) -> Result<Dataset> {
    let file = File::open(file_path)?;

    parse_reader(BufReader::new(file), options)
}

/// Every column but the last is a feature, the last one is the label. The
/// first malformed row aborts the whole parse.
pub fn parse_reader<R: Read>(reader: R, options: &ParseOptions) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    let mut expected_columns = None;

    for (row, result) in reader.records().enumerate() {
        let record = result?;

        let expected = *expected_columns.get_or_insert(record.len().max(2));
        if record.len() != expected {
            return Err(LmsError::ColumnCount {
                row,
                expected,
                actual: record.len(),
            });
        }

        let label_column = expected - 1;
        let values = record
            .iter()
            .take(label_column)
            .enumerate()
            .map(|(column, value)| {
                value.parse::<f64>().map_err(|_| LmsError::InvalidNumber {
                    row,
                    column,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        rows.push(values);
        labels.push(to_label(&record[label_column]));
    }

    if options.normalize {
        z_score_normalize(&mut rows);
    }

    Dataset::from_rows(rows, labels)
}
