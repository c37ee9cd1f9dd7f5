use thiserror::Error;

pub type Result<T> = std::result::Result<T, LmsError>;

#[derive(Debug, Error)]
pub enum LmsError {
    /// A feature vector and a weight vector of different lengths met.
    #[error("shape mismatch: expected length {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A sample range that does not fit inside the dataset.
    #[error("partition {start}..{end} does not fit a dataset of {len} samples")]
    InvalidPartition { start: usize, end: usize, len: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("dataset has no samples")]
    EmptyDataset,

    #[error("sample {sample} does not start with the bias term 1.0")]
    MissingBias { sample: usize },

    #[error("label must be -1 or 1, got {0}")]
    InvalidLabel(f64),

    #[error("row {row}: expected {expected} columns, got {actual}")]
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row}, column {column}: cannot parse {value:?} as a number")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("normal equations are singular")]
    SingularSystem,

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
