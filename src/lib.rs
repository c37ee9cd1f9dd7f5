pub mod config;
pub mod dataset;
pub mod error;
pub mod least_mean_squares;
pub mod parse;
pub mod plot;
pub mod report;
pub mod ridge_regression;
pub mod trainer;
pub mod validation;

pub use error::{LmsError, Result};
