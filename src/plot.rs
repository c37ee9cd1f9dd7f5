use std::ops::Range;
use std::path::Path;

use ndarray::ArrayView1;
use plotters::prelude::*;

use crate::dataset::{Dataset, Label};
use crate::error::{LmsError, Result};
use crate::least_mean_squares::DecisionBoundary;

const SIZE: (u32, u32) = (800, 600);
const LINE_POINTS: usize = 200;

fn plot_error<E: std::fmt::Display>(error: E) -> LmsError {
    LmsError::Plot(error.to_string())
}

/// Range covering `values` with a small margin, never empty.
fn padded_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });

    if min > max {
        return -1.0..1.0;
    }

    let padding = if max > min { (max - min) * 0.1 } else { 1.0 };
    (min - padding)..(max + padding)
}

/// Points of the decision line that fall inside the chart.
fn boundary_points(boundary: DecisionBoundary, x: &Range<f64>, y: &Range<f64>) -> Vec<(f64, f64)> {
    let step = (x.end - x.start) / (LINE_POINTS - 1) as f64;

    (0..LINE_POINTS)
        .map(|i| {
            let x = x.start + step * i as f64;
            (x, boundary.at(x))
        })
        .filter(|(_, v)| y.contains(v))
        .collect()
}

/// Scatter of the two explanatory variables coloured by label, with the line
/// the weights define.
pub fn plot_decision_boundary(
    file_path: &Path,
    dataset: &Dataset,
    weights: ArrayView1<'_, f64>,
) -> Result<()> {
    if dataset.dimension() != 3 {
        return Err(LmsError::Plot(format!(
            "decision line needs two explanatory variables, got {}",
            dataset.dimension() - 1
        )));
    }

    let samples = dataset.samples();
    let x_range = padded_range(samples.iter().map(|s| s.features[1]));
    let y_range = padded_range(samples.iter().map(|s| s.features[2]));

    let root = BitMapBackend::new(file_path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("LMS decision boundary", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("x1")
        .y_desc("x2")
        .draw()
        .map_err(plot_error)?;

    for (label, color) in [(Label::Positive, BLUE), (Label::Negative, RED)] {
        chart
            .draw_series(
                samples
                    .iter()
                    .filter(|s| s.label == label)
                    .map(|s| Circle::new((s.features[1], s.features[2]), 3, color.filled())),
            )
            .map_err(plot_error)?;
    }

    if let Some(boundary) = DecisionBoundary::from_weights(weights) {
        chart
            .draw_series(LineSeries::new(
                boundary_points(boundary, &x_range, &y_range),
                &BLACK,
            ))
            .map_err(plot_error)?;
    }

    root.present().map_err(plot_error)?;

    Ok(())
}

/// Line chart of the error of each accepted update.
pub fn plot_errors(file_path: &Path, errors: &[f64]) -> Result<()> {
    let x_range = 0.0..(errors.len().max(1) as f64);
    let y_range = padded_range(errors.iter().copied());

    let root = BitMapBackend::new(file_path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("LMS update error", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("update")
        .y_desc("error")
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            errors
                .iter()
                .enumerate()
                .filter(|(_, e)| e.is_finite())
                .map(|(i, &e)| (i as f64, e)),
            &BLUE,
        ))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(std::iter::empty()), -1.0..1.0);
        assert_eq!(padded_range([2.0].into_iter()), 1.0..3.0);
        assert_eq!(padded_range([f64::NAN, 0.0, 10.0].into_iter()), -1.0..11.0);
    }

    #[test]
    fn boundary_points_stay_in_view() {
        let boundary = DecisionBoundary {
            slope: 1.0,
            intercept: 0.0,
        };
        let points = boundary_points(boundary, &(-10.0..10.0), &(-1.0..1.0));

        assert!(!points.is_empty());
        assert!(points.iter().all(|(_, y)| (-1.0..1.0).contains(y)));
    }

    #[test]
    fn rejects_datasets_without_two_features() {
        let dataset = Dataset::from_rows(vec![vec![1.0]], vec![Label::Positive]).unwrap();
        let weights = ndarray::array![0.0, 1.0];

        assert!(matches!(
            plot_decision_boundary(Path::new("unused.png"), &dataset, weights.view()),
            Err(LmsError::Plot(_))
        ));
    }
}
