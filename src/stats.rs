//! Descriptive statistics and feature correlations for the dataset.
use crate::dataset::{Feature, Observation};
use anyhow::{Result, bail, ensure};
use indexmap::IndexMap;
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;
use strum::IntoEnumIterator;

/// Pearson correlation coefficient of each feature against waste, in [`Feature`] order
pub type CorrelationTable = IndexMap<Feature, f64>;

/// Summary statistics for a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// The number of observations
    pub total_records: usize,
    /// Year of the first observation
    pub start_year: u32,
    /// Year of the last observation
    pub end_year: u32,
    /// Number of years covered, counting both ends
    pub time_span: i64,
    /// Mean waste
    pub avg_waste: f64,
    /// Minimum waste
    pub min_waste: f64,
    /// Maximum waste
    pub max_waste: f64,
    /// Difference between maximum and minimum waste
    pub waste_range: f64,
    /// Mean population density
    pub avg_population: f64,
    /// Mean income
    pub avg_income: f64,
    /// Mean rainfall
    pub avg_rainfall: f64,
    /// Mean temperature
    pub avg_temperature: f64,
}

/// Arithmetic mean of a non-empty iterator of values
fn mean<I>(values: I) -> f64
where
    I: ExactSizeIterator<Item = f64>,
{
    let n = values.len();
    values.sum::<f64>() / n as f64
}

/// Compute summary statistics for the given observations.
///
/// Observations are assumed to be in insertion order, so the year span is taken from the first and
/// last entries rather than the extremes.
///
/// # Returns
///
/// The statistics or an error if `observations` is empty.
pub fn compute_statistics(observations: &[Observation]) -> Result<Statistics> {
    let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
        bail!("Cannot compute statistics for an empty dataset");
    };

    let wastes = observations.iter().map(|obs| obs.waste);
    let (min_waste, max_waste) = match wastes.minmax_by(f64::total_cmp) {
        MinMaxResult::OneElement(waste) => (waste, waste),
        MinMaxResult::MinMax(min, max) => (min, max),
        MinMaxResult::NoElements => unreachable!(),
    };

    Ok(Statistics {
        total_records: observations.len(),
        start_year: first.year,
        end_year: last.year,
        time_span: i64::from(last.year) - i64::from(first.year) + 1,
        avg_waste: mean(observations.iter().map(|obs| obs.waste)),
        min_waste,
        max_waste,
        waste_range: max_waste - min_waste,
        avg_population: mean(observations.iter().map(|obs| obs.population)),
        avg_income: mean(observations.iter().map(|obs| obs.income)),
        avg_rainfall: mean(observations.iter().map(|obs| obs.rainfall)),
        avg_temperature: mean(observations.iter().map(|obs| obs.temperature)),
    })
}

/// Whether every value in the series is the same
fn is_constant(values: &[f64]) -> bool {
    values.iter().all_equal()
}

/// Calculate the Pearson correlation coefficient between two series.
///
/// Uses `r = (nΣxy - ΣxΣy) / sqrt((nΣx² - (Σx)²)(nΣy² - (Σy)²))`. If either series has zero
/// variance, the denominator is zero and 0 is returned.
///
/// # Returns
///
/// The coefficient or an error if the series are empty or of different lengths.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Result<f64> {
    ensure!(
        xs.len() == ys.len(),
        "Series lengths differ ({} vs {})",
        xs.len(),
        ys.len()
    );
    ensure!(!xs.is_empty(), "Cannot correlate empty series");

    // Checked directly, as rounding can leave a constant series with a tiny non-zero variance
    if is_constant(xs) || is_constant(ys) {
        return Ok(0.0);
    }

    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.iter().map(|x| x * x).sum();
    let sum_y2: f64 = ys.iter().map(|y| y * y).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || denominator.is_nan() {
        return Ok(0.0);
    }

    Ok(numerator / denominator)
}

/// Correlate every [`Feature`] against waste
pub fn compute_correlation_table(observations: &[Observation]) -> Result<CorrelationTable> {
    let waste = observations.iter().map(|obs| obs.waste).collect_vec();

    Feature::iter()
        .map(|feature| {
            let values = observations
                .iter()
                .map(|obs| obs.feature_value(feature))
                .collect_vec();
            Ok((feature, pearson_correlation(&values, &waste)?))
        })
        .try_collect()
}
