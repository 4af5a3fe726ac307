//! Common routines for handling input data.
use crate::model::PredictionInputs;
use anyhow::{Context, Result, ensure};
use clap::Args;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Prediction inputs as supplied by the user, any of which may be missing.
///
/// These can come from a TOML file, from command-line flags or both. Missing values are filled in
/// with defaults by [`RawPredictionInputs::resolve`].
#[derive(Args, Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPredictionInputs {
    /// Population density (people/km²)
    #[arg(long)]
    pub population: Option<f64>,
    /// Household income
    #[arg(long)]
    pub income: Option<f64>,
    /// Urban area (km²)
    #[arg(long)]
    pub urban_area: Option<f64>,
    /// Monthly rainfall (mm)
    #[arg(long)]
    pub rainfall: Option<f64>,
    /// Mean temperature (°C)
    #[arg(long)]
    pub temperature: Option<f64>,
    /// Number of collection trucks
    #[arg(long)]
    pub trucks: Option<f64>,
    /// Recycling rate (%)
    #[arg(long)]
    pub recycling: Option<f64>,
    /// Month to predict (1-12)
    #[arg(long)]
    pub month: Option<u32>,
    /// Year to predict
    #[arg(long)]
    pub year: Option<u32>,
}

/// Check that a supplied value is a usable number
fn check_finite(name: &str, value: Option<f64>) -> Result<()> {
    if let Some(value) = value {
        ensure!(value.is_finite(), "{name} must be a finite number");
    }

    Ok(())
}

impl RawPredictionInputs {
    /// Read prediction inputs from a TOML file
    pub fn from_path(file_path: &Path) -> Result<Self> {
        read_toml(file_path)
    }

    /// Combine with another set of inputs, preferring values from `other` where both are present
    pub fn merge(self, other: Self) -> Self {
        let Self {
            population,
            income,
            urban_area,
            rainfall,
            temperature,
            trucks,
            recycling,
            month,
            year,
        } = other;

        Self {
            population: population.or(self.population),
            income: income.or(self.income),
            urban_area: urban_area.or(self.urban_area),
            rainfall: rainfall.or(self.rainfall),
            temperature: temperature.or(self.temperature),
            trucks: trucks.or(self.trucks),
            recycling: recycling.or(self.recycling),
            month: month.or(self.month),
            year: year.or(self.year),
        }
    }

    /// Fill in missing values with defaults.
    ///
    /// # Returns
    ///
    /// The complete inputs or an error if any supplied value is NaN or infinite, or the month is
    /// out of range.
    pub fn resolve(self) -> Result<PredictionInputs> {
        if let Some(month) = self.month {
            ensure!(
                (1..=12).contains(&month),
                "month must be between 1 and 12, got {month}"
            );
        }
        check_finite("population", self.population)?;
        check_finite("income", self.income)?;
        check_finite("urban_area", self.urban_area)?;
        check_finite("rainfall", self.rainfall)?;
        check_finite("temperature", self.temperature)?;
        check_finite("trucks", self.trucks)?;
        check_finite("recycling", self.recycling)?;

        let defaults = PredictionInputs::default();
        Ok(PredictionInputs {
            population: self.population.unwrap_or(defaults.population),
            income: self.income.unwrap_or(defaults.income),
            urban_area: self.urban_area.unwrap_or(defaults.urban_area),
            rainfall: self.rainfall.unwrap_or(defaults.rainfall),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            trucks: self.trucks.unwrap_or(defaults.trucks),
            recycling: self.recycling.unwrap_or(defaults.recycling),
            month: self.month.unwrap_or(defaults.month),
            year: self.year.unwrap_or(defaults.year),
        })
    }
}
