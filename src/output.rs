//! The module responsible for writing output data to disk.
use crate::dataset::{Feature, Observation};
use crate::model::{BulkPredictions, Metrics, ModelVariant};
use crate::stats::{CorrelationTable, Statistics};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The root folder in which run-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "wastecast_results";

/// The output file name for the generated dataset
const DATASET_FILE_NAME: &str = "dataset.csv";

/// The output file name for summary statistics
const STATISTICS_FILE_NAME: &str = "statistics.toml";

/// The output file name for feature correlations
const CORRELATIONS_FILE_NAME: &str = "correlations.csv";

/// The output file name for model metrics
const METRICS_FILE_NAME: &str = "metrics.csv";

/// The output file name for bulk predictions
const PREDICTIONS_FILE_NAME: &str = "predictions.csv";

/// Get the default output folder for a run with the given name
pub fn get_output_dir(run_name: &str) -> Result<PathBuf> {
    ensure!(!run_name.is_empty(), "Run name cannot be empty");
    ensure!(
        !run_name.contains(['/', '\\']),
        "Run name cannot contain path separators: {run_name}"
    );

    Ok([OUTPUT_DIRECTORY_ROOT, run_name].iter().collect())
}

/// Create a new output directory at `output_dir`.
///
/// If the directory already exists and contains files, it is only replaced when `allow_overwrite`
/// is true.
///
/// # Returns
///
/// Whether an existing folder was overwritten, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir).context("Could not delete folder")?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Write summary statistics to a TOML file
pub fn write_statistics(output_path: &Path, statistics: &Statistics) -> Result<()> {
    let file_path = output_path.join(STATISTICS_FILE_NAME);
    fs::write(&file_path, toml::to_string(statistics)?)
        .with_context(|| format!("Could not write {}", file_path.display()))?;

    Ok(())
}

/// Represents a row in the correlations CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CorrelationRow {
    feature: Feature,
    correlation: f64,
    importance: Option<f64>,
}

/// Represents a row in the metrics CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct MetricsRow {
    model: ModelVariant,
    rmse: f64,
    mae: f64,
    mape: f64,
    accuracy: f64,
}

impl MetricsRow {
    /// Create a new [`MetricsRow`]
    fn new(model: ModelVariant, metrics: &Metrics) -> Self {
        Self {
            model,
            rmse: metrics.rmse,
            mae: metrics.mae,
            mape: metrics.mape,
            accuracy: metrics.accuracy(),
        }
    }
}

/// Represents a row in the predictions CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct PredictionRow {
    observation_id: u32,
    month: u32,
    year: u32,
    actual_waste: f64,
    model: ModelVariant,
    predicted_waste: u32,
}

/// For writing the results of trained models
struct ModelDataWriter {
    metrics: csv::Writer<File>,
    predictions: csv::Writer<File>,
}

impl ModelDataWriter {
    /// Open CSV files to write model results to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            metrics: new_writer(METRICS_FILE_NAME)?,
            predictions: new_writer(PREDICTIONS_FILE_NAME)?,
        })
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.metrics.flush()?;
        self.predictions.flush()?;

        Ok(())
    }
}

/// An object for writing session results to CSV files
pub struct DataWriter {
    dataset: csv::Writer<File>,
    correlations: csv::Writer<File>,
    models: Option<ModelDataWriter>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_model_results` - Whether to include CSV files for model metrics and predictions
    pub fn create(output_path: &Path, save_model_results: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let models = if save_model_results {
            Some(ModelDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            dataset: new_writer(DATASET_FILE_NAME)?,
            correlations: new_writer(CORRELATIONS_FILE_NAME)?,
            models,
        })
    }

    /// The model results writer, or an error if this writer was created without one
    fn models(&mut self) -> Result<&mut ModelDataWriter> {
        self.models
            .as_mut()
            .context("Writer was created without model result files")
    }

    /// Write observations to the dataset CSV file
    pub fn write_dataset<'a, I>(&mut self, observations: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        for obs in observations {
            self.dataset.serialize(obs)?;
        }

        Ok(())
    }

    /// Write feature correlations, along with feature importance where known
    pub fn write_correlations(
        &mut self,
        correlations: &CorrelationTable,
        importance: &IndexMap<Feature, f64>,
    ) -> Result<()> {
        for (&feature, &correlation) in correlations {
            let row = CorrelationRow {
                feature,
                correlation,
                importance: importance.get(&feature).copied(),
            };
            self.correlations.serialize(row)?;
        }

        Ok(())
    }

    /// Write metrics for trained models
    pub fn write_metrics<'a, I>(&mut self, metrics: I) -> Result<()>
    where
        I: IntoIterator<Item = (ModelVariant, &'a Metrics)>,
    {
        let writer = &mut self.models()?.metrics;
        for (model, metrics) in metrics {
            writer.serialize(MetricsRow::new(model, metrics))?;
        }

        Ok(())
    }

    /// Write bulk predictions alongside the observations they were made for.
    ///
    /// Each series in `predictions` must have one entry per observation.
    pub fn write_predictions(
        &mut self,
        observations: &[Observation],
        predictions: &BulkPredictions,
    ) -> Result<()> {
        let writer = &mut self.models()?.predictions;
        for (&model, series) in predictions {
            ensure!(
                series.len() == observations.len(),
                "Expected {} predictions for {model}, got {}",
                observations.len(),
                series.len()
            );

            for (obs, &predicted_waste) in observations.iter().zip(series) {
                let row = PredictionRow {
                    observation_id: obs.id,
                    month: obs.month,
                    year: obs.year,
                    actual_waste: obs.waste,
                    model,
                    predicted_waste,
                };
                writer.serialize(row)?;
            }
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.dataset.flush()?;
        self.correlations.flush()?;
        if let Some(models) = &mut self.models {
            models.flush()?;
        }

        Ok(())
    }
}
