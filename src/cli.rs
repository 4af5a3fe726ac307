//! The command line interface for wastecast.
use crate::calendar::month_name;
use crate::input::RawPredictionInputs;
use crate::log;
use crate::model::{PredictionInputs, Predictions};
use crate::output::metadata::write_metadata;
use crate::output::{DataWriter, create_output_directory, get_output_dir, write_statistics};
use crate::session::{Session, SessionOptions};
use crate::settings::Settings;
use crate::training::{TrainingPlan, TrainingStatus};
use ::log::{debug, info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for wastecast.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options controlling how the session's dataset is generated
#[derive(Args, Default)]
pub struct SessionOpts {
    /// Number of monthly observations to generate
    #[arg(long)]
    pub count: Option<usize>,
    /// Seed for the random number generator
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Options for commands which write output files
#[derive(Args, Default)]
pub struct OutputOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// Options for the predict command
#[derive(Args, Default)]
pub struct PredictOpts {
    /// Path to a TOML file containing prediction inputs
    #[arg(long)]
    pub inputs: Option<PathBuf>,
    /// Prediction inputs, which take precedence over any read from file
    #[command(flatten)]
    pub values: RawPredictionInputs,
    /// Add the prediction to the dataset and retrain the models
    #[arg(long)]
    pub learn: bool,
    /// Options for generating the dataset
    #[command(flatten)]
    pub session: SessionOpts,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic dataset and write it to file.
    Generate {
        /// Options for generating the dataset
        #[command(flatten)]
        session: SessionOpts,
        /// Options for output files
        #[command(flatten)]
        output: OutputOpts,
    },
    /// Show summary statistics and feature correlations for a generated dataset.
    Stats {
        /// Options for generating the dataset
        #[command(flatten)]
        session: SessionOpts,
    },
    /// Train every model and predict waste for a single month.
    Predict {
        /// Options for the prediction
        #[command(flatten)]
        opts: PredictOpts,
    },
    /// Run a full session: generate, train, predict and write all results.
    Run {
        /// Options for generating the dataset
        #[command(flatten)]
        session: SessionOpts,
        /// Options for output files
        #[command(flatten)]
        output: OutputOpts,
    },
    /// Manage settings file.
    Settings {
        /// The available subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Generate { session, output } => handle_generate_command(&session, &output, None),
            Self::Stats { session } => handle_stats_command(&session, None),
            Self::Predict { opts } => handle_predict_command(&opts, None),
            Self::Run { session, output } => handle_run_command(&session, &output, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start wastecast
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ wastecast --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help in markdown format
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    if let Some(settings) = settings {
        Ok(settings)
    } else {
        Settings::load().context("Failed to load settings.")
    }
}

/// Session options from settings, with any command-line overrides applied
fn session_options(settings: &Settings, opts: &SessionOpts) -> SessionOptions {
    let mut options = settings.session_options();
    if let Some(count) = opts.count {
        options.dataset_size = count;
    }
    if opts.seed.is_some() {
        options.seed = opts.seed;
    }

    options
}

/// Create the output folder for a command and initialise logging to it.
///
/// # Returns
///
/// The path to the output folder.
fn prepare_output(command: &str, opts: &OutputOpts, settings: &Settings) -> Result<PathBuf> {
    let output_path = match &opts.output_dir {
        Some(path) => path.clone(),
        None => get_output_dir(command)?,
    };

    let overwrite = create_output_directory(&output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(&settings.log_level, Some(&output_path))
        .context("Failed to initialise logging.")?;
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    Ok(output_path)
}

/// Write the dataset along with its statistics and correlations
fn write_dataset_outputs(
    output_path: &Path,
    session: &Session,
    writer: &mut DataWriter,
) -> Result<()> {
    writer.write_dataset(session.dataset(None))?;
    writer.write_correlations(session.feature_correlations(), &session.feature_importance())?;
    write_statistics(output_path, session.statistics())
}

/// Log the statistics and correlation table for a session
fn log_statistics(session: &Session) {
    let stats = session.statistics();
    info!(
        "{} observations, {}-{} ({} years)",
        stats.total_records, stats.start_year, stats.end_year, stats.time_span
    );
    info!(
        "Waste: mean {:.1} tons, min {:.0}, max {:.0}, range {:.0}",
        stats.avg_waste, stats.min_waste, stats.max_waste, stats.waste_range
    );
    info!(
        "Means: population {:.0}, income {:.0}, rainfall {:.1} mm, temperature {:.1} °C",
        stats.avg_population, stats.avg_income, stats.avg_rainfall, stats.avg_temperature
    );
    for (feature, correlation) in session.feature_correlations() {
        info!("Correlation of {feature} with waste: {correlation:.3}");
    }
}

/// Log the results of a prediction for each variant
fn log_predictions(session: &Session, inputs: &PredictionInputs, predictions: &Predictions) {
    info!(
        "Predicting waste for {} {}",
        month_name(inputs.month).unwrap_or("?"),
        inputs.year
    );
    for (variant, waste) in predictions {
        let Some(metrics) = session.model_metrics(*variant) else {
            continue;
        };

        info!(
            "{}: {waste} tons ({metrics}, {} accuracy)",
            variant.parameters().display_name,
            metrics.accuracy_band()
        );
    }
}

/// Handle the `generate` command.
pub fn handle_generate_command(
    session_opts: &SessionOpts,
    output_opts: &OutputOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = prepare_output("generate", output_opts, &settings)?;

    let options = session_options(&settings, session_opts);
    let session = Session::new(&options).context("Failed to generate dataset.")?;

    let mut writer = DataWriter::create(&output_path, false)?;
    write_dataset_outputs(&output_path, &session, &mut writer)?;
    writer.flush()?;
    write_metadata(&output_path, "generate", options.seed, options.dataset_size)?;
    info!("Dataset written");

    Ok(())
}

/// Handle the `stats` command.
pub fn handle_stats_command(session_opts: &SessionOpts, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // We won't save log files when only showing statistics
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    let session = Session::new(&session_options(&settings, session_opts))
        .context("Failed to generate dataset.")?;
    log_statistics(&session);

    Ok(())
}

/// Handle the `predict` command.
pub fn handle_predict_command(opts: &PredictOpts, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;
    log::init(&settings.log_level, None).context("Failed to initialise logging.")?;

    // Values given as flags take precedence over those in the file
    let raw = match &opts.inputs {
        Some(path) => RawPredictionInputs::from_path(path)?.merge(opts.values.clone()),
        None => opts.values.clone(),
    };
    let inputs = raw.resolve().context("Invalid prediction inputs.")?;

    let mut session = Session::new(&session_options(&settings, &opts.session))
        .context("Failed to generate dataset.")?;
    session.train_all();

    let predictions = session.predict(&inputs);
    log_predictions(&session, &inputs, &predictions);

    if opts.learn {
        if let Some(obs) = session.learn_from_prediction(&inputs, &predictions)? {
            info!(
                "Added observation {} with {} tons of waste to the dataset",
                obs.id, obs.waste
            );
        }

        session.train_all();
        info!(
            "Models retrained on {} observations",
            session.statistics().total_records
        );
    }

    info!(
        "{} prediction(s) made, error improved by {:.1}%",
        session.prediction_history().len(),
        session.improvement()
    );

    Ok(())
}

/// Handle the `run` command.
pub fn handle_run_command(
    session_opts: &SessionOpts,
    output_opts: &OutputOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let output_path = prepare_output("run", output_opts, &settings)?;

    let options = session_options(&settings, session_opts);
    let mut session = Session::new(&options).context("Failed to generate dataset.")?;
    log_statistics(&session);

    // Train every model, reporting progress as each step completes
    let trained = session.train_with_progress(TrainingPlan::all(), |variant, status| {
        if let TrainingStatus::InProgress(progress) = status {
            debug!("Training {variant}: {progress:.0}%");
        }
    });
    info!("Trained {} models", trained.len());

    let inputs = PredictionInputs::default();
    let predictions = session.predict(&inputs);
    log_predictions(&session, &inputs, &predictions);

    // Bulk-predict the start of the dataset, which doesn't add to the prediction history
    let preview = Some(settings.preview_size);
    let bulk = session.generate_dataset_predictions(preview);

    let mut writer = DataWriter::create(&output_path, true)?;
    write_dataset_outputs(&output_path, &session, &mut writer)?;
    writer.write_metrics(trained.iter().map(|(variant, metrics)| (*variant, metrics)))?;
    writer.write_predictions(session.dataset(preview), &bulk)?;
    writer.flush()?;
    write_metadata(&output_path, "run", options.seed, options.dataset_size)?;
    info!("Run complete!");

    Ok(())
}
