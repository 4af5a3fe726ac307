//! Common functionality for wastecast, a synthetic waste-generation dataset with mock predictors.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod calendar;
pub mod cli;
pub mod dataset;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod rng;
pub mod session;
pub mod settings;
pub mod stats;
pub mod training;

#[cfg(test)]
mod fixture;

/// Get the config folder for the program.
///
/// Falls back to the current directory if the platform has no config folder.
pub fn get_wastecast_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        return PathBuf::from(".");
    };

    config_dir.push("wastecast");
    config_dir
}
