//! Common functionality for generating benchmark instances for puzzle-based storage units with
//! autonomous mobile robots (AMRs).
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod dataset;
pub mod grid;
pub mod instance;
pub mod log;
pub mod output;
pub mod range;
pub mod rng;
pub mod settings;

#[cfg(test)]
mod fixture;

/// Get the config folder for the program.
///
/// If the platform has no config folder, the current working directory is used.
pub fn get_pbsgen_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        return PathBuf::new();
    };
    config_dir.push("pbsgen");

    config_dir
}
