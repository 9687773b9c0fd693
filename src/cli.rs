//! The command line interface for the generator.
use crate::dataset::{SweepParameters, generate};
use crate::grid::{Cell, Grid};
use crate::log;
use crate::output::{DatasetWriter, create_output_directory};
use crate::range::ExpandedRange;
use crate::settings::Settings;
use ::log::{debug, info};
use anyhow::{Context, Result, ensure};
use clap::Parser;
use std::path::PathBuf;

/// Generate a dataset of benchmark instances for a puzzle-based storage unit with AMRs.
///
/// Each group of instances in the dataset has a fixed number of escorts and AMRs, and each
/// instance in a group is generated from its replication number, used as a random seed. Ranges
/// are given as `a`, `a-b` (every value from a to b) or `a-b-step` (e.g. 3-9-3 gives 3, 6 and 9).
///
/// Example: pbsgen center 7 7 4-8-2 5-11-3 1-20 3 0
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// A label identifying the dataset (e.g. edge, corner, center)
    name: String,
    /// Horizontal dimension of the unit
    lx: u32,
    /// Vertical dimension of the unit
    ly: u32,
    /// Range of the number of escorts
    escorts: ExpandedRange,
    /// Range of the number of AMRs
    amrs: ExpandedRange,
    /// Range of replication numbers (random seeds) for each group
    replications: ExpandedRange,
    /// Coordinates of the I/O points as pairs: IO1x IO1y [IO2x IO2y ...]
    #[arg(required = true, num_args = 2.., value_name = "IO_COORDS")]
    io_coords: Vec<u32>,
}

impl Cli {
    /// Convert the parsed arguments into the parameters of a dataset
    fn into_sweep_parameters(self) -> Result<SweepParameters> {
        ensure!(
            self.io_coords.len() % 2 == 0,
            "I/O point coordinates must be given as x y pairs (got {} values)",
            self.io_coords.len()
        );

        let reserved = self
            .io_coords
            .chunks_exact(2)
            .map(|pair| Cell::new(pair[0], pair[1]))
            .collect();

        Ok(SweepParameters {
            name: self.name.trim().to_string(),
            grid: Grid::new(self.lx, self.ly),
            escort_counts: self.escorts.into(),
            amr_counts: self.amrs.into(),
            seeds: self.replications.into(),
            reserved,
        })
    }
}

/// Parse CLI arguments and generate the requested dataset.
///
/// Invalid arguments are reported along with usage information and the process exits with code
/// 1.
pub fn run_cli() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests are not errors
            let is_error = err.use_stderr();
            err.print()?;
            if is_error {
                std::process::exit(1);
            }
            return Ok(());
        }
    };

    let params = cli.into_sweep_parameters()?;
    handle_generate_command(&params, None)?;

    Ok(())
}

/// Handle the dataset generation command.
///
/// # Arguments
///
/// * `params` - The parameters of the dataset to generate
/// * `settings` - Program settings; loaded from the settings file if not provided
///
/// # Returns
///
/// The path to the dataset CSV file.
pub fn handle_generate_command(
    params: &SweepParameters,
    settings: Option<Settings>,
) -> Result<PathBuf> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    let output_path = settings.output_dir.as_path();
    create_output_directory(output_path).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;

    // Initialise program logger
    if !log::is_logger_initialised() {
        let log_file_dir = settings.log_to_file.then_some(output_path);
        log::init(Some(settings.log_level.as_str()), log_file_dir)
            .context("Failed to initialise logging.")?;
    }

    params.validate().context("Invalid dataset parameters.")?;

    let mut writer = DatasetWriter::create(output_path, params, settings.write_instance_files)?;
    info!(
        "Generating {} instances for dataset \"{}\" ({} unit with {} I/O points)",
        params.count_instances(),
        params.name,
        params.grid,
        params.reserved.len()
    );

    for record in generate(params) {
        let record = record?;
        debug!("Generated instance {}", record.file_stem(&params.name));
        writer.write(&record)?;
    }
    writer.flush()?;

    let csv_path = writer.csv_path().to_path_buf();
    info!("Dataset written to {}", csv_path.display());

    Ok(csv_path)
}
