//! The module responsible for writing datasets to disk.
use crate::dataset::{DatasetRecord, SweepParameters};
use crate::grid::{Cell, format_cells};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Column headings of the dataset CSV file
const CSV_HEADER: [&str; 9] = [
    "Lx x Ly",
    "#IOs",
    "#escorts",
    "#AMRs",
    "Replication#",
    "IOs",
    "Target",
    "Escorts",
    "AMRs",
];

/// File extension for saved instances
const INSTANCE_FILE_EXTENSION: &str = "toml";

/// Create the output directory, with parents, if it doesn't already exist.
pub fn create_output_directory(output_dir: &Path) -> Result<()> {
    if output_dir.is_dir() {
        // already exists
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;

    Ok(())
}

/// Separate fields in the style of the published datasets: every field after the first is
/// preceded by a space, e.g. `7x7, 1, 4, 5, 1`
fn pad_fields<I, S>(fields: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields.into_iter().enumerate().map(|(i, field)| {
        if i == 0 {
            field.as_ref().to_string()
        } else {
            format!(" {}", field.as_ref())
        }
    })
}

/// The fields of a row of the dataset CSV file
fn csv_fields(record: &DatasetRecord) -> [String; 9] {
    [
        record.grid.to_string(),
        record.reserved.len().to_string(),
        record.num_escorts.to_string(),
        record.num_amrs.to_string(),
        record.seed.to_string(),
        format_cells(record.reserved),
        format_cells([&record.instance.target]),
        format_cells(&record.instance.escorts),
        format_cells(&record.instance.amrs),
    ]
}

/// A single instance as saved to its own file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct InstanceFile {
    /// The name of the dataset
    pub name: String,
    /// Number of columns in the unit
    pub lx: u32,
    /// Number of rows in the unit
    pub ly: u32,
    /// The replication seed
    pub seed: u32,
    /// The number of escorts
    pub num_escorts: u32,
    /// The number of AMRs
    pub num_amrs: u32,
    /// The I/O points
    pub ios: Vec<Cell>,
    /// The location of the target load
    pub target: Cell,
    /// The escort locations
    pub escorts: Vec<Cell>,
    /// The initial AMR locations
    pub amrs: Vec<Cell>,
}

impl InstanceFile {
    /// Create a new [`InstanceFile`] for a generated record
    fn new(name: &str, record: &DatasetRecord) -> Self {
        Self {
            name: name.to_string(),
            lx: record.grid.lx,
            ly: record.grid.ly,
            seed: record.seed,
            num_escorts: record.num_escorts,
            num_amrs: record.num_amrs,
            ios: record.reserved.to_vec(),
            target: record.instance.target,
            escorts: record.instance.escorts.clone(),
            amrs: record.instance.amrs.clone(),
        }
    }

    /// Read an instance back from a file
    pub fn read(file_path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(file_path)
            .with_context(|| format!("Could not read {}", file_path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Could not parse instance file {}", file_path.display()))
    }
}

/// An object for writing a dataset to file.
///
/// Every record becomes one row of the dataset CSV file and, optionally, one instance file.
pub struct DatasetWriter {
    name: String,
    output_path: PathBuf,
    csv_path: PathBuf,
    csv_writer: csv::Writer<File>,
    write_instance_files: bool,
}

impl DatasetWriter {
    /// Open the dataset CSV file and write its header
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `params` - The parameters of the dataset to be written
    /// * `write_instance_files` - Whether to save each instance to its own file too
    pub fn create(
        output_path: &Path,
        params: &SweepParameters,
        write_instance_files: bool,
    ) -> Result<Self> {
        let csv_path = output_path.join(params.csv_file_name());
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&csv_path)
            .with_context(|| {
                format!(
                    "Cannot open {}, make sure that it is not open in another program",
                    csv_path.display()
                )
            })?;
        csv_writer.write_record(pad_fields(CSV_HEADER))?;

        Ok(Self {
            name: params.name.clone(),
            output_path: output_path.to_path_buf(),
            csv_path,
            csv_writer,
            write_instance_files,
        })
    }

    /// The path to the dataset CSV file
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Write a single record
    pub fn write(&mut self, record: &DatasetRecord) -> Result<()> {
        self.csv_writer.write_record(pad_fields(csv_fields(record)))?;

        if self.write_instance_files {
            let file_name = format!(
                "{}.{INSTANCE_FILE_EXTENSION}",
                record.file_stem(&self.name)
            );
            let file_path = self.output_path.join(file_name);
            let instance = InstanceFile::new(&self.name, record);
            fs::write(&file_path, toml::to_string(&instance)?)
                .with_context(|| format!("Could not write {}", file_path.display()))?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.csv_writer.flush()?;

        Ok(())
    }
}
