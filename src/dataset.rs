//! The parameter sweep which produces a full dataset of instances.
//!
//! A dataset is made of groups, one for each combination of escort count and AMR count, and each
//! group holds one instance per replication seed.
use crate::grid::{Cell, Grid};
use crate::instance::{Instance, sample_instance};
use crate::rng::PyRandom;
use anyhow::{Context, Result, ensure};
use itertools::{Itertools, Product};
use log::warn;
use std::slice;
use std::vec;

/// The parameters defining a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct SweepParameters {
    /// A label identifying the dataset (e.g. edge, corner, center)
    pub name: String,
    /// The dimensions of the unit
    pub grid: Grid,
    /// The numbers of escorts to sweep over, in ascending order
    pub escort_counts: Vec<u32>,
    /// The numbers of AMRs to sweep over, in ascending order
    pub amr_counts: Vec<u32>,
    /// The replication seeds for each group
    pub seeds: Vec<u32>,
    /// The I/O points
    pub reserved: Vec<Cell>,
}

impl SweepParameters {
    /// Check that the parameters describe a dataset which can be generated.
    ///
    /// Suspicious but harmless I/O points (duplicates or points outside the grid) only produce
    /// warnings.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.name.trim().is_empty(), "Dataset name cannot be empty");
        ensure!(
            self.grid.lx > 0 && self.grid.ly > 0,
            "Grid dimensions must be positive (got {})",
            self.grid
        );
        ensure!(!self.reserved.is_empty(), "At least one I/O point is required");

        // Groups are cut short at the first AMR count which doesn't fit, which is only correct
        // for ascending counts
        ensure!(
            self.amr_counts.is_sorted(),
            "AMR counts must be in ascending order"
        );

        for cell in self.reserved.iter().duplicates() {
            warn!("I/O point {cell} is listed more than once");
        }
        for cell in self.reserved.iter().filter(|cell| !self.grid.contains(cell)) {
            warn!("I/O point {cell} lies outside the {} grid", self.grid);
        }

        Ok(())
    }

    /// Whether the given numbers of escorts and AMRs fit on the grid
    fn fits(&self, num_escorts: u32, num_amrs: u32) -> bool {
        u64::from(num_escorts) + u64::from(num_amrs) <= self.grid.num_cells()
    }

    /// The (escort count, AMR count) groups of the dataset, in generation order.
    ///
    /// For each escort count, AMR counts are taken in order until the first one for which the
    /// escorts and AMRs together exceed the number of cells; that count and all larger ones are
    /// skipped.
    pub fn groups(&self) -> Vec<(u32, u32)> {
        self.escort_counts
            .iter()
            .flat_map(|&num_escorts| {
                self.amr_counts
                    .iter()
                    .take_while(move |&&num_amrs| self.fits(num_escorts, num_amrs))
                    .map(move |&num_amrs| (num_escorts, num_amrs))
            })
            .collect()
    }

    /// The number of records [`generate`] will yield
    pub fn count_instances(&self) -> usize {
        self.groups().len() * self.seeds.len()
    }

    /// The name of the CSV file listing every instance in the dataset
    pub fn csv_file_name(&self) -> String {
        format!("{}_{}_IOs{}.csv", self.name, self.grid, self.reserved.len())
    }
}

/// One generated instance together with its place in the sweep
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord<'a> {
    /// The dimensions of the unit
    pub grid: Grid,
    /// The I/O points
    pub reserved: &'a [Cell],
    /// The number of escorts in this instance's group
    pub num_escorts: u32,
    /// The number of AMRs in this instance's group
    pub num_amrs: u32,
    /// The replication seed
    pub seed: u32,
    /// The sampled initial locations
    pub instance: Instance,
}

impl DatasetRecord<'_> {
    /// The file name stem under which this instance is saved, e.g. `center_7x7_IO1_4_5_1`
    pub fn file_stem(&self, name: &str) -> String {
        format!(
            "{name}_{}_IO{}_{}_{}_{}",
            self.grid,
            self.reserved.len(),
            self.num_escorts,
            self.num_amrs,
            self.seed
        )
    }
}

/// A lazy iterator over the records of a dataset.
///
/// Each call to [`Iterator::next`] samples one instance. The stream is re-seeded for every
/// instance, so the sequence only depends on the [`SweepParameters`].
pub struct DatasetIter<'a> {
    params: &'a SweepParameters,
    coords: Product<vec::IntoIter<(u32, u32)>, slice::Iter<'a, u32>>,
    rng: PyRandom,
}

impl<'a> Iterator for DatasetIter<'a> {
    type Item = Result<DatasetRecord<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let ((num_escorts, num_amrs), &seed) = self.coords.next()?;
        let params = self.params;
        let instance = sample_instance(
            &mut self.rng,
            &params.grid,
            &params.reserved,
            num_escorts as usize,
            num_amrs as usize,
            seed,
        )
        .with_context(|| {
            format!(
                "Failed to generate instance with {num_escorts} escorts, {num_amrs} AMRs and seed \
                {seed}"
            )
        });

        Some(instance.map(|instance| DatasetRecord {
            grid: params.grid,
            reserved: &params.reserved,
            num_escorts,
            num_amrs,
            seed,
            instance,
        }))
    }
}

/// Generate the records of a dataset.
///
/// Groups are visited in the order given by [`SweepParameters::groups`] and, within each group,
/// one instance is produced per seed in order.
pub fn generate(params: &SweepParameters) -> DatasetIter<'_> {
    DatasetIter {
        params,
        coords: params
            .groups()
            .into_iter()
            .cartesian_product(params.seeds.iter()),
        rng: PyRandom::new(0),
    }
}
