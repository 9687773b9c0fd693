//! Sampling of the initial state of a single benchmark instance.
use crate::grid::{Cell, Grid};
use crate::rng::{ReseedableRng, sample};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Offset added to the replication seed for the stream that places the AMRs.
///
/// The AMR placement comes from its own stream, which still changes with the replication number.
pub const AMR_SEED_OFFSET: u64 = 1000;

/// The initial locations of one benchmark instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// The location of the target load. Never one of the I/O points.
    pub target: Cell,
    /// The escort (empty) locations, sorted. Never includes the target.
    pub escorts: Vec<Cell>,
    /// The initial AMR locations, sorted. Never includes an escort.
    pub amrs: Vec<Cell>,
}

/// Sample the initial locations for one instance.
///
/// Draws proceed as follows:
///
/// 1. The target is drawn from all cells except the I/O points, with `rng` seeded by `seed`.
/// 2. The escorts are drawn from all cells except the target, continuing the same stream.
/// 3. The AMRs are drawn from all cells except the escorts, with `rng` re-seeded by
///    `seed + AMR_SEED_OFFSET`.
///
/// Escorts and AMRs may occupy I/O points, and AMRs may sit under the target load.
///
/// # Arguments
///
/// * `rng` - The random stream, which is re-seeded before use
/// * `grid` - The unit in which to place everything
/// * `reserved` - The I/O points
/// * `num_escorts` - Number of escorts to place
/// * `num_amrs` - Number of AMRs to place
/// * `seed` - The replication number
pub fn sample_instance<R: ReseedableRng + ?Sized>(
    rng: &mut R,
    grid: &Grid,
    reserved: &[Cell],
    num_escorts: usize,
    num_amrs: usize,
    seed: u32,
) -> Result<Instance> {
    let seed = u64::from(seed);

    rng.reseed(seed);
    let target = sample(rng, &grid.cells_excluding(reserved), 1)
        .context("Failed to place target load")?[0];

    let mut escorts = sample(rng, &grid.cells_excluding(&[target]), num_escorts)
        .context("Failed to place escorts")?;
    escorts.sort_unstable();

    rng.reseed(seed + AMR_SEED_OFFSET);
    let mut amrs = sample(rng, &grid.cells_excluding(&escorts), num_amrs)
        .context("Failed to place AMRs")?;
    amrs.sort_unstable();

    Ok(Instance {
        target,
        escorts,
        amrs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use crate::rng::PyRandom;
    use itertools::Itertools;
    use rstest::{fixture, rstest};

    #[fixture]
    fn rng() -> PyRandom {
        PyRandom::new(0)
    }

    fn cells(coords: &[(u32, u32)]) -> Vec<Cell> {
        coords.iter().copied().map(Cell::from).collect()
    }

    #[rstest]
    fn test_sample_instance_center_7x7(mut rng: PyRandom) {
        let instance =
            sample_instance(&mut rng, &Grid::new(7, 7), &[Cell::new(3, 0)], 4, 5, 1).unwrap();
        assert_eq!(
            instance,
            Instance {
                target: Cell::new(1, 1),
                escorts: cells(&[(0, 4), (1, 0), (2, 3), (5, 2)]),
                amrs: cells(&[(0, 3), (0, 6), (2, 0), (3, 6), (5, 4)]),
            }
        );
    }

    #[rstest]
    fn test_sample_instance_second_replication(mut rng: PyRandom) {
        let instance =
            sample_instance(&mut rng, &Grid::new(7, 7), &[Cell::new(3, 0)], 4, 5, 2).unwrap();
        assert_eq!(
            instance,
            Instance {
                target: Cell::new(0, 3),
                escorts: cells(&[(0, 6), (1, 4), (3, 3), (6, 6)]),
                amrs: cells(&[(1, 3), (2, 2), (4, 1), (5, 1), (5, 6)]),
            }
        );
    }

    #[rstest]
    fn test_sample_instance_many_ios(mut rng: PyRandom) {
        let reserved = (0..20).map(|x| Cell::new(x, 0)).collect_vec();
        let instance = sample_instance(&mut rng, &Grid::new(20, 5), &reserved, 8, 10, 3).unwrap();
        assert_eq!(
            instance,
            Instance {
                target: Cell::new(7, 3),
                escorts: cells(&[
                    (3, 1),
                    (9, 3),
                    (12, 1),
                    (14, 0),
                    (15, 0),
                    (15, 1),
                    (15, 3),
                    (16, 1)
                ]),
                amrs: cells(&[
                    (0, 3),
                    (5, 4),
                    (9, 2),
                    (10, 3),
                    (11, 4),
                    (12, 0),
                    (12, 2),
                    (13, 1),
                    (14, 3),
                    (15, 2)
                ]),
            }
        );
    }

    #[rstest]
    fn test_sample_instance_amrs_may_overlap_target_and_ios(mut rng: PyRandom) {
        let instance =
            sample_instance(&mut rng, &Grid::new(3, 2), &[Cell::new(0, 0)], 2, 3, 7).unwrap();
        assert_eq!(
            instance,
            Instance {
                target: Cell::new(1, 1),
                escorts: cells(&[(0, 1), (2, 0)]),
                amrs: cells(&[(0, 0), (1, 1), (2, 1)]),
            }
        );
    }

    #[rstest]
    fn test_sample_instance_empty_groups(mut rng: PyRandom) {
        let reserved = cells(&[(0, 0), (1, 0)]);
        let instance = sample_instance(&mut rng, &Grid::new(3, 2), &reserved, 0, 0, 5).unwrap();
        assert_eq!(instance.target, Cell::new(2, 0));
        assert!(instance.escorts.is_empty());
        assert!(instance.amrs.is_empty());
    }

    #[rstest]
    fn test_sample_instance_deterministic(mut rng: PyRandom) {
        let grid = Grid::new(9, 9);
        let reserved = [Cell::new(4, 0)];
        let first = sample_instance(&mut rng, &grid, &reserved, 6, 8, 11).unwrap();

        // Reusing a stream which has already been advanced must not matter
        let second = sample_instance(&mut rng, &grid, &reserved, 6, 8, 11).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_sample_instance_invariants(mut rng: PyRandom) {
        let grid = Grid::new(6, 4);
        let reserved = [Cell::new(0, 0), Cell::new(5, 0)];
        for seed in 1..=30 {
            let instance = sample_instance(&mut rng, &grid, &reserved, 7, 9, seed).unwrap();
            assert!(!reserved.contains(&instance.target));
            assert!(!instance.escorts.contains(&instance.target));
            assert!(instance.escorts.iter().all(|e| !instance.amrs.contains(e)));
            assert_eq!(instance.escorts.len(), 7);
            assert_eq!(instance.amrs.len(), 9);
            assert!(instance.escorts.iter().all_unique());
            assert!(instance.amrs.iter().all_unique());
            assert!(instance.escorts.is_sorted());
            assert!(instance.amrs.is_sorted());
            assert!(instance.escorts.iter().all(|c| grid.contains(c)));
            assert!(instance.amrs.iter().all(|c| grid.contains(c)));
        }
    }

    #[rstest]
    fn test_sample_instance_no_room_for_target(mut rng: PyRandom) {
        let reserved = cells(&[(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_error!(
            sample_instance(&mut rng, &Grid::new(2, 2), &reserved, 0, 0, 1),
            "Failed to place target load"
        );
    }

    #[rstest]
    fn test_sample_instance_too_many_escorts(mut rng: PyRandom) {
        let result = sample_instance(&mut rng, &Grid::new(2, 2), &[], 4, 0, 1);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Failed to place escorts");
        assert_eq!(
            err.root_cause().to_string(),
            "Cannot sample 4 distinct elements from a population of 3"
        );
    }
}
