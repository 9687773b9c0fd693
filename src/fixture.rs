//! Fixtures for tests
use crate::dataset::SweepParameters;
use crate::grid::{Cell, Grid};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A single-instance dataset for a 7x7 unit with one I/O point at the centre of the lower wall
#[fixture]
pub fn center_7x7() -> SweepParameters {
    SweepParameters {
        name: "center".into(),
        grid: Grid::new(7, 7),
        escort_counts: vec![4],
        amr_counts: vec![5],
        seeds: vec![1],
        reserved: vec![Cell::new(3, 0)],
    }
}
