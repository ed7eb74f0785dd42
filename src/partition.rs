//! Distribution of datasets between writer and reader ranks.
//!
//! Writers own fixed, contiguous blocks of dataset ids. Readers split the global id range
//! evenly, with the first `n_items % n_ranks` ranks taking one extra item each, so that the
//! number of reading ranks need not match the number of writing ranks.

use std::ops::Range;

use crate::error::Result;

/// A contiguous range of global item ids assigned to a single rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Assignment {
    pub start: usize,
    pub count: usize,
}

impl Assignment {
    pub fn ids(&self) -> Range<usize> {
        self.start..self.start + self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Global id of the `local_index`-th dataset produced by writer `rank`.
pub fn writer_dataset_id(rank: usize, n_datasets_per_writer: usize, local_index: usize) -> usize {
    n_datasets_per_writer * rank + local_index
}

/// Id of the writer whose write block holds `dataset_id`.
pub fn writer_of(dataset_id: usize, n_datasets_per_writer: usize) -> Result<usize> {
    ensure!(
        n_datasets_per_writer > 0,
        "no writer holds dataset {}: writers hold no datasets",
        dataset_id
    );
    Ok(dataset_id / n_datasets_per_writer)
}

/// Splits `n_items` between `n_ranks` and returns the share of `rank`.
pub fn partition(n_items: usize, n_ranks: usize, rank: usize) -> Result<Assignment> {
    ensure!(n_ranks > 0, "cannot partition {} items between zero ranks", n_items);
    ensure!(rank < n_ranks, "rank {} is out of range for {} ranks", rank, n_ranks);

    let n_per_rank = n_items / n_ranks;
    let n_left_over = n_items % n_ranks;

    let count = n_per_rank + if rank < n_left_over { 1 } else { 0 };
    let start = rank * n_per_rank + rank.min(n_left_over);

    Ok(Assignment { start, count })
}

#[cfg(test)]
pub mod tests {
    use super::{partition, writer_dataset_id, writer_of, Assignment};

    #[test]
    pub fn test_even_split() {
        let shares: Vec<_> = (0..4).map(|r| partition(8, 4, r).unwrap()).collect();
        assert_eq!(
            shares,
            vec![
                Assignment { start: 0, count: 2 },
                Assignment { start: 2, count: 2 },
                Assignment { start: 4, count: 2 },
                Assignment { start: 6, count: 2 },
            ]
        );
    }

    #[test]
    pub fn test_left_over_goes_to_low_ranks() {
        let shares: Vec<_> = (0..3).map(|r| partition(7, 3, r).unwrap()).collect();
        assert_eq!(shares[0], Assignment { start: 0, count: 3 });
        assert_eq!(shares[1], Assignment { start: 3, count: 2 });
        assert_eq!(shares[2], Assignment { start: 5, count: 2 });
    }

    #[test]
    pub fn test_more_ranks_than_items() {
        assert_eq!(partition(2, 4, 0).unwrap().ids(), 0..1);
        assert_eq!(partition(2, 4, 1).unwrap().ids(), 1..2);
        assert!(partition(2, 4, 2).unwrap().is_empty());
        assert!(partition(2, 4, 3).unwrap().is_empty());
        assert!(partition(0, 1, 0).unwrap().is_empty());
    }

    #[test]
    pub fn test_invalid_ranks() {
        assert_err!(partition(5, 0, 0), "zero ranks");
        assert_err!(partition(5, 2, 2), "rank 2 is out of range for 2 ranks");
    }

    #[test]
    pub fn test_writer_blocks() {
        assert_eq!(writer_dataset_id(0, 3, 0), 0);
        assert_eq!(writer_dataset_id(2, 3, 1), 7);
        for rank in 0..4 {
            for i in 0..3 {
                assert_eq!(writer_of(writer_dataset_id(rank, 3, i), 3).unwrap(), rank);
            }
        }
        assert_err!(writer_of(1, 0), "writers hold no datasets");
    }
}
