//! Partition filter sets.
//!
//! A [`PartitionFilterSet`] holds one selection vector per output partition.
//! For correct repartitioning every row must be selected by exactly one
//! vector. Construction through [`PartitionFilterSet::from_assignments`] or
//! [`PartitionFilterSet::uniform_random`] guarantees this; filter sets built
//! with [`PartitionFilterSet::new`] are trusted as given and can be checked
//! with [`PartitionFilterSet::verify_coverage`].

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Result, ShuffleError};
use crate::executor::vectorized::Filter;

/// One selection vector per partition, all covering the same rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionFilterSet {
    filters: Vec<Filter>,
    num_rows: usize,
}

impl PartitionFilterSet {
    /// Wraps caller-built filters.
    ///
    /// Coverage (each row selected exactly once) is not checked here.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no filters or their lengths differ.
    pub fn new(filters: Vec<Filter>) -> Result<Self> {
        let num_rows = filters
            .first()
            .map(Filter::len)
            .ok_or_else(|| ShuffleError::InvalidPartitioning("no partitions".into()))?;
        if let Some((p, f)) = filters.iter().enumerate().find(|(_, f)| f.len() != num_rows) {
            return Err(ShuffleError::InvalidPartitioning(format!(
                "filter {p} covers {} rows, filter 0 covers {num_rows}",
                f.len()
            )));
        }
        Ok(PartitionFilterSet { filters, num_rows })
    }

    /// Builds filters from a per-row partition index.
    ///
    /// Row `r` is selected by filter `assignments[r]` and by no other.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_partitions` is zero or an assignment is out
    /// of range.
    pub fn from_assignments(assignments: &[usize], num_partitions: usize) -> Result<Self> {
        if num_partitions == 0 {
            return Err(ShuffleError::InvalidPartitioning("no partitions".into()));
        }
        let num_rows = assignments.len();
        let mut filters = vec![Filter::new(num_rows); num_partitions];
        for (row, &partition) in assignments.iter().enumerate() {
            let filter = filters.get_mut(partition).ok_or_else(|| {
                ShuffleError::InvalidPartitioning(format!(
                    "row {row} assigned to partition {partition}, only {num_partitions} exist"
                ))
            })?;
            filter.set(row, true);
        }
        Ok(PartitionFilterSet { filters, num_rows })
    }

    /// Assigns each row to a partition drawn uniformly at random.
    ///
    /// The same seed always yields the same assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_partitions` is zero.
    pub fn uniform_random(num_rows: usize, num_partitions: usize, seed: u64) -> Result<Self> {
        if num_partitions == 0 {
            return Err(ShuffleError::InvalidPartitioning("no partitions".into()));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Uniform::new(0, num_partitions);
        let assignments: Vec<usize> = (0..num_rows).map(|_| dist.sample(&mut rng)).collect();
        Self::from_assignments(&assignments, num_partitions)
    }

    /// Checks that every row is selected by exactly one filter.
    ///
    /// Costs one pass over every filter. Not part of the repartition hot path
    /// unless enabled in the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ShuffleError::PartitionCoverage`] for the first row selected
    /// zero times or more than once.
    pub fn verify_coverage(&self) -> Result<()> {
        let mut selections = vec![0usize; self.num_rows];
        for filter in &self.filters {
            for (count, &b) in selections.iter_mut().zip(filter.as_bytes()) {
                *count += usize::from(b != 0);
            }
        }
        match selections.iter().position(|&c| c != 1) {
            Some(row) => Err(ShuffleError::PartitionCoverage {
                row,
                selections: selections[row],
            }),
            None => Ok(()),
        }
    }

    /// Returns the number of partitions.
    #[must_use]
    pub fn num_partitions(&self) -> usize {
        self.filters.len()
    }

    /// Returns the number of rows every filter covers.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the filter of partition `p`.
    #[must_use]
    pub fn filter(&self, p: usize) -> Option<&Filter> {
        self.filters.get(p)
    }

    /// Returns all filters in partition order.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Iterates over the filters in partition order.
    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    /// Returns how many rows each partition selects.
    #[must_use]
    pub fn selected_counts(&self) -> Vec<usize> {
        self.filters.iter().map(Filter::count_selected).collect()
    }
}

impl<'a> IntoIterator for &'a PartitionFilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}
