use std::ops::Deref;
use std::slice::Iter;

use tracing::trace;

use crate::Result;
use crate::container::*;

/// A run of consecutive values `[value, value + length]`
///
/// # Remarks
/// Runs are trusted. `value + length` must not exceed `u16::MAX`, which is only checked in debug builds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rle16 {
    pub value: u16,
    pub length: u16
}

impl Rle16 {
    pub fn new(value: u16, length: u16) -> Self {
        debug_assert!(value.checked_add(length).is_some(), "run extends past the end of the container");

        Self {
            value,
            length
        }
    }

    /// The last value in the run, inclusive
    #[inline]
    pub fn end(&self) -> u16 {
        self.value + self.length
    }

    /// The number of values in the run
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.length as usize + 1
    }
}

/// A run container. Values are stored as sorted, non overlapping runs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunContainer {
    runs: Vec<Rle16>
}

impl RunContainer {
    /// Create a new run container with no runs
    pub fn new() -> Self {
        Self {
            runs: Vec::new()
        }
    }

    /// Create a run container from a list of runs.
    ///
    /// # Remarks
    /// Runs must be sorted by `value` and must not overlap
    pub fn from_runs(runs: Vec<Rle16>) -> Self {
        debug_assert!(
            runs.windows(2).all(|w| u32::from(w[0].end()) < u32::from(w[1].value)),
            "runs must be sorted and must not overlap"
        );

        Self { runs }
    }

    /// The number of values in the container
    pub fn cardinality(&self) -> usize {
        self.runs.iter()
            .map(Rle16::cardinality)
            .sum()
    }

    /// The number of runs in the container
    #[inline]
    pub fn num_runs(&self) -> usize {
        self.runs.len()
    }

    /// Get an iterator over the runs of the container
    pub fn iter(&self) -> Iter<'_, Rle16> {
        self.runs.iter()
    }

    /// Get an iterator over every value in the container in ascending order
    pub fn values<'a>(&'a self) -> impl Iterator<Item = u16> + 'a {
        self.runs.iter()
            .flat_map(|run| run.value..=run.end())
    }
}

impl Deref for RunContainer {
    type Target = [Rle16];

    fn deref(&self) -> &Self::Target {
        &self.runs
    }
}

impl Intersection<ArrayContainer> for RunContainer {
    type Output = ArrayContainer;

    fn intersect_with(&self, other: &ArrayContainer, out: &mut Self::Output) -> Result<()> {
        other.intersect_with(self, out)
    }
}

impl SetAnd<ArrayContainer> for RunContainer {
    fn and(&self, other: &ArrayContainer) -> Result<Container> {
        SetAnd::and(other, self)
    }

    fn and_cardinality(&self, other: &ArrayContainer) -> usize {
        SetAnd::and_cardinality(other, self)
    }

    fn intersects(&self, other: &ArrayContainer) -> bool {
        SetAnd::intersects(other, self)
    }

    fn inplace_and(self, other: &ArrayContainer) -> Result<Container> {
        SetAnd::and(other, &self)
    }
}

impl SetAnd<BitsetContainer> for RunContainer {
    fn and(&self, other: &BitsetContainer) -> Result<Container> {
        let cardinality = self.cardinality();

        // Result can only be an array
        if cardinality <= DEFAULT_MAX_SIZE {
            let capacity = cardinality.min(other.cardinality());
            let mut result = ArrayContainer::try_with_capacity(capacity)?;

            for run in self.runs.iter() {
                for value in run.value..=run.end() {
                    if other.contains(value) {
                        result.push(value);
                    }
                }
            }

            return Ok(Container::Array(result));
        }

        trace!(cardinality, "run intersection may need a bitset");

        // Dropped by `into_efficient_container` if the result is downgraded
        let mut result = other.try_clone()?;
        result.reset_outside_runs(&self.runs);
        result.recompute_cardinality();
        result.into_efficient_container()
    }

    fn and_cardinality(&self, other: &BitsetContainer) -> usize {
        self.runs.iter()
            .map(|run| other.cardinality_range(run_range(run)))
            .sum()
    }

    fn intersects(&self, other: &BitsetContainer) -> bool {
        self.runs.iter()
            .any(|run| other.intersects_range(run_range(run)))
    }

    fn inplace_and(self, other: &BitsetContainer) -> Result<Container> {
        // A bitset result cannot reuse run storage
        self.and(other)
    }
}

/// The values covered by `run` as a half open range
#[inline]
fn run_range(run: &Rle16) -> std::ops::Range<u32> {
    u32::from(run.value)..(u32::from(run.end()) + 1)
}
