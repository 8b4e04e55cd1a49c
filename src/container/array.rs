use std::convert::TryFrom;
use std::ops::{Deref, DerefMut};

use crate::{Error, Result};
use crate::container::*;
use crate::container::array_ops::advance_until;
use crate::container::bitset_ops;

/// An array container. Elements are sorted numerically and represented as individual values in the array
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrayContainer {
    array: Vec<u16>
}

impl ArrayContainer {
    /// Create a new empty array container without allocating
    pub fn new() -> Self {
        Self {
            array: Vec::new()
        }
    }

    /// Create a new array container able to hold `capacity` elements without reallocating
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut array = Vec::new();
        array.try_reserve_exact(capacity)
            .map_err(|e| Error::alloc("array", capacity, e))?;

        Ok(Self { array })
    }

    /// The cardinality of the array container
    #[inline]
    pub fn cardinality(&self) -> usize {
        // Len is the same as the cardinality for raw sets of integers
        self.array.len()
    }

    /// The capacity of the array container
    #[inline]
    pub fn capacity(&self) -> usize {
        self.array.capacity()
    }

    /// Ensure the container can hold at least `min_capacity` elements.
    /// Existing elements are discarded unless `preserve` is set, which avoids copying them on reallocation
    /// The container is left unchanged if the allocation fails
    pub fn grow(&mut self, min_capacity: usize, preserve: bool) -> Result<()> {
        if self.array.capacity() >= min_capacity {
            if !preserve {
                self.array.clear();
            }

            return Ok(());
        }

        if preserve {
            let additional = min_capacity - self.array.len();
            self.array.try_reserve_exact(additional)
                .map_err(|e| Error::alloc("array", min_capacity, e))?;
        }
        else {
            // Swap in fresh storage so the old elements are never copied
            let mut array = Vec::new();
            array.try_reserve_exact(min_capacity)
                .map_err(|e| Error::alloc("array", min_capacity, e))?;

            self.array = array;
        }

        Ok(())
    }

    /// Push a value onto the end of the array
    ///
    /// # Notes
    /// Assumes that the value is greater than all other elements in the array
    #[inline]
    pub fn push(&mut self, value: u16) {
        debug_assert!(self.array.last().map_or(true, |max| *max < value));

        self.array.push(value);
    }

    /// Overwrite `self` with the elements of `other`, growing if required
    fn try_copy_from(&mut self, other: &[u16]) -> Result<()> {
        self.grow(other.len(), false)?;
        self.array.extend_from_slice(other);

        Ok(())
    }

    /// Mutable access to the backing storage for kernels filling the array directly
    #[inline]
    pub(super) fn as_mut_vec(&mut self) -> &mut Vec<u16> {
        &mut self.array
    }

    /// Drop every element missing from `bitset`. Capacity is left untouched
    fn retain_in_bitset(&mut self, bitset: &BitsetContainer) {
        let cardinality = retain_in_bitset(&mut self.array, bitset);
        self.array.truncate(cardinality);
    }

    /// Drop every element not covered by one of `runs`. Capacity is left untouched
    fn retain_in_runs(&mut self, runs: &[Rle16]) {
        let cardinality = retain_in_runs(&mut self.array, runs);
        self.array.truncate(cardinality);
    }
}

/// Compact the values present in `bitset` to the front of `values` and return how many there are.
/// The write cursor never passes the read cursor
fn retain_in_bitset(values: &mut [u16], bitset: &BitsetContainer) -> usize {
    let mut cardinality = 0;

    for i in 0..values.len() {
        let key = values[i];
        values[cardinality] = key;
        cardinality += bitset.contains(key) as usize;
    }

    cardinality
}

/// Compact the values covered by `runs` to the front of `values` and return how many there are.
/// The write cursor never passes the read cursor
fn retain_in_runs(values: &mut [u16], runs: &[Rle16]) -> usize {
    if runs.is_empty() {
        return 0;
    }

    let mut run_index = 0;
    let mut rle = runs[run_index];
    let mut cardinality = 0;
    let mut i = 0;

    while i < values.len() {
        let value = values[i];

        // Usually false
        while rle.end() < value {
            run_index += 1;

            if run_index == runs.len() {
                return cardinality;
            }

            rle = runs[run_index];
        }

        if rle.value > value {
            i = advance_until(values, i, values.len(), rle.value);
        }
        else {
            values[cardinality] = value;
            cardinality += 1;
            i += 1;
        }
    }

    cardinality
}

/// Walk the values of `values` covered by `runs`, stopping early once `f` returns false
fn for_each_in_runs<F>(values: &[u16], runs: &[Rle16], mut f: F)
    where F: FnMut(u16) -> bool
{
    let mut run_index = 0;
    let mut i = 0;

    while i < values.len() && run_index < runs.len() {
        let value = values[i];
        let rle = runs[run_index];

        if rle.end() < value {
            run_index += 1;
        }
        else if rle.value > value {
            i = advance_until(values, i, values.len(), rle.value);
        }
        else {
            if !f(value) {
                return;
            }

            i += 1;
        }
    }
}

impl Deref for ArrayContainer {
    type Target = [u16];

    fn deref(&self) -> &[u16] {
        &self.array
    }
}

impl DerefMut for ArrayContainer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.array
    }
}

impl From<Vec<u16>> for ArrayContainer {
    fn from(array: Vec<u16>) -> Self {
        debug_assert!(array.windows(2).all(|w| w[0] < w[1]), "array values must be sorted and unique");

        Self { array }
    }
}

impl<'a> TryFrom<&'a BitsetContainer> for ArrayContainer {
    type Error = Error;

    fn try_from(container: &'a BitsetContainer) -> Result<Self> {
        let mut array = ArrayContainer::try_with_capacity(container.cardinality())?;
        bitset_ops::extract_setbits(container, &mut array.array);

        Ok(array)
    }
}

impl Intersection<BitsetContainer> for ArrayContainer {
    type Output = Self;

    fn intersect_with(&self, other: &BitsetContainer, out: &mut Self::Output) -> Result<()> {
        out.try_copy_from(&self.array)?;
        out.retain_in_bitset(other);

        Ok(())
    }
}

impl Intersection<RunContainer> for ArrayContainer {
    type Output = Self;

    fn intersect_with(&self, other: &RunContainer, out: &mut Self::Output) -> Result<()> {
        out.try_copy_from(&self.array)?;
        out.retain_in_runs(other);

        Ok(())
    }
}

impl SetAnd<BitsetContainer> for ArrayContainer {
    fn and(&self, other: &BitsetContainer) -> Result<Container> {
        let mut result = ArrayContainer::new();
        self.intersect_with(other, &mut result)?;

        Ok(Container::Array(result))
    }

    fn and_cardinality(&self, other: &BitsetContainer) -> usize {
        self.array.iter()
            .filter(|key| other.contains(**key))
            .count()
    }

    fn intersects(&self, other: &BitsetContainer) -> bool {
        self.array.iter()
            .any(|key| other.contains(*key))
    }

    fn inplace_and(mut self, other: &BitsetContainer) -> Result<Container> {
        self.retain_in_bitset(other);

        Ok(Container::Array(self))
    }
}

impl SetAnd<RunContainer> for ArrayContainer {
    fn and(&self, other: &RunContainer) -> Result<Container> {
        let mut result = ArrayContainer::new();
        self.intersect_with(other, &mut result)?;

        Ok(Container::Array(result))
    }

    fn and_cardinality(&self, other: &RunContainer) -> usize {
        let mut cardinality = 0;
        for_each_in_runs(&self.array, other, |_| {
            cardinality += 1;
            true
        });

        cardinality
    }

    fn intersects(&self, other: &RunContainer) -> bool {
        let mut found = false;
        for_each_in_runs(&self.array, other, |_| {
            found = true;
            false
        });

        found
    }

    fn inplace_and(mut self, other: &RunContainer) -> Result<Container> {
        self.retain_in_runs(other);

        Ok(Container::Array(self))
    }
}
