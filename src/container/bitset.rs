use std::cell::Cell;
use std::convert::TryFrom;
use std::ops::{Deref, Range};

use tracing::trace;

use crate::{Error, Result};
use crate::container::*;

use super::bitset_ops;

/// The size of the bitset in 64bit words
pub const BITSET_SIZE_IN_WORDS: usize = 1024;

/// Number of values addressable by a bitset
const BITSET_CAPACITY: u32 = (BITSET_SIZE_IN_WORDS * 64) as u32;

/// A bitset container used in a roaring bitmap.
///
/// # Structure
/// Contents are stored as 64bit words, bit `i` of word `w` representing the value `w * 64 + i`.
///
/// # Cardinality
/// The cardinality is cached. Operations that rewrite whole words invalidate the cache and the next
/// call to `cardinality` recounts the bits. Single bit updates keep the cache current
#[derive(Clone, Debug)]
pub struct BitsetContainer {
    bitset: Vec<u64>,
    cardinality: Cell<Option<usize>>
}

impl BitsetContainer {
    /// Create a new empty bitset
    pub fn new() -> Self {
        Self {
            bitset: vec![0; BITSET_SIZE_IN_WORDS],
            cardinality: Cell::new(Some(0))
        }
    }

    /// Create a new empty bitset, reporting allocation failure instead of aborting
    pub fn try_new() -> Result<Self> {
        let mut bitset = Self::try_alloc()?;
        bitset.resize(BITSET_SIZE_IN_WORDS, 0);

        Ok(Self {
            bitset,
            cardinality: Cell::new(Some(0))
        })
    }

    /// Create an independent copy of the bitset, reporting allocation failure instead of aborting
    pub fn try_clone(&self) -> Result<Self> {
        let mut bitset = Self::try_alloc()?;
        bitset.extend_from_slice(&self.bitset);

        Ok(Self {
            bitset,
            cardinality: self.cardinality.clone()
        })
    }

    fn try_alloc() -> Result<Vec<u64>> {
        let mut bitset = Vec::new();
        bitset.try_reserve_exact(BITSET_SIZE_IN_WORDS)
            .map_err(|e| Error::alloc("bitset", BITSET_SIZE_IN_WORDS, e))?;

        Ok(bitset)
    }

    /// Add `value` to the set and return true if it was not already present
    pub fn add(&mut self, value: u16) -> bool {
        let word_index = (value >> 6) as usize;
        let word = self.bitset[word_index];
        let new_word = word | (1 << (value & 0x3F));

        self.bitset[word_index] = new_word;

        let added = word != new_word;
        if added {
            self.update_card(1);
        }

        added
    }

    /// Set bits for the elements in `list`
    pub fn set_list(&mut self, list: &[u16]) {
        for value in list {
            self.add(*value);
        }
    }

    /// Check if the bitset contains a specific value
    #[inline]
    pub fn contains(&self, value: u16) -> bool {
        let word = self.bitset[(value >> 6) as usize];

        (word >> (value & 0x3F)) & 1 != 0
    }

    /// Clear all bits in the range [min-max). `max` may be up to `1 << 16`
    pub fn reset_range(&mut self, range: Range<u32>) {
        debug_assert!(range.end <= BITSET_CAPACITY);

        if range.start >= range.end {
            return;
        }

        for (index, mask) in masked_words(range) {
            self.bitset[index] &= !mask;
        }

        self.invalidate_card();
    }

    /// Clear every bit not covered by one of `runs`.
    /// Leaves set exactly the bits that were set before and lie inside a run
    pub fn reset_outside_runs(&mut self, runs: &[Rle16]) {
        let mut start = 0;

        for run in runs {
            let end = u32::from(run.value);
            self.reset_range(start..end);

            start = end + u32::from(run.length) + 1;
        }

        self.reset_range(start..BITSET_CAPACITY);
    }

    /// The cardinality of the bitset, recounted if the cached value is stale
    #[inline]
    pub fn cardinality(&self) -> usize {
        match self.cardinality.get() {
            Some(card) => card,
            None => self.recompute_cardinality()
        }
    }

    /// Recount the set bits and refresh the cached cardinality
    pub fn recompute_cardinality(&self) -> usize {
        let card = bitset_ops::cardinality(&self.bitset);
        self.cardinality.set(Some(card));

        card
    }

    /// Check if the cached cardinality is out of date
    #[inline]
    pub fn is_cardinality_stale(&self) -> bool {
        self.cardinality.get().is_none()
    }

    /// Get the number of set bits in the range [min-max)
    pub fn cardinality_range(&self, range: Range<u32>) -> usize {
        debug_assert!(range.end <= BITSET_CAPACITY);

        masked_words(range)
            .map(|(index, mask)| (self.bitset[index] & mask).count_ones() as usize)
            .sum()
    }

    /// Check if any bit in the range [min-max) is set
    pub fn intersects_range(&self, range: Range<u32>) -> bool {
        debug_assert!(range.end <= BITSET_CAPACITY);

        masked_words(range)
            .any(|(index, mask)| self.bitset[index] & mask != 0)
    }

    /// Convert self into the most efficient representation
    ///
    /// # Remarks
    /// If already in the most efficient representation then no change is made.
    /// When converted the bitset is freed, including when allocating the array fails
    pub fn into_efficient_container(self) -> Result<Container> {
        let cardinality = self.cardinality();

        if cardinality <= DEFAULT_MAX_SIZE {
            trace!(cardinality, "converting bitset to array");

            ArrayContainer::try_from(&self).map(Container::Array)
        }
        else {
            Ok(Container::Bitset(self))
        }
    }

    /// Get an iterator over the values in the bitset
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.bitset,
            word_index: 0,
            word: self.bitset[0]
        }
    }

    /// Update the cardinality with a given change
    fn update_card(&mut self, change: isize) {
        if let Some(card) = self.cardinality.get() {
            self.cardinality.set(Some((card as isize + change) as usize));
        }
    }

    /// Invalidate the cardinality
    fn invalidate_card(&mut self) {
        self.cardinality.set(None);
    }
}

/// Get the word indices covering `range` together with the mask of bits of each word inside the range
fn masked_words(range: Range<u32>) -> impl Iterator<Item = (usize, u64)> {
    let (first, last) = if range.start < range.end {
        ((range.start >> 6) as usize, ((range.end - 1) >> 6) as usize)
    }
    else {
        (1, 0)
    };

    let first_mask = !0_u64 << (range.start & 0x3F);
    let last_mask = !0_u64 >> (63 - ((range.end.wrapping_sub(1)) & 0x3F));

    (first..=last).map(move |index| {
        let mut mask = !0_u64;

        if index == first {
            mask &= first_mask;
        }

        if index == last {
            mask &= last_mask;
        }

        (index, mask)
    })
}

impl Default for BitsetContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BitsetContainer {
    fn eq(&self, other: &BitsetContainer) -> bool {
        self.bitset == other.bitset
    }
}

impl Eq for BitsetContainer { }

impl Deref for BitsetContainer {
    type Target = [u64];

    fn deref(&self) -> &Self::Target {
        &self.bitset
    }
}

impl Intersection<ArrayContainer> for BitsetContainer {
    type Output = ArrayContainer;

    fn intersect_with(&self, other: &ArrayContainer, out: &mut Self::Output) -> Result<()> {
        other.intersect_with(self, out)
    }
}

impl SetAnd<Self> for BitsetContainer {
    fn and(&self, other: &Self) -> Result<Container> {
        // Count first so sparse results skip materializing a full bitset
        let cardinality = bitset_ops::and_cardinality(self, other);

        if cardinality > DEFAULT_MAX_SIZE {
            let mut result = BitsetContainer::try_new()?;
            bitset_ops::and(self, other, &mut result.bitset);
            result.cardinality.set(Some(cardinality));

            return Ok(Container::Bitset(result));
        }

        trace!(cardinality, "bitset intersection fits in an array");

        let mut result = ArrayContainer::try_with_capacity(cardinality)?;
        bitset_ops::extract_intersection_setbits(self, other, result.as_mut_vec());

        Ok(Container::Array(result))
    }

    fn and_cardinality(&self, other: &Self) -> usize {
        bitset_ops::and_cardinality(self, other)
    }

    fn intersects(&self, other: &Self) -> bool {
        bitset_ops::and_any(self, other)
    }

    fn inplace_and(mut self, other: &Self) -> Result<Container> {
        let cardinality = bitset_ops::and_cardinality(&self, other);

        if cardinality > DEFAULT_MAX_SIZE {
            bitset_ops::and_assign(&mut self.bitset, other);
            self.cardinality.set(Some(cardinality));

            return Ok(Container::Bitset(self));
        }

        trace!(cardinality, "bitset intersection fits in an array");

        // `self` is dropped on return, the array owns the result
        let mut result = ArrayContainer::try_with_capacity(cardinality)?;
        bitset_ops::extract_intersection_setbits(&self, other, result.as_mut_vec());

        Ok(Container::Array(result))
    }
}

impl SetAnd<ArrayContainer> for BitsetContainer {
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
        // The result is never larger than the array, the bitset storage is not worth keeping
        SetAnd::and(other, &self)
    }
}

impl SetAnd<RunContainer> for BitsetContainer {
    fn and(&self, other: &RunContainer) -> Result<Container> {
        SetAnd::and(other, self)
    }

    fn and_cardinality(&self, other: &RunContainer) -> usize {
        SetAnd::and_cardinality(other, self)
    }

    fn intersects(&self, other: &RunContainer) -> bool {
        SetAnd::intersects(other, self)
    }

    fn inplace_and(mut self, other: &RunContainer) -> Result<Container> {
        // Small run containers can only produce arrays
        if other.cardinality() <= DEFAULT_MAX_SIZE {
            return SetAnd::and(other, &self);
        }

        self.reset_outside_runs(other);
        self.recompute_cardinality();
        self.into_efficient_container()
    }
}

/// An iterator over the values of a bitset
pub struct Iter<'a> {
    /// The list of words in the bitset
    words: &'a [u64],

    /// The current word index in the bitset
    word_index: usize,

    /// The bits of the current word not yet visited
    word: u64
}

impl<'a> Iterator for Iter<'a> {
    type Item = u16;

    fn next(&mut self) -> Option<Self::Item> {
        while self.word == 0 {
            self.word_index += 1;

            if self.word_index >= self.words.len() {
                return None;
            }

            self.word = self.words[self.word_index];
        }

        let r = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1;

        // Guaranteed to not truncate, the bitset spans exactly 1 << 16 values
        Some((self.word_index * 64 + r) as u16)
    }
}
