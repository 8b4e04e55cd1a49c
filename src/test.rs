#![cfg(test)]

use std::ops::Range;

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::container::*;

/// An internal trait for automating test setup
pub(crate) trait TestShim: Sized {
    /// Generate a random, sorted and deduplicated data set suited to the container type
    fn generate(count: usize, seed: u64) -> Vec<u16> {
        generate_data_seeded(0..u16::MAX, count, seed)
    }

    fn from_data(data: &[u16]) -> Self;
}

impl TestShim for ArrayContainer {
    fn from_data(data: &[u16]) -> Self {
        ArrayContainer::from(data.to_vec())
    }
}

impl TestShim for BitsetContainer {
    fn from_data(data: &[u16]) -> Self {
        let mut bitset = BitsetContainer::new();
        bitset.set_list(data);

        bitset
    }
}

impl TestShim for RunContainer {
    fn generate(count: usize, seed: u64) -> Vec<u16> {
        generate_runs(count, seed)
    }

    fn from_data(data: &[u16]) -> Self {
        let mut runs: Vec<Rle16> = Vec::new();

        for value in data.iter() {
            match runs.last_mut() {
                Some(run) if u32::from(run.end()) + 1 == u32::from(*value) => {
                    run.length += 1;
                },
                _ => runs.push(Rle16::new(*value, 0))
            }
        }

        RunContainer::from_runs(runs)
    }
}

const SEED: u64 = 0x0304_0106_0308_0600;

/// Generates `count` random values in the range [min-max). Elements are then deduplicated and sorted
pub(crate) fn generate_data(range: Range<u16>, count: usize) -> Vec<u16> {
    generate_data_seeded(range, count, SEED)
}

/// Same as `generate_data` with an explicit seed
pub(crate) fn generate_data_seeded(range: Range<u16>, count: usize, seed: u64) -> Vec<u16> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut result = Vec::with_capacity(count);

    while result.len() < count {
        result.push(rng.gen_range(range.clone()));
    }

    result.sort();
    result.dedup();

    result
}

/// Generates roughly `count` values clustered into runs of up to 64 values
pub(crate) fn generate_runs(count: usize, seed: u64) -> Vec<u16> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut result = Vec::with_capacity(count + 64);

    while result.len() < count {
        let start: u16 = rng.gen();
        let length: u16 = rng.gen_range(0..64);
        let end = start.saturating_add(length);

        result.extend(start..=end);
    }

    result.sort();
    result.dedup();

    result
}

/// Compute the intersection of two input sets using a known correct algorithm
///
/// # Remarks
/// Assumes the inputs are sorted
pub(crate) fn compute_intersection(a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));

    let mut i0 = 0;
    let mut i1 = 0;
    while i0 < a.len() && i1 < b.len() {
        // Element only in A
        if a[i0] < b[i1] {
            i0 += 1;
        }
        // Element only in B
        else if b[i1] < a[i0] {
            i1 += 1;
        }
        // Element shared
        else {
            result.push(a[i0]);
            i0 += 1;
            i1 += 1;
        }
    }

    result
}

/// Run `f` over two generated containers and compare the result against the reference intersection.
/// Also checks that the representation of the result matches its cardinality
pub(crate) fn op_test<C0, C1, F>(count0: usize, count1: usize, f: F)
    where C0: TestShim,
          C1: TestShim,
          F: FnOnce(C0, C1) -> Container
{
    let data_a = C0::generate(count0, SEED);
    let data_b = C1::generate(count1, SEED ^ 0xFFFF);
    let expected = compute_intersection(&data_a, &data_b);

    let a = C0::from_data(&data_a);
    let b = C1::from_data(&data_b);

    let r = (f)(a, b);

    // Check that the cardinality matches the precomputed result
    assert_eq!(
        r.cardinality(),
        expected.len(),
        "Unequal cardinality; found {}, expected {}",
        r.cardinality(),
        expected.len()
    );

    assert_eq!(
        r.is_bitset(),
        expected.len() > DEFAULT_MAX_SIZE,
        "Unexpected representation for cardinality {}",
        expected.len()
    );

    // Check that the output matches the precomputed result
    let found: Vec<u16> = r.iter().collect();
    assert_eq!(found, expected, "Sets are not equivalent");
}

/// Run a cardinality only operation over two generated containers and compare against the reference
pub(crate) fn op_card_test<C0, C1, F>(count0: usize, count1: usize, f: F)
    where C0: TestShim,
          C1: TestShim,
          F: FnOnce(C0, C1) -> usize
{
    let data_a = C0::generate(count0, SEED);
    let data_b = C1::generate(count1, SEED ^ 0xFFFF);
    let expected = compute_intersection(&data_a, &data_b);

    let a = C0::from_data(&data_a);
    let b = C1::from_data(&data_b);

    let r = (f)(a, b);

    assert_eq!(
        r,
        expected.len(),
        "Unequal cardinality; found {}, expected {}",
        r,
        expected.len()
    );
}
