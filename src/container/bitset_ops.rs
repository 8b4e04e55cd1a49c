//! Word level kernels over the raw storage of bitset containers

/// Intersect `a` and `b` and write the result into `out`
pub fn and(a: &[u64], b: &[u64], out: &mut [u64]) {
    debug_assert!(a.len() == b.len() && a.len() == out.len());

    let pass = a.iter()
        .zip(b.iter())
        .zip(out.iter_mut());

    for ((wa, wb), wo) in pass {
        *wo = wa & wb;
    }
}

/// Intersect `a` with `b`, overwriting `a` with the result
pub fn and_assign(a: &mut [u64], b: &[u64]) {
    debug_assert!(a.len() == b.len());

    for (wa, wb) in a.iter_mut().zip(b.iter()) {
        *wa &= wb;
    }
}

/// Compute the cardinality of the bitset
pub fn cardinality(bitset: &[u64]) -> usize {
    let mut count = 0;
    for word in bitset.iter() {
        count += word.count_ones();
    }

    count as usize
}

/// Compute the cardinality of the intersection of two bitsets
pub fn and_cardinality(a: &[u64], b: &[u64]) -> usize {
    let mut count = 0;
    let pass = a.iter()
        .zip(b.iter());

    for (a, b) in pass {
        count += (a & b).count_ones();
    }

    count as usize
}

/// Check if two bitsets have at least one bit in common
pub fn and_any(a: &[u64], b: &[u64]) -> bool {
    a.iter()
        .zip(b.iter())
        .any(|(a, b)| a & b != 0)
}

/// Append the positions of the set bits in `bitset` to `out` in ascending order
pub fn extract_setbits(bitset: &[u64], out: &mut Vec<u16>) {
    for (i, word) in bitset.iter().enumerate() {
        push_word(*word, (i * 64) as u32, out);
    }
}

/// Append the positions of the bits set in both `a` and `b` to `out` in ascending order.
/// The intersection is never materialized as a bitset
pub fn extract_intersection_setbits(a: &[u64], b: &[u64], out: &mut Vec<u16>) {
    debug_assert!(a.len() == b.len());

    let pass = a.iter()
        .zip(b.iter())
        .enumerate();

    for (i, (wa, wb)) in pass {
        push_word(wa & wb, (i * 64) as u32, out);
    }
}

/// Push the set bits of `word` offset by `base`
#[inline]
fn push_word(mut word: u64, base: u32, out: &mut Vec<u16>) {
    while word != 0 {
        let r = word.trailing_zeros();
        out.push((base + r) as u16);

        // Clear the lowest set bit
        word &= word - 1;
    }
}
