//! Search primitives shared by the array container operations

/// Find the first index in `slice[index..end]` holding a value greater than or equal to `min`.
/// Returns `end` if there is no such value.
///
/// Probes at exponentially growing offsets from `index` before finishing with a binary search,
/// so skipping `k` elements costs `O(log k)` comparisons.
///
/// # Remarks
/// Assumes that the slice is sorted and all elements are unique
pub fn advance_until(slice: &[u16], index: usize, end: usize, min: u16) -> usize {
    debug_assert!(end <= slice.len());

    let slice = &slice[..end];
    let mut lower = index;
    if lower >= slice.len() || slice[lower] >= min {
        return lower;
    }

    let mut span_size = 1;
    let mut bound = lower + span_size;

    while bound < slice.len() && slice[bound] < min {
        span_size <<= 1;
        bound = lower + span_size;
    }

    let upper = bound.min(slice.len() - 1);

    if slice[upper] == min {
        return upper;
    }

    if slice[upper] < min {
        return slice.len();
    }

    // `slice[lower] < min < slice[upper]` holds from here on
    let mut upper = upper;
    lower += span_size >> 1;

    while lower + 1 != upper {
        let mid = (lower + upper) >> 1;

        if slice[mid] == min {
            return mid;
        }
        else if slice[mid] < min {
            lower = mid;
        }
        else {
            upper = mid;
        }
    }

    upper
}

#[cfg(test)]
mod test {
    use super::advance_until;

    #[test]
    fn returns_start_when_already_past_target() {
        let data = [5, 9, 14];

        assert_eq!(advance_until(&data, 0, data.len(), 3), 0);
        assert_eq!(advance_until(&data, 1, data.len(), 9), 1);
    }

    #[test]
    fn finds_exact_and_next_larger() {
        let data: Vec<u16> = (0..1000).map(|i| i * 3).collect();

        assert_eq!(advance_until(&data, 0, data.len(), 300), 100);
        assert_eq!(advance_until(&data, 0, data.len(), 301), 101);
        assert_eq!(advance_until(&data, 50, data.len(), 2997), 999);
    }

    #[test]
    fn exhausts_when_target_is_larger_than_all() {
        let data = [1, 2, 3, 4];

        assert_eq!(advance_until(&data, 0, data.len(), 10), 4);
        assert_eq!(advance_until(&data, 4, data.len(), 0), 4);
    }

    #[test]
    fn respects_end_bound() {
        let data = [1, 2, 3, 40, 50];

        assert_eq!(advance_until(&data, 0, 3, 40), 3);
        assert_eq!(advance_until(&data, 0, 4, 40), 3);
    }

    #[test]
    fn agrees_with_linear_scan() {
        let data: Vec<u16> = (0..500).map(|i| i * 7 + (i % 3)).collect();

        for start in [0, 1, 17, 250, 499].iter() {
            for target in (0..3600).step_by(13) {
                let expected = data.iter()
                    .enumerate()
                    .skip(*start)
                    .find(|(_, v)| **v >= target)
                    .map(|(i, _)| i)
                    .unwrap_or(data.len());

                assert_eq!(advance_until(&data, *start, data.len(), target), expected);
            }
        }
    }
}
