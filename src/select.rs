use crate::calc::CalcError;
use std::cmp::Ordering;

const GROUP_SIZE: usize = 5;

fn sort_partial<T: PartialOrd + Copy>(values: &[T]) -> Vec<T> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// k-th smallest element (0-indexed) via median-of-medians.
///
/// Worst-case linear; never sorts more than a group of five at a time.
pub fn select<T: PartialOrd + Copy>(values: &[T], k: usize) -> Result<T, CalcError> {
    if values.is_empty() {
        return Err(CalcError::EmptyInput);
    }
    if k >= values.len() {
        return Err(CalcError::IndexOutOfRange {
            index: k,
            len: values.len(),
        });
    }

    if values.len() <= GROUP_SIZE {
        return Ok(sort_partial(values)[k]);
    }

    let medians: Vec<T> = values
        .chunks(GROUP_SIZE)
        .map(|group| {
            let sorted = sort_partial(group);
            sorted[sorted.len() / 2]
        })
        .collect();
    let pivot = select(&medians, medians.len() / 2)?;

    let mut low = Vec::new();
    let mut high = Vec::new();
    let mut pivot_count = 0usize;
    for &v in values {
        if v < pivot {
            low.push(v);
        } else if v > pivot {
            high.push(v);
        } else if v == pivot {
            pivot_count += 1;
        }
    }

    if k < low.len() {
        select(&low, k)
    } else if k < low.len() + pivot_count {
        Ok(pivot)
    } else {
        select(&high, k - low.len() - pivot_count)
    }
}

/// Median built on [`select`]; even lengths average the two middle order statistics.
pub fn median(values: &[f64]) -> Result<f64, CalcError> {
    let n = values.len();
    if n == 0 {
        return Err(CalcError::EmptyInput);
    }
    if n % 2 == 1 {
        select(values, n / 2)
    } else {
        let lo = select(values, n / 2 - 1)?;
        let hi = select(values, n / 2)?;
        Ok((lo + hi) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::safe_median;

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut s = values.to_vec();
        s.sort_by(|a, b| a.partial_cmp(b).unwrap());
        s
    }

    // Small deterministic LCG so the sweep covers many shapes without a rng dependency.
    fn pseudo_random(seed: u64, len: usize, modulus: u64) -> Vec<f64> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) % modulus) as f64
            })
            .collect()
    }

    #[test]
    fn select_matches_sorted_order_statistic() {
        for len in 1..40 {
            for (seed, modulus) in [(1u64, 1000u64), (7, 4), (42, 1)] {
                let values = pseudo_random(seed + len as u64, len, modulus);
                let s = sorted(&values);
                for k in 0..len {
                    assert_eq!(select(&values, k).unwrap(), s[k], "len={len} k={k}");
                }
            }
        }
    }

    #[test]
    fn select_handles_all_equal_values() {
        let values = vec![3.0; 101];
        assert_eq!(select(&values, 0).unwrap(), 3.0);
        assert_eq!(select(&values, 100).unwrap(), 3.0);
    }

    #[test]
    fn select_works_on_integers() {
        let values = [9, 1, 8, 2, 7, 3, 6, 4, 5, 0, 11, 10];
        assert_eq!(select(&values, 0).unwrap(), 0);
        assert_eq!(select(&values, 6).unwrap(), 6);
        assert_eq!(select(&values, 11).unwrap(), 11);
    }

    #[test]
    fn select_rejects_empty_and_out_of_range() {
        let empty: [f64; 0] = [];
        assert!(matches!(select(&empty, 0), Err(CalcError::EmptyInput)));
        assert!(matches!(
            select(&[1.0, 2.0], 2),
            Err(CalcError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(median(&[80.0, 85.0, 70.0, 90.0]).unwrap(), 82.5);
        assert!(matches!(median(&[]), Err(CalcError::EmptyInput)));
    }

    #[test]
    fn selection_median_agrees_with_sorting_median() {
        for len in 1..64 {
            for seed in [3u64, 11, 97] {
                let values: Vec<f64> = pseudo_random(seed * len as u64, len, 10_000)
                    .into_iter()
                    .map(|v| v / 100.0)
                    .collect();
                assert_eq!(
                    median(&values).unwrap(),
                    safe_median(&values),
                    "values={values:?}"
                );
            }
        }
    }
}
