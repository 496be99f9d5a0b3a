//! Batch size selection.

/// Choose how many items to accumulate per bulk write.
///
/// Starting from `base_size`, the size doubles while the job holds more than
/// five batches' worth of items and the doubled size still fits under
/// `max_size`. A zero `base_size` is returned unchanged.
pub fn compute_batch_size(total_count: u64, base_size: usize, max_size: usize) -> usize {
    let mut size = base_size;
    if size == 0 {
        return 0;
    }

    loop {
        let ratio = total_count / size as u64;
        match size.checked_mul(2) {
            Some(doubled) if ratio > 5 && doubled <= max_size => size = doubled,
            _ => return size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_five_keeps_base() {
        assert_eq!(compute_batch_size(25_000, 5_000, 20_000), 5_000);
        assert_eq!(compute_batch_size(29_999, 5_000, 20_000), 5_000);
    }

    #[test]
    fn test_ratio_six_doubles() {
        assert_eq!(compute_batch_size(30_000, 5_000, 20_000), 10_000);
    }

    #[test]
    fn test_small_job_keeps_base() {
        assert_eq!(compute_batch_size(100, 5_000, 20_000), 5_000);
        assert_eq!(compute_batch_size(0, 5_000, 20_000), 5_000);
    }

    #[test]
    fn test_doubles_once_then_stops() {
        // 37000 / 5000 = 7, then 37000 / 10000 = 3
        assert_eq!(compute_batch_size(37_000, 5_000, 20_000), 10_000);
    }

    #[test]
    fn test_capped_by_max() {
        assert_eq!(compute_batch_size(10_000_000, 5_000, 20_000), 20_000);
        assert_eq!(compute_batch_size(10_000_000, 5_000, 5_000), 5_000);
    }

    #[test]
    fn test_max_not_multiple_of_base() {
        // 3000 -> 6000; 12000 would exceed 10000
        assert_eq!(compute_batch_size(1_000_000, 3_000, 10_000), 6_000);
    }

    #[test]
    fn test_zero_base() {
        assert_eq!(compute_batch_size(1_000, 0, 20_000), 0);
    }

    #[test]
    fn test_result_is_power_of_two_multiple_within_max() {
        let bases = [1usize, 3, 500, 5_000];
        let maxes = [1usize, 7, 1_000, 20_000, 160_000];
        let totals = [0u64, 1, 5, 6, 99, 2_999, 30_000, 37_000, 1_000_000, u64::MAX];

        for &base in &bases {
            for &max in maxes.iter().filter(|&&m| m >= base) {
                for &total in &totals {
                    let size = compute_batch_size(total, base, max);
                    assert!(size <= max, "{size} > {max}");
                    assert_eq!(size % base, 0);
                    assert!((size / base).is_power_of_two());
                }
            }
        }
    }
}
