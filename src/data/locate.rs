/// Index of the sample in `sorted` closest to `target`.
///
/// `sorted` must be non-decreasing. Returns `None` for an empty slice.
/// Targets below the first or above the last sample clamp to the ends.
/// When `target` lies exactly halfway between two samples the higher index
/// wins; an exact match returns the first equal sample.
pub fn nearest_index(sorted: &[f64], target: f64) -> Option<usize> {
    if sorted.is_empty() {
        return None;
    }

    let upper = sorted.partition_point(|&f| f < target);
    if upper == 0 {
        return Some(0);
    }
    if upper == sorted.len() {
        return Some(sorted.len() - 1);
    }
    if sorted[upper] == target {
        return Some(upper);
    }

    let lower = upper - 1;
    if (target - sorted[lower]).abs() < (sorted[upper] - target).abs() {
        Some(lower)
    } else {
        Some(upper)
    }
}
