//! Histogram-driven automatic windowing
//!
//! Each call on the same image lowers the sensitivity divisor, so the
//! detected range widens step by step until the divisor wraps around.

use crate::types::{DisplayRange, HistogramStats};
use log::trace;

/// Divisor used by the first auto call on an image
pub const AUTO_THRESHOLD: u32 = 5000;

/// Advance the sensitivity divisor: restart below 10, otherwise halve
#[inline]
#[must_use]
pub fn next_threshold(current: u32) -> u32 {
    if current < 10 {
        AUTO_THRESHOLD
    } else {
        current / 2
    }
}

/// First and last bins whose count exceeds `threshold`
///
/// Bins holding more than `limit` pixels (background, saturated areas) count
/// as empty. When nothing qualifies the scans stop at the opposite ends, which
/// yields `hmax < hmin`.
#[must_use]
pub fn scan_bounds(histogram: &[u64; 256], limit: u64, threshold: u64) -> (usize, usize) {
    let qualifies = |i: &usize| {
        let count = histogram[*i];
        let count = if count > limit { 0 } else { count };
        count > threshold
    };

    let hmin = (0..256).find(qualifies).unwrap_or(255);
    let hmax = (0..256).rev().find(qualifies).unwrap_or(0);
    (hmin, hmax)
}

/// Range found by one auto step with divisor `divisor`, or `None` when the scan degenerates
#[must_use]
pub fn auto_range(stats: &HistogramStats, divisor: u32) -> Option<DisplayRange> {
    let limit = stats.pixel_count / 10;
    let threshold = stats.pixel_count / u64::from(divisor.max(1));

    let (hmin, hmax) = scan_bounds(&stats.histogram, limit, threshold);
    trace!("auto scan: divisor={divisor} threshold={threshold} limit={limit} bins={hmin}..={hmax}");
    if hmax < hmin {
        return None;
    }

    let min = stats.hist_min + hmin as f64 * stats.bin_size;
    let max = stats.hist_min + hmax as f64 * stats.bin_size;
    if min == max {
        Some(DisplayRange::new(stats.min, stats.max))
    } else {
        Some(DisplayRange::new(min, max))
    }
}
