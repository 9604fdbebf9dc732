use crate::types::DisplayRange;

/// Map `value` through a display range onto 0..=255
///
/// A zero-width window becomes a hard threshold at its level.
#[inline]
#[must_use]
pub fn window_to_u8(value: f64, range: &DisplayRange) -> u8 {
    let window = range.window();
    if window <= 0.0 {
        return if value >= range.min { 255 } else { 0 };
    }
    let normalized = (value - range.min) / window;
    // Saturating cast: values < 0 become 0, values > 255 become 255
    (normalized * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_mapping() {
        let range = DisplayRange::new(0.0, 80.0);
        assert_eq!(window_to_u8(-1000.0, &range), 0);
        assert_eq!(window_to_u8(0.0, &range), 0);
        assert_eq!(window_to_u8(40.0, &range), 127);
        assert_eq!(window_to_u8(80.0, &range), 255);
        assert_eq!(window_to_u8(3000.0, &range), 255);
    }

    #[test]
    fn test_zero_window_thresholds() {
        let range = DisplayRange::new(50.0, 50.0);
        assert_eq!(window_to_u8(49.9, &range), 0);
        assert_eq!(window_to_u8(50.0, &range), 255);
    }
}
