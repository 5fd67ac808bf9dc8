//! # Numeric Helpers
//!
//! Presentation rounding for decimal amounts. Stored values keep full precision;
//! rounding only happens when building responses.

/// Round `value` to `places` decimal places, halves away from zero.
///
/// ```rust
/// use lib_utils::round_to;
///
/// assert_eq!(round_to(0.91999999, 3), 0.92);
/// assert_eq!(round_to(2.5, 0), 3.0);
/// ```
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(920.004, 2), 920.0);
        assert_eq!(round_to(43.8, 0), 44.0);
        assert_eq!(round_to(0.0, 3), 0.0);
    }
}
