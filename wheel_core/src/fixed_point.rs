//! Fixed-point step arithmetic.
//!
//! Steps are `u64` in units of `1 / scale_factor` step, so comparisons against
//! thresholds are exact integer operations.

/// Quantize a non-negative real value to an integer, rounding to nearest with
/// ties away from zero. Non-finite or negative values map to 0; values past
/// `u64::MAX` saturate.
#[inline]
pub fn quantize_u64(x: f64) -> u64 {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    let r = x.round();
    if r >= u64::MAX as f64 {
        u64::MAX
    } else {
        r as u64
    }
}

/// Fixed-point threshold for reaching the next count from `count`:
/// `round(base × growth^count) × scale`.
#[inline]
pub fn threshold_fp(base: f64, growth: f64, count: u32, scale: u32) -> u64 {
    let exp = i32::try_from(count).unwrap_or(i32::MAX);
    quantize_u64(base * growth.powi(exp)).saturating_mul(u64::from(scale))
}

/// Convert fixed-point steps back to whole steps (for reporting).
#[inline]
pub fn fp_to_steps(fp: u64, scale: u32) -> f64 {
    fp as f64 / f64::from(scale.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_rounds_and_guards() {
        assert_eq!(quantize_u64(9.5), 10);
        assert_eq!(quantize_u64(9.49), 9);
        assert_eq!(quantize_u64(-3.0), 0);
        assert_eq!(quantize_u64(f64::NAN), 0);
        assert_eq!(quantize_u64(f64::INFINITY), 0);
        assert_eq!(quantize_u64(1e30), u64::MAX);
    }

    #[test]
    fn default_curve_thresholds() {
        let t: Vec<u64> = (0..5).map(|n| threshold_fp(18.0, 1.05, n, 10)).collect();
        assert_eq!(t, vec![180, 190, 200, 210, 220]);
    }

    #[test]
    fn flat_curve_with_unit_growth() {
        assert_eq!(threshold_fp(6.0, 1.0, 0, 1), 6);
        assert_eq!(threshold_fp(6.0, 1.0, 7, 1), 6);
    }

    #[test]
    fn fp_round_trip_for_reporting() {
        assert!((fp_to_steps(185, 10) - 18.5).abs() < 1e-9);
        assert!((fp_to_steps(5, 0) - 5.0).abs() < 1e-9);
    }
}
