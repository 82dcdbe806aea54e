//! Numeric conversion helpers centralizing the lossy casts used by travel math.

use num_traits::cast::cast;

/// Floor a f64 mileage figure into a non-negative `u32`, returning 0 for NaN or negatives.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = f64::from(u32::MAX);
    cast::<f64, u32>(value.min(max).floor()).unwrap_or(0)
}

/// Round a f32 into the `i32` range, returning 0 for NaN.
#[must_use]
pub fn round_f32_to_i32(value: f32) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let clamped = f64::from(value).clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    cast::<f64, i32>(clamped.round()).unwrap_or(0)
}

/// Convert a `u32` gauge to f32 for multiplier math.
#[must_use]
pub fn u32_to_f32(value: u32) -> f32 {
    cast::<u32, f32>(value).unwrap_or(0.0)
}

/// Convert an `i32` gauge to f32 for multiplier math.
#[must_use]
pub fn i32_to_f32(value: i32) -> f32 {
    cast::<i32, f32>(value).unwrap_or(0.0)
}

/// Scale a whole-number magnitude by a factor, rounding to the nearest unit and never going negative.
#[must_use]
pub fn scale_magnitude(base: u32, factor: f32) -> u32 {
    let scaled = round_f32_to_i32(u32_to_f32(base) * factor.max(0.0));
    u32::try_from(scaled).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_handles_negative_and_nan() {
        assert_eq!(floor_f64_to_u32(-3.5), 0);
        assert_eq!(floor_f64_to_u32(f64::NAN), 0);
        assert_eq!(floor_f64_to_u32(13.99), 13);
        assert_eq!(floor_f64_to_u32(f64::from(u32::MAX) * 4.0), u32::MAX);
    }

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f32_to_i32(1.6), 2);
        assert_eq!(round_f32_to_i32(f32::NAN), 0);
    }

    #[test]
    fn magnitude_scaling_rounds_and_clamps() {
        assert_eq!(scale_magnitude(10, 1.0), 10);
        assert_eq!(scale_magnitude(15, 1.5), 23);
        assert_eq!(scale_magnitude(10, -2.0), 0);
    }
}
