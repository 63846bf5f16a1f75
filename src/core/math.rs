// Math utilities and helper functions

use glam::Vec2;

/// Convert degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Rotate `point` around `pivot` by `radians` (counter-clockwise in Y-up space)
pub fn rotate_about(point: Vec2, pivot: Vec2, radians: f32) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    let d = point - pivot;
    Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + pivot
}

/// Integer division rounding up, for positive divisors
pub fn ceil_div(value: i32, divisor: i32) -> i32 {
    let q = value / divisor;
    if value % divisor != 0 && (value > 0) == (divisor > 0) {
        q + 1
    } else {
        q
    }
}

/// Round to the nearest integer, halves toward positive infinity
///
/// `-2.5` rounds to `-2`, unlike [`f32::round`]. Out-of-range values saturate.
pub fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_deg_to_rad() {
        assert_abs_diff_eq!(deg_to_rad(180.0), std::f32::consts::PI);
        assert_abs_diff_eq!(deg_to_rad(-90.0), -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_rotate_about_pivot() {
        let p = rotate_about(Vec2::new(2.0, 1.0), Vec2::new(1.0, 1.0), deg_to_rad(90.0));
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p.y, 2.0, epsilon = 1e-5);

        // Pivot itself never moves
        let pivot = Vec2::new(3.0, -4.0);
        let q = rotate_about(pivot, pivot, 1.234);
        assert_abs_diff_eq!(q.x, pivot.x);
        assert_abs_diff_eq!(q.y, pivot.y);
    }

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(5, 3), 2);
        assert_eq!(ceil_div(6, 3), 2);
        assert_eq!(ceil_div(7, 3), 3);
        assert_eq!(ceil_div(1, 3), 1);
        assert_eq!(ceil_div(0, 3), 0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(-0.4), 0);
        assert_eq!(round_half_up(3.0e9), i32::MAX);
    }

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(1.0, 1.00001, 0.0001));
        assert!(!approx_equal(1.0, 1.1, 0.01));
    }
}
