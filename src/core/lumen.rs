//! Type definitions of Float and Spectrum, otherwise constants and
//! helper functions which are used almost everywhere else in the
//! code.

// std
use std::ops::{Add, BitAnd, Mul, Sub};
// others
use num;
// lumen
use crate::core::spectrum::RGBSpectrum;

pub type Spectrum = RGBSpectrum;

pub type Float = f32;

pub const PI: Float = std::f32::consts::PI;
pub const INV_PI: Float = 0.318_309_886_183_790_671_54;
pub const INV_4_PI: Float = 0.079_577_471_545_947_667_88;
/// Offset used for secondary and shadow rays leaving a surface.
pub const RAY_EPSILON: Float = 0.001;

/// Clamp a value between a lower and an upper bound.
pub fn clamp_t<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    let r: T;
    if val < low {
        r = low;
    } else if val > high {
        r = high;
    } else {
        r = val;
    }
    r
}

/// Determine if a given integer is an exact power of 2.
pub fn is_power_of_2<T>(v: T) -> bool
where
    T: num::Zero + num::One + Copy + PartialOrd + BitAnd<T, Output = T> + Sub<T, Output = T>,
{
    // https://doc.rust-lang.org/std/primitive.u32.html#method.is_power_of_two
    (v > T::zero()) && !((v & (v - T::one())) > T::zero())
}

/// Interpolate linearly between two provided values.
pub fn lerp<S, T>(t: S, a: T, b: T) -> T
where
    S: num::One,
    S: Sub<S, Output = S>,
    S: Copy,
    T: Add<T, Output = T>,
    T: Mul<S, Output = T>,
{
    let one: S = num::One::one();
    a * (one - t) + b * t
}

/// Degrees to radians.
pub fn radians(deg: Float) -> Float {
    (PI / 180.0 as Float) * deg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_of_two() {
        assert!(is_power_of_2(1_i32));
        assert!(is_power_of_2(256_u32));
        assert!(!is_power_of_2(0_i32));
        assert!(!is_power_of_2(96_i32));
    }

    #[test]
    fn clamp_and_lerp() {
        assert_eq!(clamp_t(600, 16, 512), 512);
        assert_eq!(clamp_t(-9, -4, 5), -4);
        assert_eq!(lerp(0.25 as Float, 0.0 as Float, 4.0 as Float), 1.0);
    }
}
