//! RGB color used for radiance, reflectance and photon power.

// std
use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign, Sub};
// others
use num::Zero;
// lumen
use crate::core::lumen::{clamp_t, Float};

#[derive(Debug, Default, Copy, Clone)]
pub struct RGBSpectrum {
    pub c: [Float; 3],
}

impl RGBSpectrum {
    pub fn new(v: Float) -> Self {
        RGBSpectrum { c: [v, v, v] }
    }
    pub fn rgb(r: Float, g: Float, b: Float) -> RGBSpectrum {
        RGBSpectrum { c: [r, g, b] }
    }
    pub fn black() -> RGBSpectrum {
        RGBSpectrum::new(0.0 as Float)
    }
    pub fn white() -> RGBSpectrum {
        RGBSpectrum::new(1.0 as Float)
    }
    /// Luminance.
    pub fn y(&self) -> Float {
        let y_weight: [Float; 3] = [0.212_671, 0.715_160, 0.072_169];
        y_weight[0] * self.c[0] + y_weight[1] * self.c[1] + y_weight[2] * self.c[2]
    }
    pub fn average(&self) -> Float {
        (self.c[0] + self.c[1] + self.c[2]) / 3.0 as Float
    }
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v <= 0.0 as Float)
    }
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }
    pub fn has_infs(&self) -> bool {
        self.c.iter().any(|v| v.is_infinite())
    }
    pub fn clamp(&self, low: Float, high: Float) -> RGBSpectrum {
        RGBSpectrum::rgb(
            clamp_t(self.c[0], low, high),
            clamp_t(self.c[1], low, high),
            clamp_t(self.c[2], low, high),
        )
    }
    /// Multiply-add: *self += s \* c*.
    pub fn madd(&mut self, s: Float, c: &RGBSpectrum) {
        for i in 0..3 {
            self.c[i] += s * c.c[i];
        }
    }
    /// Per channel relative difference `|a - b| / (a + b)` reaching
    /// *thresh* on any channel. Channels summing to zero never count.
    pub fn has_contrast(c1: &RGBSpectrum, c2: &RGBSpectrum, thresh: Float) -> bool {
        for i in 0..3 {
            let sum: Float = c1.c[i] + c2.c[i];
            if sum == 0.0 as Float {
                continue;
            }
            if (c1.c[i] - c2.c[i]).abs() / sum >= thresh {
                return true;
            }
        }
        false
    }
    /// Linear blend, returns *c1* for *b == 0* and *c2* for *b == 1*.
    pub fn blend(c1: &RGBSpectrum, c2: &RGBSpectrum, b: Float) -> RGBSpectrum {
        *c1 * (1.0 as Float - b) + *c2 * b
    }
    /// Gamma corrected, clamped 8-bit sRGB triple.
    pub fn to_srgb8(&self) -> [u8; 3] {
        let mut rgb: [u8; 3] = [0; 3];
        for i in 0..3 {
            rgb[i] = clamp_t(255.0 as Float * gamma_correct(self.c[i]) + 0.5, 0.0, 255.0) as u8;
        }
        rgb
    }
}

/// Is used to write sRGB-compatible 8-bit image files.
pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.003_130_8 {
        12.92 * value
    } else {
        1.055 as Float * value.powf((1.0 / 2.4) as Float) - 0.055
    }
}

impl PartialEq for RGBSpectrum {
    fn eq(&self, rhs: &RGBSpectrum) -> bool {
        self.c == rhs.c
    }
}

impl Add for RGBSpectrum {
    type Output = RGBSpectrum;
    fn add(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::rgb(
            self.c[0] + rhs.c[0],
            self.c[1] + rhs.c[1],
            self.c[2] + rhs.c[2],
        )
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, rhs: RGBSpectrum) {
        self.c[0] += rhs.c[0];
        self.c[1] += rhs.c[1];
        self.c[2] += rhs.c[2];
    }
}

impl Sub for RGBSpectrum {
    type Output = RGBSpectrum;
    fn sub(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::rgb(
            self.c[0] - rhs.c[0],
            self.c[1] - rhs.c[1],
            self.c[2] - rhs.c[2],
        )
    }
}

impl Mul for RGBSpectrum {
    type Output = RGBSpectrum;
    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::rgb(
            self.c[0] * rhs.c[0],
            self.c[1] * rhs.c[1],
            self.c[2] * rhs.c[2],
        )
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;
    fn mul(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum::rgb(self.c[0] * rhs, self.c[1] * rhs, self.c[2] * rhs)
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, rhs: Float) {
        self.c[0] *= rhs;
        self.c[1] *= rhs;
        self.c[2] *= rhs;
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = RGBSpectrum;
    fn div(self, rhs: Float) -> RGBSpectrum {
        let inv: Float = 1.0 as Float / rhs;
        self * inv
    }
}

impl Zero for RGBSpectrum {
    fn zero() -> RGBSpectrum {
        RGBSpectrum::new(0.0 as Float)
    }
    fn is_zero(&self) -> bool {
        self.is_black()
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;
    fn index(&self, index: usize) -> &Float {
        &self.c[index]
    }
}

impl From<Float> for RGBSpectrum {
    fn from(f: Float) -> Self {
        RGBSpectrum::new(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contrast_is_relative_per_channel() {
        let a = RGBSpectrum::rgb(1.0, 1.0, 1.0);
        let b = RGBSpectrum::rgb(1.0, 1.0, 1.5);
        // (1.5 - 1.0) / 2.5 = 0.2
        assert!(RGBSpectrum::has_contrast(&a, &b, 0.1));
        assert!(!RGBSpectrum::has_contrast(&a, &b, 0.25));
        assert!(!RGBSpectrum::has_contrast(
            &RGBSpectrum::black(),
            &RGBSpectrum::black(),
            0.1
        ));
    }

    #[test]
    fn blend_end_points() {
        let a = RGBSpectrum::rgb(1.0, 0.0, 0.0);
        let b = RGBSpectrum::rgb(0.0, 0.0, 1.0);
        assert_eq!(RGBSpectrum::blend(&a, &b, 0.0), a);
        assert_eq!(RGBSpectrum::blend(&a, &b, 1.0), b);
    }
}
