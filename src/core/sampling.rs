//! Sampling helpers shared by lights, shaders and GI engines, plus
//! the cumulative light power histogram driving photon emission.

// lumen
use crate::core::geometry::Vector3f;
use crate::core::lumen::{Float, PI};
use crate::core::rng::Rng;

/// Randomly permute an array of *count* sample values, each of which
/// has *n_dimensions* dimensions.
pub fn shuffle<T>(samp: &mut [T], count: usize, n_dimensions: usize, rng: &mut Rng) {
    for i in 0..count {
        let other: usize = i + rng.uniform_uint32_bounded((count - i) as u32) as usize;
        for j in 0..n_dimensions {
            samp.swap(n_dimensions * i + j, n_dimensions * other + j);
        }
    }
}

/// Cosine weighted direction around +z for two uniform draws.
pub fn cosine_sample_hemisphere(xi: f64, xj: f64) -> Vector3f {
    let phi: f64 = 2.0 * std::f64::consts::PI * xi;
    let sin_theta: f64 = xj.sqrt();
    let cos_theta: f64 = (1.0 - xj).sqrt();
    Vector3f {
        x: (phi.cos() * sin_theta) as Float,
        y: (phi.sin() * sin_theta) as Float,
        z: cos_theta as Float,
    }
}

/// Uniformly distributed direction on the unit sphere.
pub fn uniform_sample_sphere(u: f64, v: f64) -> Vector3f {
    let phi: Float = 2.0 as Float * PI * u as Float;
    let s: Float = (v * (1.0 - v)).sqrt() as Float;
    Vector3f {
        x: phi.cos() * s * 2.0,
        y: phi.sin() * s * 2.0,
        z: (1.0 - 2.0 * v) as Float,
    }
}

/// Cumulative power over the light list. Entries never decrease and
/// the last one is the total emitted power.
#[derive(Debug, Clone)]
pub struct PhotonEmissionHistogram {
    cdf: Vec<Float>,
}

impl PhotonEmissionHistogram {
    pub fn new(powers: &[Float]) -> Self {
        let mut cdf: Vec<Float> = Vec::with_capacity(powers.len());
        let mut sum: Float = 0.0;
        for p in powers {
            sum += p.max(0.0 as Float);
            cdf.push(sum);
        }
        PhotonEmissionHistogram { cdf }
    }
    pub fn len(&self) -> usize {
        self.cdf.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cdf.is_empty()
    }
    pub fn total(&self) -> Float {
        self.cdf.last().copied().unwrap_or(0.0 as Float)
    }
    /// Select the light owning *draw* in *[0, total]*: the first entry
    /// greater or equal to the draw. Returns the light index and the
    /// draw remapped to *[0, 1]* within that light's interval. Draws
    /// past the last entry and draws landing on a zero power light
    /// select nothing.
    pub fn select(&self, draw: Float) -> Option<(usize, Float)> {
        let mut j: usize = 0;
        while j < self.cdf.len() && draw > self.cdf[j] {
            j += 1;
        }
        if j == self.cdf.len() {
            return None;
        }
        let lo: Float = if j == 0 { 0.0 } else { self.cdf[j - 1] };
        let width: Float = self.cdf[j] - lo;
        if width <= 0.0 as Float {
            return None;
        }
        Some((j, (draw - lo) / width))
    }
}
