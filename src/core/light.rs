//! Light sources: direct lighting samples for shading and photon
//! emission for the photon pass.

// lumen
use crate::core::geometry::{vec3_dot, Point3f, Ray, Vector3f};
use crate::core::lumen::{Float, Spectrum};
use crate::core::shading::ShadingState;

/// Unoccluded light arriving along *shadow_ray*.
#[derive(Debug, Copy, Clone)]
pub struct LightSample {
    pub shadow_ray: Ray,
    pub ldiff: Spectrum,
    pub lspec: Spectrum,
}

impl LightSample {
    pub fn new(shadow_ray: Ray, ldiff: Spectrum, lspec: Spectrum) -> Self {
        LightSample {
            shadow_ray,
            ldiff,
            lspec,
        }
    }
    /// Cosine between the incoming light direction and *n*.
    pub fn dot(&self, n: &Vector3f) -> Float {
        vec3_dot(&self.shadow_ray.d, n)
    }
}

/// Start point, direction and power of a photon leaving a light.
#[derive(Debug, Copy, Clone)]
pub struct EmittedPhoton {
    pub p: Point3f,
    pub dir: Vector3f,
    pub power: Spectrum,
}

pub trait LightSource: Send + Sync {
    fn get_num_samples(&self) -> i32;
    /// Add visible, unoccluded samples of this light to *state*.
    fn get_samples(&self, state: &mut ShadingState);
    /// Map four uniform draws to an emitted photon.
    fn get_photon(&self, rand_x1: f64, rand_y1: f64, rand_x2: f64, rand_y2: f64) -> EmittedPhoton;
    /// Total emitted power, used to pick lights for photon emission.
    fn get_power(&self) -> Float;
}
