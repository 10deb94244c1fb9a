//! Lambertian surfaces. Photons are stored where they land and
//! continue with a cosine weighted bounce after Russian roulette.

// lumen
use crate::core::geometry::{OrthoNormalBasis, Ray, Vector3f};
use crate::core::lumen::{Float, Spectrum};
use crate::core::shader::Shader;
use crate::core::shading::ShadingState;

#[derive(Debug, Copy, Clone)]
pub struct DiffuseShader {
    pub diff: Spectrum,
}

impl DiffuseShader {
    pub fn new(diff: Spectrum) -> Self {
        DiffuseShader { diff }
    }
}

impl Shader for DiffuseShader {
    fn get_radiance(&self, state: &mut ShadingState) -> Spectrum {
        state.face_forward();
        state.init_light_samples();
        state.init_caustic_samples();
        state.diffuse(&self.diff)
    }
    fn scatter_photon(&self, state: &mut ShadingState, power: &Spectrum) {
        state.face_forward();
        let dir: Vector3f = state.ray().d;
        state.store_photon(&dir, power, &self.diff);
        let avg: Float = self.diff.average();
        let rnd: f64 = state.get_random(0, 0, 1);
        if rnd >= avg as f64 {
            return;
        }
        // survivors carry the reflected share, rescaled by the odds
        let power: Spectrum = *power * self.diff * (1.0 as Float / avg);
        let onb: OrthoNormalBasis = state.basis();
        let u: f64 = 2.0 * std::f64::consts::PI * rnd / avg as f64;
        let v: f64 = state.get_random(0, 1, 1);
        let s: f64 = v.sqrt();
        let s1: f64 = (1.0 - v).sqrt();
        let w: Vector3f = Vector3f::new((u.cos() * s) as Float, (u.sin() * s) as Float, s1 as Float);
        let r: Ray = Ray::new(state.point(), onb.transform(&w));
        state.trace_diffuse_photon(r, &power);
    }
}
