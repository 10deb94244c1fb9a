//! Perfect mirror with a Schlick style Fresnel falloff towards white
//! at grazing angles.

// lumen
use crate::core::geometry::{vec3_reflect, Ray, Vector3f};
use crate::core::lumen::{Float, Spectrum};
use crate::core::shader::Shader;
use crate::core::shading::ShadingState;

#[derive(Debug, Copy, Clone)]
pub struct MirrorShader {
    pub color: Spectrum,
}

impl MirrorShader {
    pub fn new(color: Spectrum) -> Self {
        MirrorShader { color }
    }
    fn reflected_ray(state: &ShadingState) -> Option<Ray> {
        let n: Vector3f = state.normal()?;
        let d: Vector3f = vec3_reflect(&state.ray().d, &n, state.cos_nd());
        Some(Ray::new(state.point(), d))
    }
}

impl Shader for MirrorShader {
    fn get_radiance(&self, state: &mut ShadingState) -> Spectrum {
        if !state.include_specular() {
            return Spectrum::default();
        }
        state.face_forward();
        let r: Ray = match MirrorShader::reflected_ray(state) {
            Some(r) => r,
            None => return Spectrum::default(),
        };
        let cos: Float = 1.0 as Float - state.cos_nd();
        let cos2: Float = cos * cos;
        let cos5: Float = cos2 * cos2 * cos;
        let fresnel: Spectrum = (Spectrum::white() - self.color) * cos5 + self.color;
        fresnel * state.trace_reflection(r, 0)
    }
    fn scatter_photon(&self, state: &mut ShadingState, power: &Spectrum) {
        let avg: Float = self.color.average();
        let rnd: f64 = state.get_random(0, 0, 1);
        if rnd >= avg as f64 {
            return;
        }
        state.face_forward();
        let power: Spectrum = *power * self.color * (1.0 as Float / avg);
        if let Some(r) = MirrorShader::reflected_ray(state) {
            state.trace_reflection_photon(r, &power);
        }
    }
}
