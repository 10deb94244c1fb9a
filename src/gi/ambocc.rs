//! Ambient occlusion used as indirect light: unoccluded hemisphere
//! directions see the bright color, blocked ones the dark color.

// lumen
use crate::core::geometry::{OrthoNormalBasis, Ray, Vector3f};
use crate::core::gi::GiEngine;
use crate::core::lumen::{Float, Spectrum, PI};
use crate::core::paramset::ParamSet;
use crate::core::sampling::cosine_sample_hemisphere;
use crate::core::scene::Scene;
use crate::core::shading::ShadingState;

pub struct AmbientOcclusionGiEngine {
    bright: Spectrum,
    dark: Spectrum,
    samples: i32,
    max_dist: Float,
}

impl AmbientOcclusionGiEngine {
    pub fn new(bright: Spectrum, dark: Spectrum, samples: i32, max_dist: Float) -> Self {
        AmbientOcclusionGiEngine {
            bright,
            dark,
            samples: samples.max(1),
            max_dist: if max_dist <= 0.0 as Float {
                std::f32::INFINITY
            } else {
                max_dist
            },
        }
    }
    pub fn create(ps: &ParamSet) -> Self {
        AmbientOcclusionGiEngine::new(
            ps.find_one_spectrum("gi.ambocc.bright", Spectrum::white()),
            ps.find_one_spectrum("gi.ambocc.dark", Spectrum::black()),
            ps.find_one_int("gi.ambocc.samples", 32),
            ps.find_one_float("gi.ambocc.maxdist", 0.0),
        )
    }
}

impl GiEngine for AmbientOcclusionGiEngine {
    fn init(&mut self, _scene: &dyn Scene) -> bool {
        true
    }
    fn get_irradiance(&self, state: &mut ShadingState, _diffuse_reflectance: &Spectrum) -> Spectrum {
        let onb: OrthoNormalBasis = state.basis();
        let mut result: Spectrum = Spectrum::default();
        for i in 0..self.samples {
            let xi: f64 = state.get_random(i, 0, self.samples);
            let xj: f64 = state.get_random(i, 1, self.samples);
            let w: Vector3f = onb.transform(&cosine_sample_hemisphere(xi, xj));
            let mut r: Ray = Ray::new(state.point(), w);
            r.t_max = self.max_dist;
            let blocked: Float = if state.trace_shadow(&r) { 1.0 } else { 0.0 };
            result += Spectrum::blend(&self.bright, &self.dark, blocked);
        }
        result * (PI / self.samples as Float)
    }
    fn get_global_radiance(&self, _state: &mut ShadingState) -> Spectrum {
        Spectrum::default()
    }
}
