//! Brute force path traced indirect diffuse light. Camera hits shoot
//! *samples* gather rays, deeper diffuse bounces shoot only one.

// lumen
use crate::core::geometry::{OrthoNormalBasis, Ray, Vector3f};
use crate::core::gi::GiEngine;
use crate::core::lightserver::LightServer;
use crate::core::lumen::{Float, Spectrum, PI};
use crate::core::paramset::ParamSet;
use crate::core::sampling::cosine_sample_hemisphere;
use crate::core::scene::Scene;
use crate::core::shading::ShadingState;

pub struct PathTracingGiEngine {
    samples: i32,
}

impl PathTracingGiEngine {
    pub fn new(samples: i32) -> Self {
        PathTracingGiEngine { samples }
    }
    pub fn create(ps: &ParamSet) -> Self {
        PathTracingGiEngine::new(ps.find_one_int("gi.path.samples", 16))
    }
}

impl GiEngine for PathTracingGiEngine {
    fn init(&mut self, _scene: &dyn Scene) -> bool {
        self.samples = self.samples.max(0);
        log::info!("path tracer settings:");
        log::info!("  * samples: {}", self.samples);
        true
    }
    fn get_irradiance(&self, state: &mut ShadingState, _diffuse_reflectance: &Spectrum) -> Spectrum {
        if self.samples <= 0 {
            return Spectrum::default();
        }
        let server: &LightServer = state.server();
        let onb: OrthoNormalBasis = state.basis();
        let n: i32 = if state.diffuse_depth() == 0 {
            self.samples
        } else {
            1
        };
        let mut irr: Spectrum = Spectrum::default();
        for i in 0..n {
            let xi: f64 = state.get_random(i, 0, n);
            let xj: f64 = state.get_random(i, 1, n);
            let w: Vector3f = onb.transform(&cosine_sample_hemisphere(xi, xj));
            let r: Ray = Ray::new(state.point(), w);
            if let Some(gather) = server.trace_final_gather(state, r, i) {
                irr += server.shade_hit(gather);
            }
        }
        irr * (PI / n as Float)
    }
    fn get_global_radiance(&self, _state: &mut ShadingState) -> Spectrum {
        Spectrum::default()
    }
}
