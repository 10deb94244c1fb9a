//! Cheap ambient term blending a sky and a ground color by the angle
//! between the surface normal and the up vector. Nothing is traced.

// lumen
use crate::core::geometry::{vec3_dot, vec3_normalize, Vector3f};
use crate::core::gi::GiEngine;
use crate::core::lumen::{Float, Spectrum, PI};
use crate::core::paramset::ParamSet;
use crate::core::scene::Scene;
use crate::core::shading::ShadingState;

pub struct FakeGiEngine {
    up: Vector3f,
    sky: Spectrum,
    ground: Spectrum,
}

impl FakeGiEngine {
    pub fn new(up: Vector3f, sky: Spectrum, ground: Spectrum) -> Self {
        FakeGiEngine {
            up: vec3_normalize(&up),
            sky: sky * PI,
            ground: ground * PI,
        }
    }
    pub fn create(ps: &ParamSet) -> Self {
        FakeGiEngine::new(
            ps.find_one_vector3f("gi.fake.up", Vector3f::new(0.0, 1.0, 0.0)),
            ps.find_one_spectrum("gi.fake.sky", Spectrum::white()),
            ps.find_one_spectrum("gi.fake.ground", Spectrum::black()),
        )
    }
    fn irradiance_for(&self, n: &Vector3f) -> Spectrum {
        let cos_theta: Float = vec3_dot(&self.up, n);
        let sin2: Float = 1.0 as Float - cos_theta * cos_theta;
        let sine: Float = if sin2 > 0.0 as Float {
            sin2.sqrt() * 0.5
        } else {
            0.0
        };
        if cos_theta > 0.0 as Float {
            Spectrum::blend(&self.sky, &self.ground, sine)
        } else {
            Spectrum::blend(&self.ground, &self.sky, sine)
        }
    }
}

impl GiEngine for FakeGiEngine {
    fn init(&mut self, _scene: &dyn Scene) -> bool {
        true
    }
    fn get_irradiance(&self, state: &mut ShadingState, _diffuse_reflectance: &Spectrum) -> Spectrum {
        match state.normal() {
            Some(n) => self.irradiance_for(&n),
            None => Spectrum::default(),
        }
    }
    fn get_global_radiance(&self, _state: &mut ShadingState) -> Spectrum {
        Spectrum::default()
    }
}
