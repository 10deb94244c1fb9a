// lumen
use crate::core::geometry::{pnt3_distance_squared, vec3_dot, Point3f, Ray, Vector3f};
use crate::core::light::{EmittedPhoton, LightSample, LightSource};
use crate::core::lumen::{Float, Spectrum, INV_4_PI, PI};
use crate::core::sampling::uniform_sample_sphere;
use crate::core::shading::ShadingState;

/// Isotropic point light with total emitted *power*.
#[derive(Debug, Copy, Clone)]
pub struct PointLight {
    pub p_light: Point3f,
    pub power: Spectrum,
}

impl PointLight {
    pub fn new(p_light: Point3f, power: Spectrum) -> Self {
        PointLight { p_light, power }
    }
}

impl LightSource for PointLight {
    fn get_num_samples(&self) -> i32 {
        1
    }
    fn get_samples(&self, state: &mut ShadingState) {
        let (n, ng) = match (state.normal(), state.geo_normal()) {
            (Some(n), Some(ng)) => (n, ng),
            _ => return,
        };
        let p: Point3f = state.point();
        let d: Vector3f = self.p_light - p;
        if vec3_dot(&d, &n) <= 0.0 as Float || vec3_dot(&d, &ng) <= 0.0 as Float {
            return;
        }
        let shadow_ray: Ray = Ray::between(p, self.p_light);
        if state.trace_shadow(&shadow_ray) {
            return;
        }
        let scale: Float = INV_4_PI / pnt3_distance_squared(&self.p_light, &p);
        let radiance: Spectrum = self.power * scale;
        state.add_sample(LightSample::new(shadow_ray, radiance, radiance));
    }
    fn get_photon(&self, rand_x1: f64, rand_y1: f64, _rand_x2: f64, _rand_y2: f64) -> EmittedPhoton {
        EmittedPhoton {
            p: self.p_light,
            dir: uniform_sample_sphere(rand_x1, rand_y1),
            power: self.power,
        }
    }
    fn get_power(&self) -> Float {
        self.power.y() * 4.0 * PI
    }
}
