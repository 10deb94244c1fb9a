//! Ideal pinhole camera positioned with a look-at frame.

// lumen
use crate::core::camera::Camera;
use crate::core::geometry::{vec3_cross, vec3_normalize, Point3f, Ray, Vector3f};
use crate::core::lumen::{radians, Float};
use crate::core::paramset::ParamSet;

pub struct PinholeCamera {
    eye: Point3f,
    // camera frame, looking down -w
    u: Vector3f,
    v: Vector3f,
    w: Vector3f,
    au: Float,
    av: Float,
}

impl PinholeCamera {
    /// *fov* is the horizontal field of view in degrees, *aspect* is
    /// width over height.
    pub fn new(eye: Point3f, target: Point3f, up: Vector3f, fov: Float, aspect: Float) -> Self {
        let w: Vector3f = vec3_normalize(&(eye - target));
        let u: Vector3f = vec3_normalize(&vec3_cross(&up, &w));
        let v: Vector3f = vec3_cross(&w, &u);
        let au: Float = (radians(fov * 0.5)).tan();
        let av: Float = au / aspect;
        PinholeCamera {
            eye,
            u,
            v,
            w,
            au,
            av,
        }
    }
    pub fn create(ps: &ParamSet, aspect: Float) -> Self {
        let eye: Vector3f = ps.find_one_vector3f("camera.eye", Vector3f::new(0.0, 0.0, 5.0));
        let target: Vector3f = ps.find_one_vector3f("camera.target", Vector3f::default());
        let up: Vector3f = ps.find_one_vector3f("camera.up", Vector3f::new(0.0, 1.0, 0.0));
        let fov: Float = ps.find_one_float("camera.fov", 45.0);
        PinholeCamera::new(
            Point3f::new(eye.x, eye.y, eye.z),
            Point3f::new(target.x, target.y, target.z),
            up,
            fov,
            ps.find_one_float("camera.aspect", aspect),
        )
    }
}

impl Camera for PinholeCamera {
    fn get_ray(
        &self,
        x: Float,
        y: Float,
        image_width: i32,
        image_height: i32,
        _lens_u: f64,
        _lens_v: f64,
        _time: f64,
    ) -> Option<Ray> {
        let du: Float = -self.au + (2.0 * self.au * x) / (image_width as Float - 1.0).max(1.0);
        let dv: Float = -self.av + (2.0 * self.av * y) / (image_height as Float - 1.0).max(1.0);
        let d: Vector3f = self.u * du + self.v * dv - self.w;
        Some(Ray::new(self.eye, d))
    }
}
