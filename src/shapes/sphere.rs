// lumen
use crate::core::geometry::{vec3_dot, vec3_normalize, Bounds3f, OrthoNormalBasis, Point2f, Point3f, Ray, Vector3f};
use crate::core::lumen::{Float, PI};
use crate::core::shading::ShadingState;
use crate::core::shape::{Shape, ShapeHit};

#[derive(Debug, Copy, Clone)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: Float,
}

impl Sphere {
    pub fn new(center: Point3f, radius: Float) -> Self {
        Sphere { center, radius }
    }
}

impl Shape for Sphere {
    fn world_bound(&self) -> Bounds3f {
        let r: Vector3f = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center + (-r), self.center + r)
    }
    fn intersect(&self, r: &Ray) -> Option<ShapeHit> {
        let oc: Vector3f = r.o - self.center;
        // direction is normalized, so a == 1
        let b: Float = 2.0 * vec3_dot(&oc, &r.d);
        let c: Float = oc.length_squared() - self.radius * self.radius;
        let discriminant: Float = b * b - 4.0 * c;
        if discriminant < 0.0 as Float {
            return None;
        }
        let sq: Float = discriminant.sqrt();
        let t0: Float = (-b - sq) * 0.5;
        let t1: Float = (-b + sq) * 0.5;
        for t in [t0, t1].iter() {
            if r.is_inside(*t) {
                return Some(ShapeHit {
                    t: *t,
                    prim_id: 0,
                    u: 0.0,
                    v: 0.0,
                });
            }
        }
        None
    }
    fn prepare_shading_state(&self, state: &mut ShadingState) {
        let p: Point3f = state.ray().position(state.hit_t());
        let n: Vector3f = vec3_normalize(&(p - self.center));
        let mut phi: Float = n.y.atan2(n.x);
        if phi < 0.0 as Float {
            phi += 2.0 * PI;
        }
        let theta: Float = n.z.max(-1.0).min(1.0).acos();
        state.set_point(p);
        state.set_normal(n);
        state.set_geo_normal(n);
        state.set_tex(Point2f::new(phi / (2.0 * PI), theta / PI));
        state.set_basis(OrthoNormalBasis::make_from_w(&n));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_hit_in_front() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, -5.0), 1.0);
        let r = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, -1.0));
        let hit = sphere.intersect(&r).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
        // from inside only the far side counts
        let inside = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!((sphere.intersect(&inside).unwrap().t - 1.0).abs() < 1e-5);
        let away = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, 1.0));
        assert!(sphere.intersect(&away).is_none());
    }
}
