//! Infinite plane through a point.

// lumen
use crate::core::geometry::{vec3_dot, vec3_normalize, Bounds3f, OrthoNormalBasis, Point2f, Point3f, Ray, Vector3f};
use crate::core::lumen::Float;
use crate::core::shading::ShadingState;
use crate::core::shape::{Shape, ShapeHit};

#[derive(Debug, Copy, Clone)]
pub struct Plane {
    pub center: Point3f,
    pub normal: Vector3f,
    basis: OrthoNormalBasis,
}

impl Plane {
    pub fn new(center: Point3f, normal: Vector3f) -> Self {
        let normal: Vector3f = vec3_normalize(&normal);
        Plane {
            center,
            normal,
            basis: OrthoNormalBasis::make_from_w(&normal),
        }
    }
}

impl Shape for Plane {
    /// Unbounded, so it adds nothing to the scene bounds.
    fn world_bound(&self) -> Bounds3f {
        Bounds3f::default()
    }
    fn intersect(&self, r: &Ray) -> Option<ShapeHit> {
        let dn: Float = vec3_dot(&self.normal, &r.d);
        if dn == 0.0 as Float {
            return None;
        }
        let t: Float = vec3_dot(&(self.center - r.o), &self.normal) / dn;
        if r.is_inside(t) {
            Some(ShapeHit {
                t,
                prim_id: 0,
                u: 0.0,
                v: 0.0,
            })
        } else {
            None
        }
    }
    fn prepare_shading_state(&self, state: &mut ShadingState) {
        let p: Point3f = state.ray().position(state.hit_t());
        let local: Vector3f = p - self.center;
        state.set_point(p);
        state.set_normal(self.normal);
        state.set_geo_normal(self.normal);
        state.set_tex(Point2f::new(
            vec3_dot(&local, &self.basis.u),
            vec3_dot(&local, &self.basis.v),
        ));
        state.set_basis(self.basis);
    }
}
