//! Geometric shapes: ray intersection plus filling in the local
//! shading frame once a hit is chosen.

// lumen
use crate::core::geometry::{Bounds3f, Ray};
use crate::core::lumen::Float;
use crate::core::shading::ShadingState;

#[derive(Debug, Default, Copy, Clone)]
pub struct ShapeHit {
    pub t: Float,
    pub prim_id: i32,
    pub u: Float,
    pub v: Float,
}

pub trait Shape: Send + Sync {
    fn world_bound(&self) -> Bounds3f;
    /// Closest hit strictly inside the ray's *[t_min, t_max]* range.
    fn intersect(&self, r: &Ray) -> Option<ShapeHit>;
    /// Set point, normals, basis and texture coordinates of the hit
    /// stored in *state*.
    fn prepare_shading_state(&self, state: &mut ShadingState);
}
