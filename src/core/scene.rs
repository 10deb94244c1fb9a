//! Tracing contract between the light transport code and the
//! geometry it runs against.

// lumen
use crate::core::geometry::{Bounds3f, Ray};
use crate::core::interaction::IntersectionState;

/// Must be safe to call from many threads at once as long as each
/// caller passes its own scratch.
pub trait Scene: Send + Sync {
    /// Find the closest hit along *r*. Clears *istate* first; on a hit
    /// *r.t_max* is moved to the hit distance.
    fn trace(&self, r: &mut Ray, istate: &mut IntersectionState);
    fn world_bound(&self) -> Bounds3f;
}
