//! Per-worker scratch filled in by ray traversal.

// std
use std::sync::Arc;
// lumen
use crate::core::instance::Instance;
use crate::core::lumen::Float;

/// Closest hit found so far. Every worker owns exactly one and reuses
/// it for all of its rays, so shading reads what it needs right after
/// the trace.
#[derive(Default, Clone)]
pub struct IntersectionState {
    pub t: Float,
    pub u: Float,
    pub v: Float,
    pub id: i32,
    pub instance: Option<Arc<Instance>>,
}

impl IntersectionState {
    pub fn new() -> Self {
        IntersectionState::default()
    }
    pub fn hit(&self) -> bool {
        self.instance.is_some()
    }
    pub fn reset(&mut self) {
        self.instance = None;
    }
    pub fn set_intersection(&mut self, instance: &Arc<Instance>, id: i32, t: Float, u: Float, v: Float) {
        self.instance = Some(instance.clone());
        self.id = id;
        self.t = t;
        self.u = u;
        self.v = v;
    }
}
