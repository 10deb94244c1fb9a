//! Instances pair a shape with the shader applied to it. Every
//! instance gets a process unique id which image samples and the
//! shading cache compare instead of pointers.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
// lumen
use crate::core::geometry::{Bounds3f, Ray};
use crate::core::interaction::IntersectionState;
use crate::core::shader::Shader;
use crate::core::shading::ShadingState;
use crate::core::shape::Shape;

static NEXT_INSTANCE_ID: AtomicUsize = AtomicUsize::new(1);

pub struct Instance {
    id: usize,
    shape: Arc<dyn Shape>,
    shader: Option<Arc<dyn Shader>>,
}

impl Instance {
    pub fn new(shape: Arc<dyn Shape>, shader: Option<Arc<dyn Shader>>) -> Arc<Instance> {
        Arc::new(Instance {
            id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
            shape,
            shader,
        })
    }
    pub fn id(&self) -> usize {
        self.id
    }
    pub fn shader(&self) -> Option<&Arc<dyn Shader>> {
        self.shader.as_ref()
    }
    pub fn world_bound(&self) -> Bounds3f {
        self.shape.world_bound()
    }
    /// Record a hit closer than the current one and shorten the ray.
    pub fn intersect(instance: &Arc<Instance>, r: &mut Ray, istate: &mut IntersectionState) {
        if let Some(hit) = instance.shape.intersect(r) {
            r.t_max = hit.t;
            istate.set_intersection(instance, hit.prim_id, hit.t, hit.u, hit.v);
        }
    }
    pub fn prepare_shading_state(&self, state: &mut ShadingState) {
        self.shape.prepare_shading_state(state);
        state.set_shader(self.shader.clone());
    }
}
