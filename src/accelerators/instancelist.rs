//! Brute force scene: every ray is tested against every instance.

// std
use std::sync::Arc;
// lumen
use crate::core::geometry::{Bounds3f, Ray};
use crate::core::instance::Instance;
use crate::core::interaction::IntersectionState;
use crate::core::scene::Scene;

#[derive(Default)]
pub struct InstanceList {
    instances: Vec<Arc<Instance>>,
    bounds: Bounds3f,
}

impl InstanceList {
    pub fn new(instances: Vec<Arc<Instance>>) -> Self {
        let bounds: Bounds3f = instances
            .iter()
            .fold(Bounds3f::default(), |b, instance| b.union(&instance.world_bound()));
        InstanceList { instances, bounds }
    }
    pub fn len(&self) -> usize {
        self.instances.len()
    }
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl Scene for InstanceList {
    fn trace(&self, r: &mut Ray, istate: &mut IntersectionState) {
        istate.reset();
        for instance in self.instances.iter() {
            Instance::intersect(instance, r, istate);
        }
    }
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Point3f, Vector3f};
    use crate::shapes::sphere::Sphere;

    #[test]
    fn closest_instance_wins() {
        let near = Instance::new(Arc::new(Sphere::new(Point3f::new(0.0, 0.0, -3.0), 1.0)), None);
        let far = Instance::new(Arc::new(Sphere::new(Point3f::new(0.0, 0.0, -8.0), 1.0)), None);
        let scene = InstanceList::new(vec![far.clone(), near.clone()]);
        let mut istate = IntersectionState::new();
        let mut r = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, -1.0));
        scene.trace(&mut r, &mut istate);
        assert!(istate.hit());
        assert_eq!(istate.instance.as_ref().map(|i| i.id()), Some(near.id()));
        assert!((r.t_max - 2.0).abs() < 1e-5);
        let mut miss = Ray::new(Point3f::default(), Vector3f::new(0.0, 1.0, 0.0));
        scene.trace(&mut miss, &mut istate);
        assert!(!istate.hit());
    }
}
