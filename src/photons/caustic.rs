//! Caustic photon map: photons that reached a diffuse surface after at
//! least one specular bounce, kept in a balanced kd-tree and queried
//! for the *k* nearest photons around each shading point.

// std
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::RwLock;
// lumen
use crate::core::geometry::{pnt3_distance_squared, vec3_dot, Bounds3f, Point3f, Ray, Vector3f};
use crate::core::light::LightSample;
use crate::core::lumen::{Float, Spectrum, PI};
use crate::core::photon::{CausticStore, PhotonStore};
use crate::core::shading::ShadingState;

/// Estimates built from fewer photons than this are dropped.
const MIN_PHOTONS_PER_ESTIMATE: usize = 8;

#[derive(Debug, Copy, Clone)]
struct Photon {
    p: Point3f,
    dir: Vector3f,
    power: Spectrum,
}

impl Photon {
    fn axis(&self, axis: usize) -> Float {
        match axis {
            0 => self.p.x,
            1 => self.p.y,
            _ => self.p.z,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct Neighbor {
    dist2: Float,
    index: usize,
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.dist2 == other.dist2
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist2
            .partial_cmp(&other.dist2)
            .unwrap_or(Ordering::Equal)
    }
}

/// Photons in implicit kd-tree order: every slice stores its median
/// in the middle, split along the axis recorded for that position.
#[derive(Default)]
struct PhotonTree {
    photons: Vec<Photon>,
    axes: Vec<u8>,
}

impl PhotonTree {
    fn build(mut photons: Vec<Photon>) -> PhotonTree {
        let mut axes: Vec<u8> = vec![0_u8; photons.len()];
        PhotonTree::balance(&mut photons[..], &mut axes[..]);
        PhotonTree { photons, axes }
    }
    fn balance(photons: &mut [Photon], axes: &mut [u8]) {
        if photons.len() <= 1 {
            return;
        }
        let bounds: Bounds3f = photons
            .iter()
            .fold(Bounds3f::default(), |b, photon| b.union_pnt(&photon.p));
        let extent: Vector3f = bounds.extent();
        let axis: usize = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };
        let mid: usize = photons.len() / 2;
        photons.select_nth_unstable_by(mid, |a, b| {
            a.axis(axis)
                .partial_cmp(&b.axis(axis))
                .unwrap_or(Ordering::Equal)
        });
        axes[mid] = axis as u8;
        let (left, right) = photons.split_at_mut(mid);
        let (left_axes, right_axes) = axes.split_at_mut(mid);
        PhotonTree::balance(left, left_axes);
        PhotonTree::balance(&mut right[1..], &mut right_axes[1..]);
    }
    fn len(&self) -> usize {
        self.photons.len()
    }
    /// Up to *k* photons within *sqrt(max_dist2)* of *p*, farthest
    /// first.
    fn nearest(&self, p: &Point3f, k: usize, max_dist2: Float) -> Vec<Neighbor> {
        let mut heap: BinaryHeap<Neighbor> = BinaryHeap::with_capacity(k + 1);
        self.locate(0, self.photons.len(), p, k, max_dist2, &mut heap);
        heap.into_sorted_vec().into_iter().rev().collect()
    }
    fn locate(
        &self,
        start: usize,
        end: usize,
        p: &Point3f,
        k: usize,
        max_dist2: Float,
        heap: &mut BinaryHeap<Neighbor>,
    ) {
        if start >= end {
            return;
        }
        let mid: usize = start + (end - start) / 2;
        let photon: &Photon = &self.photons[mid];
        let axis: usize = self.axes[mid] as usize;
        let delta: Float = match axis {
            0 => p.x - photon.p.x,
            1 => p.y - photon.p.y,
            _ => p.z - photon.p.z,
        };
        let (near, far) = if delta < 0.0 as Float {
            ((start, mid), (mid + 1, end))
        } else {
            ((mid + 1, end), (start, mid))
        };
        self.locate(near.0, near.1, p, k, max_dist2, heap);
        let radius2 = |heap: &BinaryHeap<Neighbor>| -> Float {
            if heap.len() < k {
                max_dist2
            } else {
                heap.peek().map(|n| n.dist2).unwrap_or(max_dist2)
            }
        };
        let dist2: Float = pnt3_distance_squared(&photon.p, p);
        if dist2 < radius2(heap) {
            heap.push(Neighbor { dist2, index: mid });
            if heap.len() > k {
                heap.pop();
            }
        }
        if delta * delta < radius2(heap) {
            self.locate(far.0, far.1, p, k, max_dist2, heap);
        }
    }
}

struct CausticData {
    pending: Vec<Photon>,
    tree: PhotonTree,
    bounds: Bounds3f,
    max_power: Float,
    gather_radius: Float,
}

pub struct CausticPhotonMap {
    num_emit: i32,
    gather_num: usize,
    filter_value: Float,
    data: RwLock<CausticData>,
}

impl CausticPhotonMap {
    pub fn new(num_emit: i32, gather_num: usize, gather_radius: Float, filter_value: Float) -> Self {
        CausticPhotonMap {
            num_emit,
            gather_num: gather_num.max(1),
            filter_value,
            data: RwLock::new(CausticData {
                pending: Vec::new(),
                tree: PhotonTree::default(),
                bounds: Bounds3f::default(),
                max_power: 0.0,
                gather_radius,
            }),
        }
    }
    /// Number of photons in the balanced map.
    pub fn stored_photons(&self) -> usize {
        match self.data.read() {
            Ok(data) => data.tree.len(),
            Err(poisoned) => poisoned.into_inner().tree.len(),
        }
    }
    pub fn gather_radius(&self) -> Float {
        match self.data.read() {
            Ok(data) => data.gather_radius,
            Err(poisoned) => poisoned.into_inner().gather_radius,
        }
    }
    fn add_photon(&self, photon: Photon) {
        let mut data = match self.data.write() {
            Ok(data) => data,
            Err(poisoned) => poisoned.into_inner(),
        };
        let max_power: Float = photon.power[0].max(photon.power[1]).max(photon.power[2]);
        data.bounds = data.bounds.union_pnt(&photon.p);
        data.max_power = data.max_power.max(max_power);
        data.pending.push(photon);
    }
}

impl PhotonStore for CausticPhotonMap {
    fn num_emit(&self) -> i32 {
        self.num_emit
    }
    fn prepare(&self, _scene_bounds: &Bounds3f) {
        let mut data = match self.data.write() {
            Ok(data) => data,
            Err(poisoned) => poisoned.into_inner(),
        };
        data.pending.clear();
        data.tree = PhotonTree::default();
        data.bounds = Bounds3f::default();
        data.max_power = 0.0;
    }
    fn store(&self, state: &ShadingState, dir: &Vector3f, power: &Spectrum, _diffuse: &Spectrum) {
        // only photons that went through a specular chain
        if state.diffuse_depth() == 0 && (state.reflection_depth() > 0 || state.refraction_depth() > 0) {
            self.add_photon(Photon {
                p: state.point(),
                dir: *dir,
                power: *power,
            });
        }
    }
    fn init(&self) {
        let mut data = match self.data.write() {
            Ok(data) => data,
            Err(poisoned) => poisoned.into_inner(),
        };
        log::info!("balancing caustics photon map ...");
        let photons: Vec<Photon> = std::mem::take(&mut data.pending);
        data.tree = PhotonTree::build(photons);
        let max_radius: Float = 1.4 as Float * (data.max_power * self.gather_num as Float).sqrt();
        log::info!("caustic photon map:");
        log::info!("  * photons stored:   {}", data.tree.len());
        log::info!("  * photons/estimate: {}", self.gather_num);
        log::info!("  * estimate radius:  {:.3}", data.gather_radius);
        log::info!("  * maximum radius:   {:.3}", max_radius);
        log::debug!("  * photon bounds:    {:?}", data.bounds);
        if data.gather_radius > max_radius {
            data.gather_radius = max_radius;
        }
    }
    fn allow_diffuse_bounced(&self) -> bool {
        false
    }
    fn allow_reflection_bounced(&self) -> bool {
        true
    }
    fn allow_refraction_bounced(&self) -> bool {
        true
    }
}

impl CausticStore for CausticPhotonMap {
    fn get_samples(&self, state: &mut ShadingState) {
        let n: Vector3f = match state.normal() {
            Some(n) => n,
            None => return,
        };
        let p: Point3f = state.point();
        let samples: Vec<LightSample> = {
            let data = match self.data.read() {
                Ok(data) => data,
                Err(poisoned) => poisoned.into_inner(),
            };
            if data.tree.len() == 0 {
                return;
            }
            let max_dist2: Float = data.gather_radius * data.gather_radius;
            let found: Vec<Neighbor> = data.tree.nearest(&p, self.gather_num, max_dist2);
            if found.len() < MIN_PHOTONS_PER_ESTIMATE {
                return;
            }
            // a full search shrinks to the farthest photon found
            let radius2: Float = if found.len() == self.gather_num {
                found[0].dist2
            } else {
                max_dist2
            };
            let inv_area: Float = 1.0 as Float / (PI * radius2);
            let max_n_dist: Float = radius2 * 0.05;
            let f2r2: Float = 1.0 as Float / (self.filter_value * self.filter_value * radius2);
            let f_inv: Float = 1.0 as Float / (1.0 as Float - 2.0 as Float / (3.0 as Float * self.filter_value));
            let mut samples: Vec<LightSample> = Vec::with_capacity(found.len());
            for neighbor in found.iter() {
                let photon: &Photon = &data.tree.photons[neighbor.index];
                let cos: Float = -vec3_dot(&photon.dir, &n);
                if cos <= 0.001 {
                    continue;
                }
                // photons off the tangent plane belong to other surfaces
                let pcos: Float = vec3_dot(&(photon.p - p), &n);
                if pcos >= max_n_dist || pcos <= -max_n_dist {
                    continue;
                }
                let weight: Float = (1.0 as Float - (neighbor.dist2 * f2r2).sqrt()) * f_inv;
                let ldiff: Spectrum = photon.power * (inv_area / cos) * weight;
                samples.push(LightSample::new(
                    Ray::new(p, -photon.dir),
                    ldiff,
                    Spectrum::default(),
                ));
            }
            samples
        };
        for sample in samples {
            state.add_sample(sample);
        }
    }
    fn as_photon_store(&self) -> &dyn PhotonStore {
        self
    }
}
