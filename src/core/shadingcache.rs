//! Screen space cache of shading results.
//!
//! The raster plane is cut into square cells of `1 / resolution`
//! pixels. Each slot of a fixed power of two table remembers one cell
//! and a list of the colors shaded inside it; samples hitting the same
//! instance with the same shader and a close enough normal reuse the
//! stored color instead of running the shader again.

// lumen
use crate::core::geometry::{vec3_dot, Vector3f};
use crate::core::lumen::{is_power_of_2, Float, Spectrum};

/// Normals must agree at least this much for a cached color to be
/// reused.
pub const CACHE_NORMAL_THRESHOLD: Float = 0.95;

pub const DEFAULT_CACHE_SIZE: usize = 4096;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub lookups: u64,
    pub hits: u64,
    pub empty_entry_misses: u64,
    pub wrong_entry_misses: u64,
    pub entry_additions: u64,
}

struct CachedSample {
    instance: usize,
    shader: usize,
    n: Vector3f,
    c: Spectrum,
    next: Option<Box<CachedSample>>,
}

struct CacheEntry {
    cx: i32,
    cy: i32,
    first: Option<Box<CachedSample>>,
}

impl Drop for CacheEntry {
    fn drop(&mut self) {
        // unlink iteratively, lists can grow long
        let mut next = self.first.take();
        while let Some(mut sample) = next {
            next = sample.next.take();
        }
    }
}

pub struct ShadingCache {
    entries: Vec<Option<CacheEntry>>,
    resolution: Float,
    stats: CacheStats,
}

impl ShadingCache {
    /// Cache for a shading rate in pixels per shading sample. Rates
    /// that are not positive disable the cache.
    pub fn new(shading_rate: Float) -> Option<ShadingCache> {
        if shading_rate > 0.0 as Float {
            Some(ShadingCache::with_size(
                DEFAULT_CACHE_SIZE,
                1.0 as Float / shading_rate.sqrt(),
            ))
        } else {
            None
        }
    }
    /// Panics unless *size* is a power of two.
    pub fn with_size(size: usize, resolution: Float) -> ShadingCache {
        assert!(is_power_of_2(size), "shading cache size {} is not a power of two", size);
        let mut entries: Vec<Option<CacheEntry>> = Vec::with_capacity(size);
        entries.resize_with(size, || None);
        ShadingCache {
            entries,
            resolution,
            stats: CacheStats::default(),
        }
    }
    pub fn resolution(&self) -> Float {
        self.resolution
    }
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
    /// Drop all entries and reset the statistics.
    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = None;
        }
        self.stats = CacheStats::default();
    }
    /// Quantized cell of raster position *(rx, ry)*.
    pub fn cell(&self, rx: Float, ry: Float) -> (i32, i32) {
        ((rx * self.resolution) as i32, (ry * self.resolution) as i32)
    }
    fn slot(&self, cx: i32, cy: i32) -> usize {
        ((cx ^ cy) as u32 as usize) & (self.entries.len() - 1)
    }
    pub fn lookup(
        &mut self,
        rx: Float,
        ry: Float,
        instance: usize,
        shader: usize,
        n: &Vector3f,
    ) -> Option<Spectrum> {
        self.stats.lookups += 1;
        let (cx, cy) = self.cell(rx, ry);
        let slot: usize = self.slot(cx, cy);
        let entry: &CacheEntry = match self.entries[slot] {
            Some(ref entry) => entry,
            None => {
                self.stats.empty_entry_misses += 1;
                return None;
            }
        };
        if entry.cx != cx || entry.cy != cy {
            self.stats.wrong_entry_misses += 1;
            return None;
        }
        let mut sample: Option<&CachedSample> = entry.first.as_deref();
        while let Some(s) = sample {
            if s.instance == instance
                && s.shader == shader
                && vec3_dot(n, &s.n) >= CACHE_NORMAL_THRESHOLD
            {
                let c: Spectrum = s.c;
                self.stats.hits += 1;
                return Some(c);
            }
            sample = s.next.as_deref();
        }
        None
    }
    pub fn add(
        &mut self,
        rx: Float,
        ry: Float,
        instance: usize,
        shader: usize,
        n: &Vector3f,
        c: &Spectrum,
    ) {
        self.stats.entry_additions += 1;
        let (cx, cy) = self.cell(rx, ry);
        let slot: usize = self.slot(cx, cy);
        let reuse: bool = match self.entries[slot] {
            Some(ref entry) => entry.cx == cx && entry.cy == cy,
            None => false,
        };
        if !reuse {
            self.entries[slot] = Some(CacheEntry {
                cx,
                cy,
                first: None,
            });
        }
        if let Some(ref mut entry) = self.entries[slot] {
            let first = entry.first.take();
            entry.first = Some(Box::new(CachedSample {
                instance,
                shader,
                n: *n,
                c: *c,
                next: first,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up() -> Vector3f {
        Vector3f::new(0.0, 1.0, 0.0)
    }

    #[test]
    fn stored_color_is_found_again() {
        let mut cache = ShadingCache::with_size(16, 1.0);
        let c = Spectrum::rgb(0.25, 0.5, 0.75);
        cache.add(3.2, 5.7, 1, 10, &up(), &c);
        // same cell, normal within cos >= 0.95
        let n = Vector3f::new(0.3, 0.954, 0.0);
        assert!(vec3_dot(&n, &up()) >= 0.95);
        assert_eq!(cache.lookup(3.9, 5.1, 1, 10, &n), Some(c));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn diverging_normal_misses() {
        let mut cache = ShadingCache::with_size(16, 1.0);
        cache.add(3.2, 5.7, 1, 10, &up(), &Spectrum::new(1.0));
        let n = Vector3f::new(0.32, 0.94, 0.0);
        assert!(vec3_dot(&n, &up()) < 0.95);
        assert_eq!(cache.lookup(3.2, 5.7, 1, 10, &n), None);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn instance_and_shader_must_match() {
        let mut cache = ShadingCache::with_size(16, 1.0);
        cache.add(0.5, 0.5, 1, 10, &up(), &Spectrum::new(1.0));
        assert_eq!(cache.lookup(0.5, 0.5, 2, 10, &up()), None);
        assert_eq!(cache.lookup(0.5, 0.5, 1, 11, &up()), None);
        assert!(cache.lookup(0.5, 0.5, 1, 10, &up()).is_some());
    }

    #[test]
    fn newest_sample_in_a_cell_wins() {
        let mut cache = ShadingCache::with_size(16, 1.0);
        cache.add(0.5, 0.5, 1, 10, &up(), &Spectrum::new(1.0));
        cache.add(0.5, 0.5, 1, 10, &up(), &Spectrum::new(2.0));
        assert_eq!(cache.lookup(0.5, 0.5, 1, 10, &up()), Some(Spectrum::new(2.0)));
    }

    #[test]
    fn colliding_cell_replaces_the_slot() {
        let mut cache = ShadingCache::with_size(16, 1.0);
        // (1, 2) and (2, 1) hash to the same slot: 1 ^ 2 == 2 ^ 1
        cache.add(1.5, 2.5, 1, 10, &up(), &Spectrum::new(1.0));
        cache.add(2.5, 1.5, 1, 10, &up(), &Spectrum::new(2.0));
        assert_eq!(cache.lookup(1.5, 2.5, 1, 10, &up()), None);
        assert_eq!(cache.stats().wrong_entry_misses, 1);
        assert_eq!(cache.lookup(2.5, 1.5, 1, 10, &up()), Some(Spectrum::new(2.0)));
    }

    #[test]
    fn statistics_and_clear() {
        let mut cache = ShadingCache::with_size(16, 0.5);
        assert_eq!(cache.lookup(0.0, 0.0, 1, 1, &up()), None);
        cache.add(0.0, 0.0, 1, 1, &up(), &Spectrum::new(1.0));
        assert!(cache.lookup(1.9, 1.9, 1, 1, &up()).is_some());
        let stats = *cache.stats();
        assert_eq!(stats.lookups, 2);
        assert_eq!(stats.empty_entry_misses, 1);
        assert_eq!(stats.entry_additions, 1);
        assert_eq!(stats.hits, 1);
        cache.clear();
        assert_eq!(*cache.stats(), CacheStats::default());
        assert_eq!(cache.lookup(0.0, 0.0, 1, 1, &up()), None);
    }

    #[test]
    fn disabled_for_non_positive_rates() {
        assert!(ShadingCache::new(0.0).is_none());
        let cache = ShadingCache::new(4.0).unwrap();
        assert_eq!(cache.resolution(), 0.5);
    }
}
