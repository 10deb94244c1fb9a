//! Sinks for finished buckets. Workers call **prepare** and **update**
//! concurrently on disjoint regions, so implementations take `&self`
//! and synchronize internally.

// std
use std::sync::RwLock;
// lumen
use crate::core::lumen::Spectrum;

pub trait Display: Send + Sync {
    /// Called once before any bucket is rendered.
    fn image_begin(&self, width: i32, height: i32, bucket_size: i32);
    /// A worker is about to start on the given region.
    fn image_prepare(&self, x: i32, y: i32, w: i32, h: i32, id: usize);
    /// Finished colors of a region, row major, *w \* h* entries.
    fn image_update(&self, x: i32, y: i32, w: i32, h: i32, data: &[Spectrum]);
    /// Called exactly once after all workers have joined.
    fn image_end(&self);
}

/// Shared pixel storage used by the displays in this crate.
#[derive(Debug, Default)]
pub struct PixelBuffer {
    pixels: RwLock<(i32, i32, Vec<Spectrum>)>,
}

impl PixelBuffer {
    pub fn resize(&self, width: i32, height: i32) {
        let mut guard = match self.pixels.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = (
            width,
            height,
            vec![Spectrum::default(); (width.max(0) * height.max(0)) as usize],
        );
    }
    pub fn write_region(&self, x: i32, y: i32, w: i32, h: i32, data: &[Spectrum]) {
        let mut guard = match self.pixels.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let width: i32 = guard.0;
        let height: i32 = guard.1;
        let pixels: &mut Vec<Spectrum> = &mut guard.2;
        for j in 0..h {
            for i in 0..w {
                let (px, py) = (x + i, y + j);
                if px < 0 || py < 0 || px >= width || py >= height {
                    continue;
                }
                if let Some(c) = data.get((i + j * w) as usize) {
                    pixels[(px + py * width) as usize] = *c;
                }
            }
        }
    }
    pub fn dimensions(&self) -> (i32, i32) {
        match self.pixels.read() {
            Ok(guard) => (guard.0, guard.1),
            Err(poisoned) => {
                let guard = poisoned.into_inner();
                (guard.0, guard.1)
            }
        }
    }
    pub fn snapshot(&self) -> Vec<Spectrum> {
        match self.pixels.read() {
            Ok(guard) => guard.2.clone(),
            Err(poisoned) => poisoned.into_inner().2.clone(),
        }
    }
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Spectrum> {
        let guard = match self.pixels.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (width, height) = (guard.0, guard.1);
        if x < 0 || y < 0 || x >= width || y >= height {
            return None;
        }
        guard.2.get((x + y * width) as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_are_clipped_to_image() {
        let buffer = PixelBuffer::default();
        buffer.resize(4, 3);
        let red = Spectrum::rgb(1.0, 0.0, 0.0);
        buffer.write_region(2, 1, 4, 4, &vec![red; 16]);
        assert_eq!(buffer.get_pixel(3, 2), Some(red));
        assert_eq!(buffer.get_pixel(1, 1), Some(Spectrum::default()));
        assert_eq!(buffer.get_pixel(4, 0), None);
    }
}
