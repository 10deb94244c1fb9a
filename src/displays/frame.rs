// std
use std::sync::atomic::{AtomicUsize, Ordering};
// lumen
use crate::core::display::{Display, PixelBuffer};
use crate::core::lumen::Spectrum;

/// Keeps the image in memory and counts the calls it receives.
#[derive(Debug, Default)]
pub struct FrameDisplay {
    pub buffer: PixelBuffer,
    pub begins: AtomicUsize,
    pub prepares: AtomicUsize,
    pub updates: AtomicUsize,
    pub ends: AtomicUsize,
}

impl FrameDisplay {
    pub fn new() -> Self {
        FrameDisplay::default()
    }
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Spectrum> {
        self.buffer.get_pixel(x, y)
    }
    pub fn pixels(&self) -> Vec<Spectrum> {
        self.buffer.snapshot()
    }
}

impl Display for FrameDisplay {
    fn image_begin(&self, width: i32, height: i32, _bucket_size: i32) {
        self.begins.fetch_add(1, Ordering::SeqCst);
        self.buffer.resize(width, height);
    }
    fn image_prepare(&self, _x: i32, _y: i32, _w: i32, _h: i32, _id: usize) {
        self.prepares.fetch_add(1, Ordering::SeqCst);
    }
    fn image_update(&self, x: i32, y: i32, w: i32, h: i32, data: &[Spectrum]) {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.buffer.write_region(x, y, w, h, data);
    }
    fn image_end(&self) {
        self.ends.fetch_add(1, Ordering::SeqCst);
    }
}
