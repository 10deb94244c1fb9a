// lumen
use crate::core::filter::Filter;
use crate::core::lumen::{Float, PI};

fn sinc_1d(x: Float) -> Float {
    let x = x.abs();
    if x < 1e-4 {
        return 1.0;
    }
    let px = x * PI;
    px.sin() / px
}

/// Plain (unwindowed) sinc, cut off at the edge of its support.
#[derive(Debug, Default, Copy, Clone)]
pub struct SincFilter {
    pub size: Float,
}

impl SincFilter {
    pub fn new(size: Float) -> Self {
        SincFilter { size }
    }
}

impl Filter for SincFilter {
    fn get(&self, x: Float, y: Float) -> Float {
        sinc_1d(x) * sinc_1d(y)
    }
    fn get_size(&self) -> Float {
        self.size
    }
}

/// Sinc windowed by a wider sinc (*tau = 2*), support of four pixels.
#[derive(Debug, Copy, Clone)]
pub struct LanczosFilter {
    pub size: Float,
    pub tau: Float,
}

impl LanczosFilter {
    pub fn new() -> Self {
        LanczosFilter {
            size: 4.0,
            tau: 2.0,
        }
    }
    pub fn windowed_sinc(&self, x: Float) -> Float {
        let x = x.abs();
        if x > self.size * 0.5 {
            return 0.0;
        }
        sinc_1d(x) * sinc_1d(x / self.tau)
    }
}

impl Default for LanczosFilter {
    fn default() -> Self {
        LanczosFilter::new()
    }
}

impl Filter for LanczosFilter {
    fn get(&self, x: Float, y: Float) -> Float {
        self.windowed_sinc(x) * self.windowed_sinc(y)
    }
    fn get_size(&self) -> Float {
        self.size
    }
}
