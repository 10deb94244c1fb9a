// lumen
use crate::core::filter::Filter;
use crate::core::lumen::Float;

/// Gaussian shifted down so it reaches zero at the edge of its
/// support.
#[derive(Debug, Default, Copy, Clone)]
pub struct GaussianFilter {
    pub size: Float,
    pub exp_edge: Float,
}

impl GaussianFilter {
    pub fn new(size: Float) -> Self {
        GaussianFilter {
            size,
            exp_edge: (-size * size).exp(),
        }
    }
    pub fn gaussian(&self, d: Float) -> Float {
        (-d * d).exp() - self.exp_edge
    }
}

impl Filter for GaussianFilter {
    fn get(&self, x: Float, y: Float) -> Float {
        self.gaussian(x) * self.gaussian(y)
    }
    fn get_size(&self) -> Float {
        self.size
    }
}
