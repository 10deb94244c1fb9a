// lumen
use crate::core::filter::Filter;
use crate::core::lumen::Float;

#[derive(Debug, Default, Copy, Clone)]
pub struct TriangleFilter {
    pub size: Float,
    pub inv_radius: Float,
}

impl TriangleFilter {
    pub fn new(size: Float) -> Self {
        TriangleFilter {
            size,
            inv_radius: 1.0 / (size * 0.5),
        }
    }
}

impl Filter for TriangleFilter {
    fn get(&self, x: Float, y: Float) -> Float {
        (0.0 as Float).max(1.0 - (x * self.inv_radius).abs())
            * (0.0 as Float).max(1.0 - (y * self.inv_radius).abs())
    }
    fn get_size(&self) -> Float {
        self.size
    }
}
