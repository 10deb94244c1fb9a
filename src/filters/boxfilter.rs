// lumen
use crate::core::filter::Filter;
use crate::core::lumen::Float;

/// Every sample inside the support counts the same.
#[derive(Debug, Default, Copy, Clone)]
pub struct BoxFilter {
    pub size: Float,
}

impl BoxFilter {
    pub fn new(size: Float) -> Self {
        BoxFilter { size }
    }
}

impl Filter for BoxFilter {
    fn get(&self, _x: Float, _y: Float) -> Float {
        1.0 as Float
    }
    fn get_size(&self) -> Float {
        self.size
    }
}
