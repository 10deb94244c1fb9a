// lumen
use crate::core::filter::Filter;
use crate::core::lumen::Float;

/// Cubic filter family parameterized by *B* and *C*; Catmull-Rom is
/// the member with *B = 0, C = 1/2*.
#[derive(Debug, Default, Copy, Clone)]
pub struct MitchellNetravali {
    size: Float,
    inv_radius: Float,
    b: Float,
    c: Float,
}

impl MitchellNetravali {
    pub fn new(size: Float, b: Float, c: Float) -> Self {
        MitchellNetravali {
            size,
            inv_radius: 1.0 / (size * 0.5),
            b,
            c,
        }
    }
    pub fn mitchell() -> Self {
        MitchellNetravali::new(4.0, 1.0 / 3.0, 1.0 / 3.0)
    }
    pub fn catmull_rom() -> Self {
        MitchellNetravali::new(4.0, 0.0, 0.5)
    }
    /// Support is *[-1, 1]*.
    pub fn mitchell_1d(&self, x: Float) -> Float {
        let fx = x.abs() * 2.0;
        if fx < 1.0 {
            ((12.0 - 9.0 * self.b - 6.0 * self.c) * fx * fx * fx
                + (-18.0 + 12.0 * self.b + 6.0 * self.c) * fx * fx
                + (6.0 - 2.0 * self.b))
                * (1.0 / 6.0)
        } else if fx < 2.0 {
            ((-self.b - 6.0 * self.c) * fx * fx * fx
                + (6.0 * self.b + 30.0 * self.c) * fx * fx
                + (-12.0 * self.b - 48.0 * self.c) * fx
                + (8.0 * self.b + 24.0 * self.c))
                * (1.0 / 6.0)
        } else {
            0.0
        }
    }
}

impl Filter for MitchellNetravali {
    fn get(&self, x: Float, y: Float) -> Float {
        self.mitchell_1d(x * self.inv_radius) * self.mitchell_1d(y * self.inv_radius)
    }
    fn get_size(&self) -> Float {
        self.size
    }
}
