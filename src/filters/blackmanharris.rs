// lumen
use crate::core::filter::Filter;
use crate::core::lumen::{Float, PI};

#[derive(Debug, Default, Copy, Clone)]
pub struct BlackmanHarrisFilter {
    pub size: Float,
    pub inv_radius: Float,
}

impl BlackmanHarrisFilter {
    pub fn new(size: Float) -> Self {
        BlackmanHarrisFilter {
            size,
            inv_radius: 1.0 / (size * 0.5),
        }
    }
    /// Four term window over *[-1, 1]*.
    pub fn bh_1d(x: Float) -> Float {
        if x < -1.0 || x > 1.0 {
            return 0.0;
        }
        let x = (x + 1.0) * 0.5;
        let a0: Float = 0.358_75;
        let a1: Float = -0.488_29;
        let a2: Float = 0.141_28;
        let a3: Float = -0.011_68;
        a0 + a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos() + a3 * (6.0 * PI * x).cos()
    }
}

impl Filter for BlackmanHarrisFilter {
    fn get(&self, x: Float, y: Float) -> Float {
        BlackmanHarrisFilter::bh_1d(x * self.inv_radius) * BlackmanHarrisFilter::bh_1d(y * self.inv_radius)
    }
    fn get_size(&self) -> Float {
        self.size
    }
}
