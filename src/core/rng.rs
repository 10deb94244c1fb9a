//! Random Number Generator (PCG32). Only the random bucket order
//! draws from it; every other sample comes from the low discrepancy
//! sequences.

use hexf::*;

// lumen
use crate::core::lumen::Float;

pub const FLOAT_ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");
pub const PCG32_DEFAULT_STATE: u64 = 0x853c_49e6_748f_ea9b;
pub const PCG32_DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;
pub const PCG32_MULT: u64 = 0x5851_f42d_4c95_7f2d;

#[derive(Debug, Copy, Clone)]
pub struct Rng {
    state: u64,
    inc: u64,
}

impl Default for Rng {
    fn default() -> Self {
        Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl Rng {
    /// Generator positioned on stream *seq*.
    pub fn with_sequence(seq: u64) -> Self {
        let mut rng = Rng::default();
        rng.set_sequence(seq);
        rng
    }
    pub fn set_sequence(&mut self, initseq: u64) {
        self.state = 0_u64;
        self.inc = initseq.wrapping_shl(1) | 1;
        self.uniform_uint32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_uint32();
    }
    pub fn uniform_uint32(&mut self) -> u32 {
        let oldstate: u64 = self.state;
        self.state = oldstate.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted: u32 = (oldstate.wrapping_shr(18) ^ oldstate).wrapping_shr(27) as u32;
        let rot: u32 = oldstate.wrapping_shr(59) as u32;
        xorshifted.rotate_right(rot)
    }
    /// Uniform value in *[0, b)* without modulo bias.
    pub fn uniform_uint32_bounded(&mut self, b: u32) -> u32 {
        let threshold = b.wrapping_neg() % b;
        loop {
            let r = self.uniform_uint32();
            if r >= threshold {
                return r % b;
            }
        }
    }
    pub fn uniform_float(&mut self) -> Float {
        (self.uniform_uint32() as Float * hexf32!("0x1.0p-32") as Float)
            .min(FLOAT_ONE_MINUS_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_are_reproducible() {
        let mut a = Rng::with_sequence(7);
        let mut b = Rng::with_sequence(7);
        for _ in 0..16 {
            assert_eq!(a.uniform_uint32(), b.uniform_uint32());
        }
    }

    #[test]
    fn bounded_and_float_ranges() {
        let mut rng = Rng::default();
        for _ in 0..1000 {
            assert!(rng.uniform_uint32_bounded(10) < 10);
            let f = rng.uniform_float();
            assert!(f >= 0.0 && f < 1.0);
        }
    }
}
