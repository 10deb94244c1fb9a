//! Photon maps filled by the photon emission pass.

pub mod caustic;
