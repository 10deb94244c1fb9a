//! Surface shaders compute outgoing radiance for camera paths and
//! scatter photons during the photon pass.

// std
use std::sync::Arc;
// lumen
use crate::core::lumen::Spectrum;
use crate::core::shading::ShadingState;

pub trait Shader: Send + Sync {
    fn get_radiance(&self, state: &mut ShadingState) -> Spectrum;
    fn scatter_photon(&self, state: &mut ShadingState, power: &Spectrum);
}

/// Identity of a shader object, stable for its lifetime.
pub fn shader_key(shader: &Arc<dyn Shader>) -> usize {
    Arc::as_ptr(shader) as *const () as usize
}
