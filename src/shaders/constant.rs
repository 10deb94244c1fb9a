// lumen
use crate::core::lumen::Spectrum;
use crate::core::shader::Shader;
use crate::core::shading::ShadingState;

/// Emits a fixed color and absorbs all photons.
#[derive(Debug, Copy, Clone)]
pub struct ConstantShader {
    pub c: Spectrum,
}

impl ConstantShader {
    pub fn new(c: Spectrum) -> Self {
        ConstantShader { c }
    }
}

impl Shader for ConstantShader {
    fn get_radiance(&self, _state: &mut ShadingState) -> Spectrum {
        self.c
    }
    fn scatter_photon(&self, _state: &mut ShadingState, _power: &Spectrum) {}
}
