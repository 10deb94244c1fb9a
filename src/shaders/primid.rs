// lumen
use crate::core::geometry::vec3_dot;
use crate::core::lumen::{Float, Spectrum};
use crate::core::shader::Shader;
use crate::core::shading::ShadingState;

/// Colors every primitive id differently, shaded by the facing ratio.
/// Useful as a shader override to check geometry.
#[derive(Debug, Default, Copy, Clone)]
pub struct PrimIdShader;

const BORDERS: [(Float, Float, Float); 6] = [
    (1.0, 0.0, 0.0),
    (0.0, 1.0, 0.0),
    (0.0, 0.0, 1.0),
    (1.0, 1.0, 0.0),
    (0.0, 1.0, 1.0),
    (1.0, 0.0, 1.0),
];

impl Shader for PrimIdShader {
    fn get_radiance(&self, state: &mut ShadingState) -> Spectrum {
        let f: Float = match state.normal() {
            Some(n) => vec3_dot(&state.ray().d, &n).abs(),
            None => 1.0,
        };
        let (r, g, b) = BORDERS[state.prim_id().rem_euclid(BORDERS.len() as i32) as usize];
        Spectrum::rgb(r, g, b) * f
    }
    fn scatter_photon(&self, _state: &mut ShadingState, _power: &Spectrum) {}
}
