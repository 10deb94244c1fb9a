//! What the image samplers ask of the rest of the renderer: one
//! shaded color per camera sample, plus the identity of what was hit
//! so adaptive refinement can detect edges.

// lumen
use crate::core::geometry::Vector3f;
use crate::core::interaction::IntersectionState;
use crate::core::lumen::{Float, Spectrum};

/// Shading result of one camera sample.
#[derive(Debug, Copy, Clone, Default)]
pub struct RadianceSample {
    pub result: Spectrum,
    /// Id of the instance hit.
    pub instance: Option<usize>,
    /// Identity of the shader that produced *result*.
    pub shader: Option<usize>,
    pub normal: Option<Vector3f>,
}

pub trait RadianceSource: Sync {
    /// Shade the camera ray through raster position *(rx, ry)*;
    /// `None` when no ray was generated or it missed everything.
    #[allow(clippy::too_many_arguments)]
    fn get_radiance(
        &self,
        istate: &mut IntersectionState,
        rx: Float,
        ry: Float,
        lens_u: f64,
        lens_v: f64,
        time: f64,
        i: i32,
    ) -> Option<RadianceSample>;
}
