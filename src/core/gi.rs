//! Global illumination engines supply indirect light to diffuse
//! surfaces. Engines are selected by the `gi.engine` option.

// std
use std::str::FromStr;
// others
use strum_macros::{Display, EnumString};
// lumen
use crate::core::lumen::Spectrum;
use crate::core::paramset::ParamSet;
use crate::core::scene::Scene;
use crate::core::shading::ShadingState;
use crate::gi::ambocc::AmbientOcclusionGiEngine;
use crate::gi::fake::FakeGiEngine;
use crate::gi::path::PathTracingGiEngine;

pub trait GiEngine: Send + Sync {
    /// Called once before rendering; returning `false` aborts the
    /// scene build.
    fn init(&mut self, scene: &dyn Scene) -> bool;
    /// Indirect diffuse irradiance arriving at the shading point.
    fn get_irradiance(&self, state: &mut ShadingState, diffuse_reflectance: &Spectrum) -> Spectrum;
    /// Indirect radiance leaving the shading point, used by glossy
    /// shaders.
    fn get_global_radiance(&self, state: &mut ShadingState) -> Spectrum;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString)]
pub enum GiEngineType {
    #[strum(serialize = "none", serialize = "null")]
    None,
    #[strum(serialize = "ambocc")]
    AmbientOcclusion,
    #[strum(serialize = "fake")]
    Fake,
    #[strum(serialize = "igi")]
    InstantGi,
    #[strum(serialize = "irr-cache")]
    IrradianceCache,
    #[strum(serialize = "path")]
    PathTracing,
}

pub fn make_gi_engine(ps: &ParamSet) -> Option<Box<dyn GiEngine>> {
    let name: String = ps.find_one_string("gi.engine", "none");
    match GiEngineType::from_str(&name) {
        Ok(GiEngineType::None) => None,
        Ok(GiEngineType::AmbientOcclusion) => Some(Box::new(AmbientOcclusionGiEngine::create(ps))),
        Ok(GiEngineType::Fake) => Some(Box::new(FakeGiEngine::create(ps))),
        Ok(GiEngineType::PathTracing) => Some(Box::new(PathTracingGiEngine::create(ps))),
        Ok(engine) => {
            log::warn!("GI engine \"{}\" ({:?}) is not supported - ignoring", name, engine);
            None
        }
        Err(_) => {
            log::warn!("unrecognized GI engine type \"{}\" - ignoring", name);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_for(name: &str) -> Option<Box<dyn GiEngine>> {
        let mut ps = ParamSet::default();
        ps.add_string("gi.engine", name);
        make_gi_engine(&ps)
    }

    #[test]
    fn known_engines_are_created() {
        assert!(engine_for("ambocc").is_some());
        assert!(engine_for("fake").is_some());
        assert!(engine_for("path").is_some());
    }

    #[test]
    fn unknown_or_unsupported_engines_disable_gi() {
        assert!(engine_for("none").is_none());
        assert!(engine_for("igi").is_none());
        assert!(engine_for("irr-cache").is_none());
        assert!(engine_for("photons-everywhere").is_none());
        assert!(make_gi_engine(&ParamSet::default()).is_none());
    }
}
