//! Errors reported by the scene build and render phases.
//! Configuration mistakes are not errors: they are logged and replaced
//! by defaults.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LumenError {
    #[error("GI engine \"{0}\" failed to initialize")]
    GiEngineInit(String),
    #[error("{kind} photons: no lights found")]
    NoLights { kind: String },
    #[error("{kind} photons: total light power is zero")]
    NoPower { kind: String },
    #[error("{kind} photons: nothing to emit")]
    NoPhotons { kind: String },
    #[error("{kind} photon pass was cancelled")]
    Cancelled { kind: String },
    #[error("could not write image {filename}")]
    ImageOutput {
        filename: String,
        #[source]
        source: image::ImageError,
    },
}
