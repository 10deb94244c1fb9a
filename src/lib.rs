//! # lumen
//!
//! Bucket based adaptive anti-aliasing renderer core. The main render
//! loop lives in [BucketRenderer::render][render]; every camera sample
//! is shaded by the [LightServer][server], which also drives the
//! caustic photon pass and the global illumination engines.
//!
//! A scene is assembled into a [World][world] from a camera, a scene
//! (instances behind an accelerator) and light sources, configured
//! through a [ParamSet][paramset] and rendered into a display.
//!
//! [render]: samplers/bucket/struct.BucketRenderer.html#method.render
//! [server]: core/lightserver/struct.LightServer.html
//! [world]: core/world/struct.World.html
//! [paramset]: core/paramset/struct.ParamSet.html

#[macro_use]
extern crate impl_ops;

pub mod accelerators;
pub mod blockqueue;
pub mod cameras;
pub mod core;
pub mod displays;
pub mod filters;
pub mod gi;
pub mod lights;
pub mod photons;
pub mod samplers;
pub mod shaders;
pub mod shapes;
