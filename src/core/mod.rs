//! Shared machinery used by all plug-in families.

pub mod camera;
pub mod display;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod gi;
pub mod instance;
pub mod interaction;
pub mod light;
pub mod lightserver;
pub mod lowdiscrepancy;
pub mod lumen;
pub mod parallel;
pub mod paramset;
pub mod photon;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod shader;
pub mod shading;
pub mod shadingcache;
pub mod shape;
pub mod spectrum;
pub mod world;
