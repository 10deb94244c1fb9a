//! **Lights**
//!
//! - [PointLight](point/struct.PointLight.html)

pub mod point;
