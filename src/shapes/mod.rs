//! **Shapes**
//!
//! - [Sphere](sphere/struct.Sphere.html)
//! - [Plane](plane/struct.Plane.html)

pub mod plane;
pub mod sphere;
