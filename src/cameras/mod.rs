//! **Cameras**
//!
//! - [PinholeCamera](pinhole/struct.PinholeCamera.html)

pub mod pinhole;
