//! Image samplers turn camera samples into pixels.
//!
//! - [adaptive](adaptive/index.html): subpixel grid with adaptive
//!   refinement of quads whose corners disagree
//! - [bucket](bucket/index.html): multi-threaded bucket renderer
//!   built on the adaptive grid

pub mod adaptive;
pub mod bucket;
