//! Camera contract: raster position plus lens and time samples to a
//! world space ray.

// lumen
use crate::core::geometry::Ray;
use crate::core::lumen::Float;

pub trait Camera: Send + Sync {
    /// *x* and *y* are continuous raster coordinates with *y* pointing
    /// up. Returns no ray for positions the lens cannot see.
    #[allow(clippy::too_many_arguments)]
    fn get_ray(
        &self,
        x: Float,
        y: Float,
        image_width: i32,
        image_height: i32,
        lens_u: f64,
        lens_v: f64,
        time: f64,
    ) -> Option<Ray>;
}
