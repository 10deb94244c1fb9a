//! A fully assembled scene: camera, light server and output settings.
//! The world is the radiance source the bucket renderer samples.

// std
use std::sync::Arc;
// lumen
use crate::core::camera::Camera;
use crate::core::display::Display;
use crate::core::error::LumenError;
use crate::core::geometry::Ray;
use crate::core::interaction::IntersectionState;
use crate::core::lightserver::LightServer;
use crate::core::lumen::Float;
use crate::core::parallel::{num_worker_threads, CancelFlag};
use crate::core::paramset::ParamSet;
use crate::core::sampler::{RadianceSample, RadianceSource};
use crate::samplers::bucket::BucketRenderer;

pub struct World {
    pub camera: Arc<dyn Camera>,
    pub light_server: LightServer,
    image_width: i32,
    image_height: i32,
    threads: usize,
    built: bool,
}

impl World {
    pub fn new(camera: Arc<dyn Camera>, light_server: LightServer, image_width: i32, image_height: i32) -> Self {
        World {
            camera,
            light_server,
            image_width: image_width.max(1),
            image_height: image_height.max(1),
            threads: num_worker_threads(0),
            built: false,
        }
    }
    pub fn image_size(&self) -> (i32, i32) {
        (self.image_width, self.image_height)
    }
    pub fn threads(&self) -> usize {
        self.threads
    }
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Read the thread count and build the light server, including the
    /// caustic photon pass.
    pub fn build(&mut self, options: &ParamSet, cancel: &CancelFlag) -> Result<(), LumenError> {
        self.built = false;
        self.threads = num_worker_threads(options.find_one_int("threads", 0).max(0) as usize);
        self.light_server.set_threads(self.threads);
        self.light_server.build(options, cancel)?;
        self.built = true;
        Ok(())
    }

    /// Render into *display*, building first if needed. Cancellation
    /// is not an error: the display still sees exactly one
    /// `image_end`.
    pub fn render(&mut self, options: &ParamSet, display: &dyn Display, cancel: &CancelFlag) -> Result<(), LumenError> {
        if !self.built {
            self.build(options, cancel)?;
        }
        let mut renderer: BucketRenderer = BucketRenderer::new();
        renderer.prepare(options, self.image_width, self.image_height);
        renderer.render(&*self, display, self.threads, cancel);
        self.light_server.show_stats();
        Ok(())
    }
}

impl RadianceSource for World {
    fn get_radiance(
        &self,
        istate: &mut IntersectionState,
        rx: Float,
        ry: Float,
        lens_u: f64,
        lens_v: f64,
        time: f64,
        i: i32,
    ) -> Option<RadianceSample> {
        let r: Ray = self.camera.get_ray(
            rx,
            ry,
            self.image_width,
            self.image_height,
            lens_u,
            lens_v,
            time,
        )?;
        self.light_server.get_radiance(rx, ry, i, r, istate)
    }
}
