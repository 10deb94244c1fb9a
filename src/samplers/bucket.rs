//! Bucket renderer: the image is cut into square buckets which a fixed
//! pool of threads claims one at a time. Each bucket gets its own
//! padded subpixel grid, is refined adaptively and then filtered into
//! pixels that are handed to the display.

// std
use std::sync::{Arc, Mutex};
use std::time::Instant;
// lumen
use crate::blockqueue::order::BucketOrder;
use crate::blockqueue::{Bucket, BucketQueue};
use crate::core::display::Display;
use crate::core::filter::{make_filter, Filter};
use crate::core::interaction::IntersectionState;
use crate::core::lowdiscrepancy::generate_sigma_table;
use crate::core::lumen::{clamp_t, Float, Spectrum};
use crate::core::parallel::{lock_or_recover, num_worker_threads, CancelFlag, ProgressReporter};
use crate::core::paramset::ParamSet;
use crate::core::sampler::RadianceSource;
use crate::samplers::adaptive::{AdaptiveRefiner, SampleGrid};

pub struct BucketRenderer {
    // options
    image_width: i32,
    image_height: i32,
    bucket_size: i32,
    bucket_order: BucketOrder,
    min_aa_depth: i32,
    max_aa_depth: i32,
    super_sampling: i32,
    contrast_threshold: Float,
    jitter: bool,
    display_aa: bool,
    filter_name: String,
    // derived in prepare
    filter: Arc<dyn Filter + Send + Sync>,
    sub_pixel_size: i32,
    min_step_size: i32,
    max_step_size: i32,
    thresh: Float,
    use_jitter: bool,
    fhs: Float,
    fs: i32,
    sigma: Vec<u32>,
}

impl Default for BucketRenderer {
    fn default() -> Self {
        BucketRenderer {
            image_width: 640,
            image_height: 480,
            bucket_size: 32,
            bucket_order: BucketOrder::from_name("hilbert"),
            min_aa_depth: 0,
            max_aa_depth: 0,
            super_sampling: 1,
            contrast_threshold: 0.1,
            jitter: false,
            display_aa: false,
            filter_name: String::from("box"),
            filter: make_filter("box"),
            sub_pixel_size: 1,
            min_step_size: 1,
            max_step_size: 1,
            thresh: 0.1,
            use_jitter: false,
            fhs: 0.5,
            fs: 0,
            sigma: generate_sigma_table(1 << 7),
        }
    }
}

impl BucketRenderer {
    pub fn new() -> Self {
        BucketRenderer::default()
    }

    /// Read and clamp the sampling options for an image of *width* by
    /// *height* pixels.
    pub fn prepare(&mut self, options: &ParamSet, width: i32, height: i32) {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self.bucket_size = clamp_t(options.find_one_int("bucket.size", self.bucket_size), 16, 512);
        self.bucket_order = BucketOrder::from_name(&options.find_one_string("bucket.order", "hilbert"));
        self.min_aa_depth = clamp_t(options.find_one_int("aa.min", self.min_aa_depth), -4, 5);
        self.max_aa_depth = clamp_t(
            options.find_one_int("aa.max", self.max_aa_depth),
            self.min_aa_depth,
            5,
        );
        self.super_sampling = clamp_t(options.find_one_int("aa.samples", self.super_sampling), 1, 256);
        self.display_aa = options.find_one_bool("aa.display", self.display_aa);
        self.jitter = options.find_one_bool("aa.jitter", self.jitter);
        self.contrast_threshold = clamp_t(
            options.find_one_float("aa.contrast", self.contrast_threshold),
            0.0,
            1.0,
        );
        self.filter_name = options.find_one_string("filter", &self.filter_name);
        self.filter = make_filter(&self.filter_name);
        // derived values
        self.sub_pixel_size = if self.max_aa_depth > 0 {
            1 << self.max_aa_depth
        } else {
            1
        };
        self.min_step_size = if self.max_aa_depth >= 0 {
            1
        } else {
            1 << (-self.max_aa_depth)
        };
        self.max_step_size = if self.min_aa_depth == self.max_aa_depth {
            self.min_step_size
        } else if self.min_aa_depth > 0 {
            1 << self.min_aa_depth
        } else {
            self.sub_pixel_size << (-self.min_aa_depth)
        };
        self.use_jitter = self.jitter && self.max_aa_depth > 0;
        self.thresh = self.contrast_threshold * (2.0 as Float).powi(self.min_aa_depth);
        self.fhs = self.filter.get_size() * 0.5;
        self.fs = (self.sub_pixel_size as Float * (self.fhs - 0.5)).ceil().max(0.0) as i32;
        self.sigma = generate_sigma_table((self.sub_pixel_size << 7) as usize);
        let samples_per_pixel = |depth: i32| -> String {
            if depth <= 0 {
                format!("1 sample per {} pixels", 1 << (-2 * depth))
            } else {
                format!("{} samples per pixel", 1 << (2 * depth))
            }
        };
        log::info!("bucket renderer settings:");
        log::info!("  * resolution:         {}x{}", self.image_width, self.image_height);
        log::info!("  * bucket size:        {}", self.bucket_size);
        log::info!("  * bucket order:       {:?}", self.bucket_order);
        log::info!(
            "  * AA depth:           [{}, {}] ({} to {})",
            self.min_aa_depth,
            self.max_aa_depth,
            samples_per_pixel(self.min_aa_depth),
            samples_per_pixel(self.max_aa_depth)
        );
        if self.super_sampling > 1 {
            log::info!("  * AA samples:         {}", self.super_sampling);
        }
        log::info!("  * subpixel size:      {}", self.sub_pixel_size);
        log::info!(
            "  * step sizes:         [{}, {}]",
            self.min_step_size,
            self.max_step_size
        );
        log::info!("  * contrast threshold: {:.2}", self.contrast_threshold);
        log::info!("  * jitter:             {}", self.use_jitter);
        log::info!("  * filter:             {} ({:.2} px)", self.filter_name, self.filter.get_size());
    }

    pub fn image_size(&self) -> (i32, i32) {
        (self.image_width, self.image_height)
    }
    pub fn bucket_size(&self) -> i32 {
        self.bucket_size
    }
    pub fn sub_pixel_size(&self) -> i32 {
        self.sub_pixel_size
    }
    /// Smallest and largest refinement step in subpixels.
    pub fn step_sizes(&self) -> (i32, i32) {
        (self.min_step_size, self.max_step_size)
    }
    pub fn threshold(&self) -> Float {
        self.thresh
    }
    pub fn uses_jitter(&self) -> bool {
        self.use_jitter
    }
    pub fn filter_support(&self) -> (Float, i32) {
        (self.fhs, self.fs)
    }

    /// Render all buckets with *threads* workers (0 = one per CPU).
    /// Stops early when *cancel* is set; the display is finished
    /// exactly once either way.
    pub fn render<S: RadianceSource + ?Sized>(
        &self,
        source: &S,
        display: &dyn Display,
        threads: usize,
        cancel: &CancelFlag,
    ) {
        let num_threads: usize = num_worker_threads(threads);
        let queue: BucketQueue = BucketQueue::new(
            self.image_width as u32,
            self.image_height as u32,
            self.bucket_size as u32,
            &self.bucket_order,
        );
        display.image_begin(self.image_width, self.image_height, self.bucket_size);
        log::info!(
            "rendering {} buckets with {} thread(s) ...",
            queue.len(),
            num_threads
        );
        let start = Instant::now();
        let progress: Mutex<ProgressReporter> =
            Mutex::new(ProgressReporter::new(queue.len() as u64, "Rendering"));
        {
            let queue = &queue;
            let progress = &progress;
            let scope_result = crossbeam::scope(|scope| {
                let mut handles = Vec::with_capacity(num_threads);
                for thread_id in 0..num_threads {
                    handles.push(scope.spawn(move |_| {
                        let mut istate: IntersectionState = IntersectionState::new();
                        while let Some(bucket) = queue.claim(cancel) {
                            self.render_bucket(display, &bucket, thread_id, source, &mut istate);
                            let claimed: usize = queue.claimed();
                            lock_or_recover(progress).update(claimed as u64);
                            if cancel.is_cancelled() {
                                return;
                            }
                        }
                    }));
                }
                for (t, handle) in handles.into_iter().enumerate() {
                    if handle.join().is_err() {
                        log::error!(
                            "bucket processing thread {} of {} was interrupted",
                            t + 1,
                            num_threads
                        );
                    }
                }
            });
            if scope_result.is_err() {
                log::error!("bucket processing threads panicked");
            }
        }
        lock_or_recover(&progress).finish();
        if cancel.is_cancelled() {
            log::warn!("rendering cancelled after {} buckets", queue.claimed());
        }
        log::info!("render time: {:.3}s", start.elapsed().as_secs_f64());
        display.image_end();
    }

    fn render_bucket<S: RadianceSource + ?Sized>(
        &self,
        display: &dyn Display,
        bucket: &Bucket,
        thread_id: usize,
        source: &S,
        istate: &mut IntersectionState,
    ) {
        let sps: i32 = self.sub_pixel_size;
        // pixel extents
        let x0: i32 = bucket.bx as i32 * self.bucket_size;
        let y0: i32 = bucket.by as i32 * self.bucket_size;
        let bw: i32 = self.bucket_size.min(self.image_width - x0);
        let bh: i32 = self.bucket_size.min(self.image_height - y0);
        display.image_prepare(x0, y0, bw, bh, thread_id);
        // subpixel extents
        let sx0: i32 = x0 * sps - self.fs;
        let sy0: i32 = y0 * sps - self.fs;
        let mut sbw: i32 = bw * sps + self.fs * 2;
        let mut sbh: i32 = bh * sps + self.fs * 2;
        // align with the largest step, plus the closing row and column
        sbw = (sbw + (self.max_step_size - 1)) & !(self.max_step_size - 1);
        sbh = (sbh + (self.max_step_size - 1)) & !(self.max_step_size - 1);
        if self.max_step_size > 1 {
            sbw += 1;
            sbh += 1;
        }
        let mut grid: SampleGrid = SampleGrid::new(
            sx0,
            sy0,
            sbw as usize,
            sbh as usize,
            sps,
            &self.sigma,
            self.use_jitter,
            self.image_height,
        );
        let refiner: AdaptiveRefiner =
            AdaptiveRefiner::new(self.min_step_size as usize, self.super_sampling);
        let step: usize = self.max_step_size as usize;
        for x in (0..(sbw - 1) as usize).step_by(step) {
            for y in (0..(sbh - 1) as usize).step_by(step) {
                refiner.refine(&mut grid, x, y, step, self.thresh, source, istate);
            }
        }
        let colors: Vec<Spectrum> = if self.display_aa {
            self.sampled_fraction(&grid, bw, bh)
        } else {
            self.filter_pixels(&grid, x0, y0, bw, bh)
        };
        display.image_update(x0, y0, bw, bh, &colors);
    }

    /// Weighted sum of all samples inside the filter support of each
    /// pixel center.
    fn filter_pixels(&self, grid: &SampleGrid, x0: i32, y0: i32, bw: i32, bh: i32) -> Vec<Spectrum> {
        let sps: i32 = self.sub_pixel_size;
        let span: i32 = sps + 2 * self.fs;
        let mut colors: Vec<Spectrum> = Vec::with_capacity((bw * bh) as usize);
        for y in 0..bh {
            let cy: Float = self.image_height as Float - 1.0 - (y0 + y) as Float - 0.5;
            for x in 0..bw {
                let cx: Float = (x0 + x) as Float + 0.5;
                let mut c: Spectrum = Spectrum::default();
                let mut weight: Float = 0.0;
                for sy in (y * sps)..(y * sps + span) {
                    for sx in (x * sps)..(x * sps + span) {
                        let sample = grid.get(sx as usize, sy as usize);
                        let dx: Float = sample.rx - cx;
                        if dx.abs() > self.fhs {
                            continue;
                        }
                        let dy: Float = sample.ry - cy;
                        if dy.abs() > self.fhs {
                            continue;
                        }
                        let f: Float = self.filter.get(dx, dy);
                        c.madd(f, &sample.color());
                        weight += f;
                    }
                }
                if weight != 0.0 as Float {
                    c = c * (1.0 as Float / weight);
                }
                colors.push(c);
            }
        }
        colors
    }

    /// Pixels colored by the share of their subpixels that were shaded,
    /// blue for none up to red for all.
    fn sampled_fraction(&self, grid: &SampleGrid, bw: i32, bh: i32) -> Vec<Spectrum> {
        let sps: i32 = self.sub_pixel_size;
        let inv_area: Float = 1.0 as Float / (sps * sps) as Float;
        let none: Spectrum = Spectrum::rgb(0.0, 0.0, 1.0);
        let all: Spectrum = Spectrum::rgb(1.0, 0.0, 0.0);
        let mut colors: Vec<Spectrum> = Vec::with_capacity((bw * bh) as usize);
        for y in 0..bh {
            for x in 0..bw {
                let mut sampled: i32 = 0;
                for i in 0..sps {
                    for j in 0..sps {
                        let sx: usize = (x * sps + self.fs + i) as usize;
                        let sy: usize = (y * sps + self.fs + j) as usize;
                        if grid.get(sx, sy).sampled() {
                            sampled += 1;
                        }
                    }
                }
                colors.push(Spectrum::blend(&none, &all, sampled as Float * inv_area));
            }
        }
        colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(options: &[(&str, i32)], filter: &str) -> BucketRenderer {
        let mut ps = ParamSet::default();
        for (name, value) in options {
            ps.add_int(name, *value);
        }
        ps.add_string("filter", filter);
        let mut renderer = BucketRenderer::new();
        renderer.prepare(&ps, 100, 50);
        renderer
    }

    #[test]
    fn options_are_clamped() {
        let r = prepared(&[("bucket.size", 4), ("aa.min", -9), ("aa.max", 12), ("aa.samples", 1000)], "box");
        assert_eq!(r.bucket_size(), 16);
        assert_eq!(r.min_aa_depth, -4);
        assert_eq!(r.max_aa_depth, 5);
        assert_eq!(r.super_sampling, 256);
        let r = prepared(&[("bucket.size", 4096), ("aa.min", 2), ("aa.max", 1)], "box");
        assert_eq!(r.bucket_size(), 512);
        assert_eq!(r.max_aa_depth, 2);
    }

    #[test]
    fn step_sizes_follow_aa_depths() {
        let r = prepared(&[("aa.min", 0), ("aa.max", 2)], "box");
        assert_eq!(r.sub_pixel_size(), 4);
        assert_eq!(r.step_sizes(), (1, 4));
        let r = prepared(&[("aa.min", -2), ("aa.max", 0)], "box");
        assert_eq!(r.sub_pixel_size(), 1);
        assert_eq!(r.step_sizes(), (1, 4));
        let r = prepared(&[("aa.min", -2), ("aa.max", -1)], "box");
        assert_eq!(r.step_sizes(), (2, 4));
        let r = prepared(&[("aa.min", 1), ("aa.max", 1)], "box");
        assert_eq!(r.step_sizes(), (1, 1));
        assert!((r.threshold() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn jitter_needs_subpixels() {
        let mut ps = ParamSet::default();
        ps.add_bool("aa.jitter", true);
        let mut r = BucketRenderer::new();
        r.prepare(&ps, 64, 64);
        assert!(!r.uses_jitter());
        ps.add_int("aa.max", 1);
        r.prepare(&ps, 64, 64);
        assert!(r.uses_jitter());
    }

    #[test]
    fn filter_padding() {
        let r = prepared(&[("aa.max", 2)], "gaussian");
        // half width 1.5 over 4 subpixels per pixel
        assert_eq!(r.filter_support(), (1.5, 4));
        let r = prepared(&[], "no-such-filter");
        assert_eq!(r.filter_support(), (0.5, 0));
    }
}
