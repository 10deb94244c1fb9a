//! Adaptive anti-aliasing on a bucket's subpixel grid.
//!
//! Quads of grid points are shaded at their corners first. A quad
//! whose corners disagree (different instance or shader, contrasting
//! colors, diverging normals) is split into four children with half
//! the step and twice the threshold; otherwise the points inside are
//! filled by bilinear interpolation without shading.

// lumen
use crate::core::geometry::{vec3_dot, Vector3f};
use crate::core::interaction::IntersectionState;
use crate::core::lowdiscrepancy::{halton, mod1};
use crate::core::lumen::{Float, Spectrum};
use crate::core::sampler::{RadianceSample, RadianceSource};

/// Normals must agree at least this much for two samples to be
/// considered the same surface.
pub const NORMAL_THRESHOLD: Float = 0.9;

/// One point of the subpixel grid.
#[derive(Debug, Copy, Clone)]
pub struct ImageSample {
    /// Raster position, *y* pointing up.
    pub rx: Float,
    pub ry: Float,
    /// Index into the QMC sequences.
    pub i: i32,
    /// Number of camera samples shaded for this point, 0 while
    /// unresolved.
    pub n: i32,
    /// Set once shaded or interpolated.
    pub c: Option<Spectrum>,
    pub instance: Option<usize>,
    pub shader: Option<usize>,
    pub normal: Vector3f,
}

impl ImageSample {
    pub fn new(rx: Float, ry: Float, i: i32) -> Self {
        ImageSample {
            rx,
            ry,
            i,
            n: 0,
            c: None,
            instance: None,
            shader: None,
            normal: Vector3f::new(1.0, 1.0, 1.0),
        }
    }
    fn set_identity(&mut self, sample: &RadianceSample) {
        self.instance = sample.instance;
        self.shader = sample.shader;
        if let Some(n) = sample.normal {
            self.normal = n;
        }
    }
    /// Store a single shading result; a miss leaves black.
    pub fn set(&mut self, sample: Option<RadianceSample>) {
        match sample {
            Some(sample) => {
                self.c = Some(sample.result);
                self.check_nan_inf();
                self.set_identity(&sample);
            }
            None => self.c = Some(Spectrum::default()),
        }
        self.n = 1;
    }
    /// Accumulate one of several shading results; misses count as
    /// black. The last hit provides the identity used for edge tests.
    pub fn add(&mut self, sample: Option<RadianceSample>) {
        if self.n == 0 {
            self.c = Some(Spectrum::default());
        }
        if let Some(sample) = sample {
            self.c = Some(self.c.unwrap_or_default() + sample.result);
            self.check_nan_inf();
            self.set_identity(&sample);
        }
        self.n += 1;
    }
    pub fn scale(&mut self, s: Float) {
        if let Some(c) = self.c {
            self.c = Some(c * s);
        }
    }
    fn check_nan_inf(&self) {
        if let Some(c) = self.c {
            if c.has_nans() {
                log::error!("NaN shading sample at ({}, {})", self.rx, self.ry);
            } else if c.has_infs() {
                log::error!("Inf shading sample at ({}, {})", self.rx, self.ry);
            }
        }
    }
    /// Has a color, shaded or interpolated.
    pub fn processed(&self) -> bool {
        self.c.is_some()
    }
    /// Was actually shaded.
    pub fn sampled(&self) -> bool {
        self.n > 0
    }
    pub fn color(&self) -> Spectrum {
        self.c.unwrap_or_default()
    }
    pub fn is_different(&self, other: &ImageSample, thresh: Float) -> bool {
        if self.instance != other.instance || self.shader != other.shader {
            return true;
        }
        if Spectrum::has_contrast(&self.color(), &other.color(), thresh) {
            return true;
        }
        vec3_dot(&self.normal, &other.normal) < NORMAL_THRESHOLD
    }
}

/// Bilinear blend of four corner colors, *dx* runs from *c00* to *c10*
/// and *dy* from *c00* to *c01*.
pub fn bilerp(
    c00: &Spectrum,
    c01: &Spectrum,
    c10: &Spectrum,
    c11: &Spectrum,
    dx: Float,
    dy: Float,
) -> Spectrum {
    let k00: Float = (1.0 as Float - dx) * (1.0 as Float - dy);
    let k01: Float = (1.0 as Float - dx) * dy;
    let k10: Float = dx * (1.0 as Float - dy);
    let k11: Float = dx * dy;
    let mut c: Spectrum = *c00 * k00;
    c.madd(k01, c01);
    c.madd(k10, c10);
    c.madd(k11, c11);
    c
}

/// Padded subpixel grid of one bucket, row major with *y* growing
/// down the image.
pub struct SampleGrid {
    pub width: usize,
    pub height: usize,
    pub samples: Vec<ImageSample>,
}

impl SampleGrid {
    /// Grid of *width* by *height* points whose first point is subpixel
    /// *(sx0, sy0)*. Jitter offsets and QMC indices come from the
    /// bit-reversal table *sigma*.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sx0: i32,
        sy0: i32,
        width: usize,
        height: usize,
        sub_pixel_size: i32,
        sigma: &[u32],
        use_jitter: bool,
        image_height: i32,
    ) -> SampleGrid {
        let len: i32 = sigma.len() as i32;
        let inv_sub_pixel_size: Float = 1.0 as Float / sub_pixel_size as Float;
        let mut samples: Vec<ImageSample> = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let sx: i32 = sx0 + x;
                let sy: i32 = sy0 + y;
                let j: i32 = sx & (len - 1);
                let k: i32 = sy & (len - 1);
                let sigma_j: u32 = sigma[j as usize];
                let sigma_k: u32 = sigma[k as usize];
                let i: i32 = j.wrapping_mul(len).wrapping_add(sigma_k as i32);
                let (dx, dy): (Float, Float) = if use_jitter {
                    (sigma_k as Float / len as Float, sigma_j as Float / len as Float)
                } else {
                    (0.5, 0.5)
                };
                let rx: Float = (sx as Float + dx) * inv_sub_pixel_size;
                let ry: Float = image_height as Float - (sy as Float + dy) * inv_sub_pixel_size - 1.0;
                samples.push(ImageSample::new(rx, ry, i));
            }
        }
        SampleGrid {
            width,
            height,
            samples,
        }
    }
    pub fn get(&self, x: usize, y: usize) -> &ImageSample {
        &self.samples[x + y * self.width]
    }
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut ImageSample {
        &mut self.samples[x + y * self.width]
    }
}

/// Shades and refines the quads of a [SampleGrid](struct.SampleGrid.html).
#[derive(Debug, Copy, Clone)]
pub struct AdaptiveRefiner {
    pub min_step_size: usize,
    pub super_sampling: i32,
}

impl AdaptiveRefiner {
    pub fn new(min_step_size: usize, super_sampling: i32) -> Self {
        AdaptiveRefiner {
            min_step_size: min_step_size.max(1),
            super_sampling: super_sampling.max(1),
        }
    }

    /// Shade one grid point, averaging `super_sampling` camera samples.
    pub fn compute_sub_pixel<S: RadianceSource + ?Sized>(
        &self,
        sample: &mut ImageSample,
        source: &S,
        istate: &mut IntersectionState,
    ) {
        let (x, y) = (sample.rx, sample.ry);
        let qi: u32 = sample.i as u32;
        let q0: f64 = halton(1, qi);
        let q1: f64 = halton(2, qi);
        let q2: f64 = halton(3, qi);
        if self.super_sampling > 1 {
            let inv: f64 = 1.0 / self.super_sampling as f64;
            sample.add(source.get_radiance(istate, x, y, q1, q2, q0, sample.i));
            for k in 1..self.super_sampling {
                let time: f64 = mod1(q0 + k as f64 * inv);
                let lens_u: f64 = mod1(q1 + halton(0, k as u32));
                let lens_v: f64 = mod1(q2 + halton(1, k as u32));
                sample.add(source.get_radiance(
                    istate,
                    x,
                    y,
                    lens_u,
                    lens_v,
                    time,
                    sample.i.wrapping_add(k),
                ));
            }
            sample.scale(inv as Float);
        } else {
            sample.set(source.get_radiance(istate, x, y, q1, q2, q0, sample.i));
        }
    }

    /// Resolve the quad with corner *(x, y)* and size *step*, either by
    /// recursing into four children or by interpolating its interior.
    #[allow(clippy::too_many_arguments)]
    pub fn refine<S: RadianceSource + ?Sized>(
        &self,
        grid: &mut SampleGrid,
        x: usize,
        y: usize,
        step: usize,
        thresh: Float,
        source: &S,
        istate: &mut IntersectionState,
    ) {
        let corners: [(usize, usize); 4] = [(x, y), (x, y + step), (x + step, y), (x + step, y + step)];
        for &(cx, cy) in corners.iter() {
            let sample: &mut ImageSample = grid.get_mut(cx, cy);
            if !sample.sampled() {
                self.compute_sub_pixel(sample, source, istate);
            }
        }
        let s00: ImageSample = *grid.get(x, y);
        let s01: ImageSample = *grid.get(x, y + step);
        let s10: ImageSample = *grid.get(x + step, y);
        let s11: ImageSample = *grid.get(x + step, y + step);
        if step > self.min_step_size
            && (s00.is_different(&s01, thresh)
                || s00.is_different(&s10, thresh)
                || s00.is_different(&s11, thresh)
                || s01.is_different(&s11, thresh)
                || s10.is_different(&s11, thresh)
                || s01.is_different(&s10, thresh))
        {
            let half: usize = step >> 1;
            let thresh: Float = thresh * 2.0;
            self.refine(grid, x, y, half, thresh, source, istate);
            self.refine(grid, x + half, y, half, thresh, source, istate);
            self.refine(grid, x, y + half, half, thresh, source, istate);
            self.refine(grid, x + half, y + half, half, thresh, source, istate);
            return;
        }
        let (c00, c01, c10, c11) = (s00.color(), s01.color(), s10.color(), s11.color());
        let ds: Float = 1.0 as Float / step as Float;
        for i in 0..=step {
            for j in 0..=step {
                let sample: &mut ImageSample = grid.get_mut(x + i, y + j);
                if !sample.processed() {
                    sample.c = Some(bilerp(
                        &c00,
                        &c01,
                        &c10,
                        &c11,
                        i as Float * ds,
                        j as Float * ds,
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lowdiscrepancy::generate_sigma_table;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Colors grow with raster x; everything right of *edge* belongs
    /// to a second instance.
    struct RampSource {
        edge: Float,
        calls: AtomicUsize,
    }

    impl RadianceSource for RampSource {
        fn get_radiance(
            &self,
            _istate: &mut IntersectionState,
            rx: Float,
            _ry: Float,
            _lens_u: f64,
            _lens_v: f64,
            _time: f64,
            _i: i32,
        ) -> Option<RadianceSample> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(RadianceSample {
                result: Spectrum::new(1.0 + 0.001 * rx),
                instance: Some(if rx > self.edge { 2 } else { 1 }),
                shader: Some(7),
                normal: Some(Vector3f::new(0.0, 0.0, 1.0)),
            })
        }
    }

    struct MissSource;

    impl RadianceSource for MissSource {
        fn get_radiance(
            &self,
            _istate: &mut IntersectionState,
            _rx: Float,
            _ry: Float,
            _lens_u: f64,
            _lens_v: f64,
            _time: f64,
            _i: i32,
        ) -> Option<RadianceSample> {
            None
        }
    }

    fn grid(size: usize) -> SampleGrid {
        let sigma = generate_sigma_table(1 << 7);
        SampleGrid::new(0, 0, size, size, 1, &sigma, false, 64)
    }

    #[test]
    fn smooth_quads_are_interpolated() {
        let source = RampSource {
            edge: 1000.0,
            calls: AtomicUsize::new(0),
        };
        let mut g = grid(5);
        let refiner = AdaptiveRefiner::new(1, 1);
        let mut istate = IntersectionState::new();
        refiner.refine(&mut g, 0, 0, 4, 0.1, &source, &mut istate);
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        let (c00, c01, c10, c11) = (
            g.get(0, 0).color(),
            g.get(0, 4).color(),
            g.get(4, 0).color(),
            g.get(4, 4).color(),
        );
        for i in 0..=4 {
            for j in 0..=4 {
                let s = g.get(i, j);
                assert!(s.processed());
                let corner = (i == 0 || i == 4) && (j == 0 || j == 4);
                assert_eq!(s.sampled(), corner);
                if !corner {
                    let expected = bilerp(&c00, &c01, &c10, &c11, i as Float / 4.0, j as Float / 4.0);
                    assert_eq!(s.color(), expected);
                }
            }
        }
    }

    #[test]
    fn edges_split_into_four_children() {
        // instance changes between grid columns 1 and 2
        let source = RampSource {
            edge: 2.0,
            calls: AtomicUsize::new(0),
        };
        let mut g = grid(5);
        let refiner = AdaptiveRefiner::new(2, 1);
        let mut istate = IntersectionState::new();
        refiner.refine(&mut g, 0, 0, 4, 0.1, &source, &mut istate);
        // the 3x3 lattice of step 2 corners was shaded, nothing finer
        assert_eq!(source.calls.load(Ordering::SeqCst), 9);
        for i in 0..=4 {
            for j in 0..=4 {
                let s = g.get(i, j);
                assert!(s.processed());
                assert_eq!(s.sampled(), i % 2 == 0 && j % 2 == 0);
            }
        }
        // interpolation happened inside the children, not across them
        let mid = g.get(1, 0).color();
        let expected = bilerp(
            &g.get(0, 0).color(),
            &g.get(0, 2).color(),
            &g.get(2, 0).color(),
            &g.get(2, 2).color(),
            0.5,
            0.0,
        );
        assert_eq!(mid, expected);
    }

    #[test]
    fn no_split_below_the_minimum_step() {
        let source = RampSource {
            edge: 2.0,
            calls: AtomicUsize::new(0),
        };
        let mut g = grid(5);
        let refiner = AdaptiveRefiner::new(4, 1);
        let mut istate = IntersectionState::new();
        refiner.refine(&mut g, 0, 0, 4, 0.1, &source, &mut istate);
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn background_does_not_trigger_refinement() {
        let mut g = grid(5);
        let refiner = AdaptiveRefiner::new(1, 4);
        let mut istate = IntersectionState::new();
        refiner.refine(&mut g, 0, 0, 4, 0.0, &MissSource, &mut istate);
        let corner = g.get(0, 0);
        assert!(corner.sampled());
        assert_eq!(corner.n, 4);
        assert!(corner.color().is_black());
        assert!(!g.get(2, 2).sampled());
        assert!(g.get(2, 2).processed());
    }

    #[test]
    fn supersampling_averages() {
        let source = RampSource {
            edge: 1000.0,
            calls: AtomicUsize::new(0),
        };
        let refiner = AdaptiveRefiner::new(1, 4);
        let mut istate = IntersectionState::new();
        let mut sample = ImageSample::new(10.0, 3.0, 5);
        refiner.compute_sub_pixel(&mut sample, &source, &mut istate);
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        assert_eq!(sample.n, 4);
        assert!((sample.color()[0] - 1.01).abs() < 1e-5);
        assert_eq!(sample.instance, Some(1));
    }

    #[test]
    fn supersampled_identity_comes_from_the_last_hit() {
        let hit = |instance: usize, shader: usize, z: Float| {
            Some(RadianceSample {
                result: Spectrum::new(1.0),
                instance: Some(instance),
                shader: Some(shader),
                normal: Some(Vector3f::new(0.0, 0.0, z)),
            })
        };
        let mut sample = ImageSample::new(0.0, 0.0, 0);
        sample.add(hit(1, 3, 1.0));
        sample.add(hit(2, 4, -1.0));
        sample.add(None);
        assert_eq!(sample.n, 3);
        assert_eq!(sample.instance, Some(2));
        assert_eq!(sample.shader, Some(4));
        assert_eq!(sample.normal.z, -1.0);
        assert_eq!(sample.color()[0], 2.0);
        // an edge against a point whose first hit matched
        let mut other = ImageSample::new(1.0, 0.0, 1);
        other.set(hit(1, 3, 1.0));
        assert!(sample.is_different(&other, 10.0));
    }

    #[test]
    fn jitter_stays_inside_the_subpixel() {
        let sigma = generate_sigma_table(4 << 7);
        let g = SampleGrid::new(-2, -2, 12, 12, 4, &sigma, true, 32);
        for y in 0..12 {
            for x in 0..12 {
                let s = g.get(x, y);
                let sx = (x as i32 - 2) as Float;
                assert!(s.rx * 4.0 >= sx && s.rx * 4.0 < sx + 1.0);
            }
        }
    }
}
