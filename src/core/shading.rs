//! Everything a shader needs to know about one intersection: the hit,
//! the local frame, the bounce history of the path that led here and
//! access to the light transport server for further rays.
//!
//! A state is created right after a successful trace and dropped once
//! the hit is shaded. Child states reborrow the parent's intersection
//! scratch, so a path never allocates more than one per worker.

// std
use std::sync::Arc;
// others
use smallvec::SmallVec;
// lumen
use crate::core::geometry::{vec3_dot, OrthoNormalBasis, Point2f, Point3f, Ray, Vector3f};
use crate::core::instance::Instance;
use crate::core::interaction::IntersectionState;
use crate::core::light::LightSample;
use crate::core::lightserver::LightServer;
use crate::core::lowdiscrepancy::{halton, mod1};
use crate::core::lumen::{Float, Spectrum, INV_PI};
use crate::core::photon::PhotonStore;
use crate::core::shader::Shader;

/// Number of bounces of each category on the path so far.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BounceDepths {
    pub diffuse: i32,
    pub reflection: i32,
    pub refraction: i32,
}

pub struct ShadingState<'a> {
    pub(crate) server: &'a LightServer,
    pub(crate) istate: &'a mut IntersectionState,
    map: Option<&'a dyn PhotonStore>,
    ray: Ray,
    // hit
    instance: Option<Arc<Instance>>,
    prim_id: i32,
    hit_t: Float,
    hit_u: Float,
    hit_v: Float,
    // local frame, filled in by the shape
    p: Point3f,
    n: Option<Vector3f>,
    ng: Option<Vector3f>,
    tex: Point2f,
    basis: Option<OrthoNormalBasis>,
    cos_nd: Float,
    behind: bool,
    shader: Option<Arc<dyn Shader>>,
    // sampling
    rx: Float,
    ry: Float,
    i: i32,
    d: usize,
    qmc_d0_i: f64,
    qmc_d1_i: f64,
    depths: BounceDepths,
    include_lights: bool,
    include_specular: bool,
    result: Spectrum,
    light_samples: SmallVec<[LightSample; 4]>,
}

impl<'a> ShadingState<'a> {
    #[allow(clippy::too_many_arguments)]
    fn new(
        server: &'a LightServer,
        istate: &'a mut IntersectionState,
        map: Option<&'a dyn PhotonStore>,
        ray: Ray,
        i: i32,
        d: usize,
        rx: Float,
        ry: Float,
        depths: BounceDepths,
        include_lights: bool,
        include_specular: bool,
    ) -> ShadingState<'a> {
        let instance: Option<Arc<Instance>> = istate.instance.clone();
        let (prim_id, hit_t, hit_u, hit_v) = (istate.id, istate.t, istate.u, istate.v);
        ShadingState {
            server,
            istate,
            map,
            ray,
            instance,
            prim_id,
            hit_t,
            hit_u,
            hit_v,
            p: Point3f::default(),
            n: None,
            ng: None,
            tex: Point2f::default(),
            basis: None,
            cos_nd: 0.0,
            behind: false,
            shader: None,
            rx,
            ry,
            i,
            d,
            qmc_d0_i: halton(d, i as u32),
            qmc_d1_i: halton(d + 1, i as u32),
            depths,
            include_lights,
            include_specular,
            result: Spectrum::default(),
            light_samples: SmallVec::new(),
        }
    }

    /// State for a camera ray hit at raster position *(rx, ry)*. The
    /// image sampler already used dimensions 0 to 3.
    pub(crate) fn create_state(
        server: &'a LightServer,
        istate: &'a mut IntersectionState,
        rx: Float,
        ry: Float,
        ray: Ray,
        i: i32,
    ) -> ShadingState<'a> {
        ShadingState::new(
            server,
            istate,
            None,
            ray,
            i,
            4,
            rx,
            ry,
            BounceDepths::default(),
            true,
            true,
        )
    }

    /// State for a photon hit, photons are deposited into *map*.
    pub(crate) fn create_photon_state(
        server: &'a LightServer,
        istate: &'a mut IntersectionState,
        map: &'a dyn PhotonStore,
        ray: Ray,
        i: i32,
    ) -> ShadingState<'a> {
        ShadingState::new(
            server,
            istate,
            Some(map),
            ray,
            i,
            1,
            0.0,
            0.0,
            BounceDepths::default(),
            false,
            false,
        )
    }

    fn create_bounce_state<'b>(
        previous: &'b mut ShadingState<'_>,
        ray: Ray,
        i: i32,
        depths: BounceDepths,
        include_lights: bool,
        include_specular: bool,
    ) -> ShadingState<'b> {
        let server: &LightServer = previous.server;
        let map = previous.map;
        let (rx, ry) = (previous.rx, previous.ry);
        let d: usize = previous.d + 2;
        let i: i32 = previous.i.wrapping_add(i);
        ShadingState::new(
            server,
            &mut *previous.istate,
            map,
            ray,
            i,
            d,
            rx,
            ry,
            depths,
            include_lights,
            include_specular,
        )
    }

    pub(crate) fn create_reflection_bounce_state<'b>(
        previous: &'b mut ShadingState<'_>,
        ray: Ray,
        i: i32,
    ) -> ShadingState<'b> {
        let mut depths: BounceDepths = previous.depths;
        depths.reflection += 1;
        let (lights, specular) = (previous.include_lights, previous.include_specular);
        ShadingState::create_bounce_state(previous, ray, i, depths, lights, specular)
    }

    pub(crate) fn create_refraction_bounce_state<'b>(
        previous: &'b mut ShadingState<'_>,
        ray: Ray,
        i: i32,
    ) -> ShadingState<'b> {
        let mut depths: BounceDepths = previous.depths;
        depths.refraction += 1;
        let (lights, specular) = (previous.include_lights, previous.include_specular);
        ShadingState::create_bounce_state(previous, ray, i, depths, lights, specular)
    }

    pub(crate) fn create_glossy_bounce_state<'b>(
        previous: &'b mut ShadingState<'_>,
        ray: Ray,
        i: i32,
    ) -> ShadingState<'b> {
        let mut depths: BounceDepths = previous.depths;
        depths.reflection += 1;
        ShadingState::create_bounce_state(previous, ray, i, depths, false, false)
    }

    /// Used for diffuse photon bounces and final gather rays alike.
    pub(crate) fn create_diffuse_bounce_state<'b>(
        previous: &'b mut ShadingState<'_>,
        ray: Ray,
        i: i32,
    ) -> ShadingState<'b> {
        let mut depths: BounceDepths = previous.depths;
        depths.diffuse += 1;
        ShadingState::create_bounce_state(previous, ray, i, depths, false, false)
    }

    pub(crate) fn istate(&self) -> &IntersectionState {
        &*self.istate
    }

    pub(crate) fn istate_mut(&mut self) -> &mut IntersectionState {
        &mut *self.istate
    }

    /// Let the instance that was hit fill in the local frame and
    /// surface shader.
    pub fn prepare(&mut self) {
        if let Some(instance) = self.instance.clone() {
            instance.prepare_shading_state(self);
        }
    }

    // accessors

    pub fn server(&self) -> &'a LightServer {
        self.server
    }
    pub fn ray(&self) -> &Ray {
        &self.ray
    }
    pub fn instance(&self) -> Option<&Arc<Instance>> {
        self.instance.as_ref()
    }
    pub fn instance_id(&self) -> Option<usize> {
        self.instance.as_ref().map(|instance| instance.id())
    }
    pub fn prim_id(&self) -> i32 {
        self.prim_id
    }
    pub fn hit_t(&self) -> Float {
        self.hit_t
    }
    pub fn hit_u(&self) -> Float {
        self.hit_u
    }
    pub fn hit_v(&self) -> Float {
        self.hit_v
    }
    pub fn point(&self) -> Point3f {
        self.p
    }
    pub fn normal(&self) -> Option<Vector3f> {
        self.n
    }
    pub fn geo_normal(&self) -> Option<Vector3f> {
        self.ng
    }
    pub fn tex(&self) -> Point2f {
        self.tex
    }
    /// Shading frame, built from the normal when the shape set none.
    pub fn basis(&self) -> OrthoNormalBasis {
        match (self.basis, self.n) {
            (Some(basis), _) => basis,
            (None, Some(n)) => OrthoNormalBasis::make_from_w(&n),
            (None, None) => OrthoNormalBasis::make_from_w(&(-self.ray.d)),
        }
    }
    pub fn cos_nd(&self) -> Float {
        self.cos_nd
    }
    pub fn is_behind(&self) -> bool {
        self.behind
    }
    pub fn shader(&self) -> Option<&Arc<dyn Shader>> {
        self.shader.as_ref()
    }
    pub fn raster_x(&self) -> Float {
        self.rx
    }
    pub fn raster_y(&self) -> Float {
        self.ry
    }
    pub fn sample_index(&self) -> i32 {
        self.i
    }
    pub fn depths(&self) -> BounceDepths {
        self.depths
    }
    pub fn diffuse_depth(&self) -> i32 {
        self.depths.diffuse
    }
    pub fn reflection_depth(&self) -> i32 {
        self.depths.reflection
    }
    pub fn refraction_depth(&self) -> i32 {
        self.depths.refraction
    }
    pub fn include_lights(&self) -> bool {
        self.include_lights
    }
    pub fn include_specular(&self) -> bool {
        self.include_specular
    }
    pub fn result(&self) -> Spectrum {
        self.result
    }
    pub fn light_samples(&self) -> &[LightSample] {
        &self.light_samples
    }

    // set by shapes and instances

    pub fn set_point(&mut self, p: Point3f) {
        self.p = p;
    }
    pub fn set_normal(&mut self, n: Vector3f) {
        self.n = Some(n);
    }
    pub fn set_geo_normal(&mut self, ng: Vector3f) {
        self.ng = Some(ng);
    }
    pub fn set_tex(&mut self, tex: Point2f) {
        self.tex = tex;
    }
    pub fn set_basis(&mut self, basis: OrthoNormalBasis) {
        self.basis = Some(basis);
    }
    pub fn set_shader(&mut self, shader: Option<Arc<dyn Shader>>) {
        self.shader = shader;
    }
    pub fn set_result(&mut self, c: Spectrum) {
        self.result = c;
    }

    /// Flip the frame so the geometric normal faces the incoming ray.
    pub fn face_forward(&mut self) {
        let d: Vector3f = self.ray.d;
        if let Some(ng) = self.ng {
            if vec3_dot(&ng, &d) > 0.0 as Float {
                self.ng = Some(-ng);
                self.n = self.n.map(|n| -n);
                self.basis = self.n.map(|n| OrthoNormalBasis::make_from_w(&n));
                self.behind = true;
            }
        }
        self.cos_nd = match self.n {
            Some(n) => (-vec3_dot(&n, &d)).max(0.0 as Float),
            None => 0.0 as Float,
        };
    }

    /// QMC draw for sample *j* of *n* taken at this bounce.
    pub fn get_random(&self, j: i32, dim: usize, n: i32) -> f64 {
        match dim {
            0 => mod1(self.qmc_d0_i + j as f64 / n.max(1) as f64),
            1 => mod1(self.qmc_d1_i + halton(0, j as u32)),
            _ => mod1(halton(self.d + dim, self.i as u32) + halton(dim - 1, j as u32)),
        }
    }

    // lighting

    pub fn add_sample(&mut self, sample: LightSample) {
        self.light_samples.push(sample);
    }
    pub fn init_light_samples(&mut self) {
        let server: &LightServer = self.server;
        server.init_light_samples(self);
    }
    pub fn init_caustic_samples(&mut self) {
        let server: &LightServer = self.server;
        server.init_caustic_samples(self);
    }
    /// True if something blocks *r* before its *t_max*.
    pub fn trace_shadow(&mut self, r: &Ray) -> bool {
        let server: &LightServer = self.server;
        server.trace_shadow(r, &mut *self.istate)
    }
    /// Lambertian response to the gathered light samples plus indirect
    /// irradiance from the GI engine.
    pub fn diffuse(&mut self, diff: &Spectrum) -> Spectrum {
        let mut lr: Spectrum = Spectrum::default();
        if diff.is_black() {
            return lr;
        }
        if let Some(n) = self.n {
            for sample in self.light_samples.iter() {
                lr.madd(sample.dot(&n), &sample.ldiff);
            }
        }
        lr += self.get_irradiance(diff);
        lr * *diff * INV_PI
    }
    pub fn get_irradiance(&mut self, diffuse_reflectance: &Spectrum) -> Spectrum {
        let server: &LightServer = self.server;
        server.get_irradiance(self, diffuse_reflectance)
    }
    pub fn get_global_radiance(&mut self) -> Spectrum {
        let server: &LightServer = self.server;
        server.get_global_radiance(self)
    }

    // secondary rays

    pub fn trace_reflection(&mut self, r: Ray, i: i32) -> Spectrum {
        let server: &LightServer = self.server;
        server.trace_reflection(self, r, i)
    }
    pub fn trace_refraction(&mut self, r: Ray, i: i32) -> Spectrum {
        let server: &LightServer = self.server;
        server.trace_refraction(self, r, i)
    }
    pub fn trace_glossy(&mut self, r: Ray, i: i32) -> Spectrum {
        let server: &LightServer = self.server;
        server.trace_glossy(self, r, i)
    }

    // photons

    pub fn store_photon(&self, dir: &Vector3f, power: &Spectrum, diffuse: &Spectrum) {
        if let Some(map) = self.map {
            map.store(self, dir, power, diffuse);
        }
    }
    pub fn trace_diffuse_photon(&mut self, r: Ray, power: &Spectrum) {
        if let Some(map) = self.map {
            if map.allow_diffuse_bounced() {
                let server: &LightServer = self.server;
                server.trace_diffuse_photon(self, r, power);
            }
        }
    }
    pub fn trace_reflection_photon(&mut self, r: Ray, power: &Spectrum) {
        if let Some(map) = self.map {
            if map.allow_reflection_bounced() {
                let server: &LightServer = self.server;
                server.trace_reflection_photon(self, r, power);
            }
        }
    }
    pub fn trace_refraction_photon(&mut self, r: Ray, power: &Spectrum) {
        if let Some(map) = self.map {
            if map.allow_refraction_bounced() {
                let server: &LightServer = self.server;
                server.trace_refraction_photon(self, r, power);
            }
        }
    }
}
