//! The light server turns rays into shaded colors.
//!
//! It owns the lights, the bounce limits, the optional GI engine and
//! caustic photon map and the shading cache. Camera samples enter
//! through [get_radiance](struct.LightServer.html#method.get_radiance),
//! which traces, prepares and shades the hit while holding one lock
//! shared by all workers. Secondary rays spawned by shaders go through
//! the `trace_*` methods, each guarded by the bounce limit of its
//! category.

// std
use std::sync::{Arc, Mutex};
// lumen
use crate::core::error::LumenError;
use crate::core::geometry::{Ray, Vector3f};
use crate::core::gi::{make_gi_engine, GiEngine};
use crate::core::interaction::IntersectionState;
use crate::core::light::LightSource;
use crate::core::lumen::{Float, Spectrum};
use crate::core::parallel::{lock_or_recover, num_worker_threads, CancelFlag};
use crate::core::paramset::ParamSet;
use crate::core::photon::{emit_photons, make_caustic_store, CausticStore};
use crate::core::sampler::RadianceSample;
use crate::core::scene::Scene;
use crate::core::shader::{shader_key, Shader};
use crate::core::shading::ShadingState;
use crate::core::shadingcache::{CacheStats, ShadingCache};

pub struct LightServer {
    scene: Arc<dyn Scene>,
    lights: Vec<Arc<dyn LightSource>>,
    shader_override: Option<Arc<dyn Shader>>,
    shader_override_photons: bool,
    max_diffuse_depth: i32,
    max_reflection_depth: i32,
    max_refraction_depth: i32,
    gi_engine: Option<Box<dyn GiEngine>>,
    caustic_photon_map: Option<Arc<dyn CausticStore>>,
    // also serializes all of get_radiance
    shading_cache: Mutex<Option<ShadingCache>>,
    threads: usize,
}

impl LightServer {
    pub fn new(scene: Arc<dyn Scene>, lights: Vec<Arc<dyn LightSource>>) -> Self {
        LightServer {
            scene,
            lights,
            shader_override: None,
            shader_override_photons: false,
            max_diffuse_depth: 1,
            max_reflection_depth: 4,
            max_refraction_depth: 4,
            gi_engine: None,
            caustic_photon_map: None,
            shading_cache: Mutex::new(None),
            threads: num_worker_threads(0),
        }
    }
    pub fn scene(&self) -> &dyn Scene {
        self.scene.as_ref()
    }
    pub fn lights(&self) -> &[Arc<dyn LightSource>] {
        &self.lights
    }
    pub fn threads(&self) -> usize {
        self.threads
    }
    pub fn set_threads(&mut self, threads: usize) {
        self.threads = num_worker_threads(threads);
    }
    /// Shade every surface with *shader*; with *photons* set the
    /// override also scatters photons.
    pub fn set_shader_override(&mut self, shader: Option<Arc<dyn Shader>>, photons: bool) {
        self.shader_override = shader;
        self.shader_override_photons = photons;
    }
    /// Enable the shading cache for a rate in pixels per shading
    /// sample, rates that are not positive turn it off.
    pub fn set_shading_cache(&mut self, shading_rate: Float) {
        *lock_or_recover(&self.shading_cache) = ShadingCache::new(shading_rate);
    }
    pub fn set_max_depths(&mut self, diffuse: i32, reflection: i32, refraction: i32) {
        self.max_diffuse_depth = diffuse.max(0);
        self.max_reflection_depth = reflection.max(0);
        self.max_refraction_depth = refraction.max(0);
    }
    pub fn max_depths(&self) -> (i32, i32, i32) {
        (
            self.max_diffuse_depth,
            self.max_reflection_depth,
            self.max_refraction_depth,
        )
    }
    pub fn set_gi_engine(&mut self, engine: Option<Box<dyn GiEngine>>) {
        self.gi_engine = engine;
    }

    /// Read depth limits, set up GI and caustics and run the caustic
    /// photon pass. Must succeed before rendering.
    pub fn build(&mut self, options: &ParamSet, cancel: &CancelFlag) -> Result<(), LumenError> {
        self.set_max_depths(
            options.find_one_int("depths.diffuse", self.max_diffuse_depth),
            options.find_one_int("depths.reflection", self.max_reflection_depth),
            options.find_one_int("depths.refraction", self.max_refraction_depth),
        );
        // engines and caches installed directly stay unless the options name one
        if options.has_float("shading.cache") {
            self.set_shading_cache(options.find_one_float("shading.cache", 0.0));
        }
        let gi_name: String = if options.has_string("gi.engine") {
            self.gi_engine = make_gi_engine(options);
            options.find_one_string("gi.engine", "none")
        } else if self.gi_engine.is_some() {
            String::from("installed")
        } else {
            String::from("none")
        };
        self.caustic_photon_map = None;
        log::info!("light server settings:");
        log::info!("  * light sources found: {}", self.lights.len());
        log::info!("  * GI engine:           {}", gi_name);
        log::info!(
            "  * max depths:          diffuse {}, reflection {}, refraction {}",
            self.max_diffuse_depth,
            self.max_reflection_depth,
            self.max_refraction_depth
        );
        if let Some(engine) = self.gi_engine.as_mut() {
            if !engine.init(self.scene.as_ref()) {
                log::error!("GI engine \"{}\" failed to initialize", gi_name);
                return Err(LumenError::GiEngineInit(gi_name));
            }
        }
        if let Some(map) = make_caustic_store(options) {
            emit_photons(self, map.as_photon_store(), "caustic", 0, cancel)?;
            self.caustic_photon_map = Some(map);
        }
        let mut cache = lock_or_recover(&self.shading_cache);
        if let Some(cache) = cache.as_mut() {
            cache.clear();
        }
        Ok(())
    }

    /// Statistics of the shading cache, if it is enabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        lock_or_recover(&self.shading_cache)
            .as_ref()
            .map(|cache| *cache.stats())
    }

    /// Log shading cache statistics.
    pub fn show_stats(&self) {
        let stats: CacheStats = match self.cache_stats() {
            Some(stats) => stats,
            None => return,
        };
        let lookups: f64 = stats.lookups.max(1) as f64;
        log::info!("shading cache stats:");
        log::info!("  * lookups:             {}", stats.lookups);
        log::info!(
            "  * hits:                {} ({:.2}%)",
            stats.hits,
            stats.hits as f64 * 100.0 / lookups
        );
        log::info!(
            "  * empty entry misses:  {} ({:.2}%)",
            stats.empty_entry_misses,
            stats.empty_entry_misses as f64 * 100.0 / lookups
        );
        log::info!(
            "  * wrong entry misses:  {} ({:.2}%)",
            stats.wrong_entry_misses,
            stats.wrong_entry_misses as f64 * 100.0 / lookups
        );
        log::info!("  * entry adds:          {}", stats.entry_additions);
    }

    fn get_shader(&self, state: &ShadingState) -> Option<Arc<dyn Shader>> {
        match self.shader_override {
            Some(ref shader) => Some(shader.clone()),
            None => state.shader().cloned(),
        }
    }

    fn get_photon_shader(&self, state: &ShadingState) -> Option<Arc<dyn Shader>> {
        match self.shader_override {
            Some(ref shader) if self.shader_override_photons => Some(shader.clone()),
            _ => state.shader().cloned(),
        }
    }

    /// Trace a camera ray and shade what it hits. Returns `None` if the
    /// ray leaves the scene.
    pub fn get_radiance(
        &self,
        rx: Float,
        ry: Float,
        i: i32,
        r: Ray,
        istate: &mut IntersectionState,
    ) -> Option<RadianceSample> {
        // one worker at a time from trace to cache insert
        let mut cache = lock_or_recover(&self.shading_cache);
        let mut r: Ray = r;
        self.scene.trace(&mut r, istate);
        if !istate.hit() {
            return None;
        }
        let mut state = ShadingState::create_state(self, istate, rx, ry, r, i);
        state.prepare();
        let shader: Arc<dyn Shader> = match self.get_shader(&state) {
            Some(shader) => shader,
            None => {
                return Some(RadianceSample {
                    result: Spectrum::default(),
                    instance: state.instance_id(),
                    shader: None,
                    normal: state.normal(),
                })
            }
        };
        let key: usize = shader_key(&shader);
        let instance: usize = state.instance_id().unwrap_or(0);
        let normal: Option<Vector3f> = state.normal();
        let cached: Option<Spectrum> = match (cache.as_mut(), normal) {
            (Some(cache), Some(n)) => cache.lookup(rx, ry, instance, key, &n),
            _ => None,
        };
        let result: Spectrum = match cached {
            Some(c) => c,
            None => {
                let c: Spectrum = shader.get_radiance(&mut state);
                if let (Some(cache), Some(n)) = (cache.as_mut(), normal) {
                    cache.add(rx, ry, instance, key, &n, &c);
                }
                c
            }
        };
        state.set_result(result);
        Some(RadianceSample {
            result,
            instance: state.instance_id(),
            shader: Some(key),
            normal,
        })
    }

    /// Prepare and shade a hit found by a secondary ray.
    pub fn shade_hit(&self, mut state: ShadingState) -> Spectrum {
        state.prepare();
        match self.get_shader(&state) {
            Some(shader) => {
                let c: Spectrum = shader.get_radiance(&mut state);
                state.set_result(c);
                c
            }
            None => Spectrum::default(),
        }
    }

    pub(crate) fn shade_photon(&self, mut state: ShadingState, power: &Spectrum) {
        state.prepare();
        if let Some(shader) = self.get_photon_shader(&state) {
            shader.scatter_photon(&mut state, power);
        }
    }

    pub fn init_light_samples(&self, state: &mut ShadingState) {
        for light in self.lights.iter() {
            light.get_samples(state);
        }
    }

    pub fn init_caustic_samples(&self, state: &mut ShadingState) {
        if let Some(ref map) = self.caustic_photon_map {
            map.get_samples(state);
        }
    }

    pub fn trace_shadow(&self, r: &Ray, istate: &mut IntersectionState) -> bool {
        let mut r: Ray = *r;
        self.scene.trace(&mut r, istate);
        istate.hit()
    }

    pub fn get_irradiance(&self, state: &mut ShadingState, diffuse_reflectance: &Spectrum) -> Spectrum {
        if state.diffuse_depth() >= self.max_diffuse_depth {
            return Spectrum::default();
        }
        match self.gi_engine {
            Some(ref engine) => engine.get_irradiance(state, diffuse_reflectance),
            None => Spectrum::default(),
        }
    }

    pub fn get_global_radiance(&self, state: &mut ShadingState) -> Spectrum {
        match self.gi_engine {
            Some(ref engine) => engine.get_global_radiance(state),
            None => Spectrum::default(),
        }
    }

    pub fn trace_reflection(&self, previous: &mut ShadingState, r: Ray, i: i32) -> Spectrum {
        // specular chains only start from camera paths
        if previous.reflection_depth() >= self.max_reflection_depth || previous.diffuse_depth() > 0 {
            return Spectrum::default();
        }
        let mut r: Ray = r;
        self.scene.trace(&mut r, previous.istate_mut());
        if !previous.istate().hit() {
            return Spectrum::default();
        }
        self.shade_hit(ShadingState::create_reflection_bounce_state(previous, r, i))
    }

    pub fn trace_refraction(&self, previous: &mut ShadingState, r: Ray, i: i32) -> Spectrum {
        if previous.refraction_depth() >= self.max_refraction_depth || previous.diffuse_depth() > 0 {
            return Spectrum::default();
        }
        let mut r: Ray = r;
        self.scene.trace(&mut r, previous.istate_mut());
        if !previous.istate().hit() {
            return Spectrum::default();
        }
        self.shade_hit(ShadingState::create_refraction_bounce_state(previous, r, i))
    }

    pub fn trace_glossy(&self, previous: &mut ShadingState, r: Ray, i: i32) -> Spectrum {
        if previous.reflection_depth() >= self.max_reflection_depth || previous.diffuse_depth() > 0 {
            return Spectrum::default();
        }
        let mut r: Ray = r;
        self.scene.trace(&mut r, previous.istate_mut());
        if !previous.istate().hit() {
            return Spectrum::default();
        }
        self.shade_hit(ShadingState::create_glossy_bounce_state(previous, r, i))
    }

    /// Trace a gather ray for indirect diffuse light. The returned
    /// state is not prepared yet; `None` past the diffuse limit or on
    /// a miss.
    pub fn trace_final_gather<'b>(
        &self,
        previous: &'b mut ShadingState<'_>,
        r: Ray,
        i: i32,
    ) -> Option<ShadingState<'b>> {
        if previous.diffuse_depth() >= self.max_diffuse_depth {
            return None;
        }
        let mut r: Ray = r;
        self.scene.trace(&mut r, previous.istate_mut());
        if !previous.istate().hit() {
            return None;
        }
        Some(ShadingState::create_diffuse_bounce_state(previous, r, i))
    }

    pub(crate) fn trace_diffuse_photon(&self, previous: &mut ShadingState, r: Ray, power: &Spectrum) {
        if previous.diffuse_depth() >= self.max_diffuse_depth {
            return;
        }
        let mut r: Ray = r;
        self.scene.trace(&mut r, previous.istate_mut());
        if previous.istate().hit() {
            self.shade_photon(ShadingState::create_diffuse_bounce_state(previous, r, 0), power);
        }
    }

    pub(crate) fn trace_reflection_photon(&self, previous: &mut ShadingState, r: Ray, power: &Spectrum) {
        if previous.reflection_depth() >= self.max_reflection_depth {
            return;
        }
        let mut r: Ray = r;
        self.scene.trace(&mut r, previous.istate_mut());
        if previous.istate().hit() {
            self.shade_photon(ShadingState::create_reflection_bounce_state(previous, r, 0), power);
        }
    }

    pub(crate) fn trace_refraction_photon(&self, previous: &mut ShadingState, r: Ray, power: &Spectrum) {
        if previous.refraction_depth() >= self.max_refraction_depth {
            return;
        }
        let mut r: Ray = r;
        self.scene.trace(&mut r, previous.istate_mut());
        if previous.istate().hit() {
            self.shade_photon(ShadingState::create_refraction_bounce_state(previous, r, 0), power);
        }
    }
}
