//! Photon stores and the emission pass that fills them.
//!
//! Emission splits the requested photon count evenly across the
//! worker threads (the last one takes the remainder). Photon *k* uses
//! the Halton point *k + seed*: its first coordinate picks a light in
//! proportion to the light's power, the remaining three are handed to
//! the light to pick an origin and direction.

// std
use std::str::FromStr;
use std::sync::{Arc, Mutex};
// others
use strum_macros::{Display, EnumString};
// lumen
use crate::core::error::LumenError;
use crate::core::geometry::{Bounds3f, Ray, Vector3f};
use crate::core::interaction::IntersectionState;
use crate::core::light::EmittedPhoton;
use crate::core::lightserver::LightServer;
use crate::core::lowdiscrepancy::halton;
use crate::core::lumen::{Float, Spectrum};
use crate::core::parallel::{lock_or_recover, CancelFlag, ProgressReporter};
use crate::core::paramset::ParamSet;
use crate::core::sampling::PhotonEmissionHistogram;
use crate::core::shading::ShadingState;
use crate::photons::caustic::CausticPhotonMap;

/// Receives photons while they bounce through the scene. **store** is
/// called concurrently from all emission threads.
pub trait PhotonStore: Send + Sync {
    fn num_emit(&self) -> i32;
    /// Reset before emission starts.
    fn prepare(&self, scene_bounds: &Bounds3f);
    fn store(&self, state: &ShadingState, dir: &Vector3f, power: &Spectrum, diffuse: &Spectrum);
    /// Called once after all photons are stored.
    fn init(&self);
    fn allow_diffuse_bounced(&self) -> bool;
    fn allow_reflection_bounced(&self) -> bool;
    fn allow_refraction_bounced(&self) -> bool;
}

/// A photon store that can answer caustic lighting queries.
pub trait CausticStore: PhotonStore {
    fn get_samples(&self, state: &mut ShadingState);
    fn as_photon_store(&self) -> &dyn PhotonStore;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CausticsType {
    None,
    Kd,
}

/// Caustic photon map selected by the `caustics` option.
pub fn make_caustic_store(ps: &ParamSet) -> Option<Arc<dyn CausticStore>> {
    let name: String = ps.find_one_string("caustics", "none");
    match CausticsType::from_str(&name) {
        Ok(CausticsType::None) => None,
        Ok(CausticsType::Kd) => {
            let num_emit: i32 = ps.find_one_int("caustics.emit", 10000);
            let gather: usize = ps.find_one_int("caustics.gather", 50).max(1) as usize;
            let radius: Float = ps.find_one_float("caustics.radius", 0.5);
            let filter: Float = ps.find_one_float("caustics.filter", 1.1);
            Some(Arc::new(CausticPhotonMap::new(num_emit, gather, radius, filter)))
        }
        Err(_) => {
            log::warn!("unrecognized caustics photon map engine \"{}\" - ignoring", name);
            None
        }
    }
}

struct EmissionProgress {
    counter: u64,
    reporter: ProgressReporter,
}

/// Emit `map.num_emit()` photons from the lights of *server* and
/// initialize *map* afterwards.
pub fn emit_photons(
    server: &LightServer,
    map: &dyn PhotonStore,
    kind: &str,
    seed: i32,
    cancel: &CancelFlag,
) -> Result<(), LumenError> {
    let lights = server.lights();
    if lights.is_empty() {
        log::error!("unable to trace {} photons, no lights in scene", kind);
        return Err(LumenError::NoLights {
            kind: kind.to_string(),
        });
    }
    let powers: Vec<Float> = lights.iter().map(|light| light.get_power()).collect();
    let histogram: PhotonEmissionHistogram = PhotonEmissionHistogram::new(&powers);
    if histogram.total() <= 0.0 as Float {
        log::error!("unable to trace {} photons, no light power", kind);
        return Err(LumenError::NoPower {
            kind: kind.to_string(),
        });
    }
    let num_emitted: i32 = map.num_emit();
    if num_emitted <= 0 {
        log::error!("unable to trace {} photons, photon count was {}", kind, num_emitted);
        return Err(LumenError::NoPhotons {
            kind: kind.to_string(),
        });
    }
    let scale: Float = 1.0 as Float / num_emitted as Float;
    map.prepare(&server.scene().world_bound());
    let num_threads: i32 = (server.threads() as i32).max(1);
    let delta: i32 = num_emitted / num_threads;
    log::info!(
        "tracing {} {} photons with {} thread(s) ...",
        num_emitted,
        kind,
        num_threads
    );
    let progress: Mutex<EmissionProgress> = Mutex::new(EmissionProgress {
        counter: 0,
        reporter: ProgressReporter::new(num_emitted as u64, &format!("Tracing {} photons", kind)),
    });
    {
        let progress = &progress;
        let histogram = &histogram;
        let scope_result = crossbeam::scope(|scope| {
            let mut handles = Vec::with_capacity(num_threads as usize);
            for t in 0..num_threads {
                let start: i32 = t * delta;
                let end: i32 = if t == num_threads - 1 {
                    num_emitted
                } else {
                    start + delta
                };
                handles.push(scope.spawn(move |_| {
                    let mut istate: IntersectionState = IntersectionState::new();
                    for i in start..end {
                        {
                            let mut p = lock_or_recover(progress);
                            if cancel.is_cancelled() {
                                return;
                            }
                            p.counter += 1;
                            let counter = p.counter;
                            p.reporter.update(counter);
                        }
                        emit_photon(server, map, histogram, i + seed, scale, &mut istate);
                    }
                }));
            }
            for (t, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() {
                    log::error!("photon thread {} of {} did not finish", t + 1, num_threads);
                }
            }
        });
        if scope_result.is_err() {
            log::error!("photon tracing threads panicked");
        }
    }
    let mut p = lock_or_recover(&progress);
    p.reporter.finish();
    if cancel.is_cancelled() {
        log::warn!("{} photon tracing was cancelled", kind);
        return Err(LumenError::Cancelled {
            kind: kind.to_string(),
        });
    }
    map.init();
    Ok(())
}

fn emit_photon(
    server: &LightServer,
    map: &dyn PhotonStore,
    histogram: &PhotonEmissionHistogram,
    qmc_i: i32,
    scale: Float,
    istate: &mut IntersectionState,
) {
    let q: u32 = qmc_i as u32;
    let draw: Float = (halton(0, q) * histogram.total() as f64) as Float;
    let (j, rand_x1) = match histogram.select(draw) {
        Some(selected) => selected,
        None => return,
    };
    let photon: EmittedPhoton = server.lights()[j].get_photon(
        rand_x1 as f64,
        halton(1, q),
        halton(2, q),
        halton(3, q),
    );
    let power: Spectrum = photon.power * scale;
    let mut r: Ray = Ray::new(photon.p, photon.dir);
    server.scene().trace(&mut r, istate);
    if istate.hit() {
        let state = ShadingState::create_photon_state(server, istate, map, r, qmc_i);
        server.shade_photon(state, &power);
    }
}
