use std::sync::{Arc, Mutex};

use rs_lumen::accelerators::instancelist::InstanceList;
use rs_lumen::core::error::LumenError;
use rs_lumen::core::geometry::{Bounds3f, Point3f, Vector3f};
use rs_lumen::core::instance::Instance;
use rs_lumen::core::light::LightSource;
use rs_lumen::core::lightserver::LightServer;
use rs_lumen::core::lumen::{Float, Spectrum};
use rs_lumen::core::parallel::CancelFlag;
use rs_lumen::core::paramset::ParamSet;
use rs_lumen::core::photon::{emit_photons, PhotonStore};
use rs_lumen::core::shading::ShadingState;
use rs_lumen::lights::point::PointLight;
use rs_lumen::shaders::diffuse::DiffuseShader;
use rs_lumen::shapes::sphere::Sphere;

#[derive(Default)]
struct Tally {
    stored: usize,
    power: Spectrum,
    prepared: usize,
    initialized: usize,
}

struct CountingStore {
    num_emit: i32,
    tally: Mutex<Tally>,
}

impl CountingStore {
    fn new(num_emit: i32) -> Self {
        CountingStore {
            num_emit,
            tally: Mutex::new(Tally::default()),
        }
    }
}

impl PhotonStore for CountingStore {
    fn num_emit(&self) -> i32 {
        self.num_emit
    }
    fn prepare(&self, _scene_bounds: &Bounds3f) {
        self.tally.lock().unwrap().prepared += 1;
    }
    fn store(&self, _state: &ShadingState, _dir: &Vector3f, power: &Spectrum, _diffuse: &Spectrum) {
        let mut tally = self.tally.lock().unwrap();
        tally.stored += 1;
        tally.power += *power;
    }
    fn init(&self) {
        self.tally.lock().unwrap().initialized += 1;
    }
    fn allow_diffuse_bounced(&self) -> bool {
        false
    }
    fn allow_reflection_bounced(&self) -> bool {
        false
    }
    fn allow_refraction_bounced(&self) -> bool {
        false
    }
}

/// A black sphere around the lights so every photon lands exactly once.
fn enclosed_server(lights: Vec<Arc<dyn LightSource>>, threads: usize) -> LightServer {
    let shell = Instance::new(
        Arc::new(Sphere::new(Point3f::new(0.0, 0.0, 0.0), 10.0)),
        Some(Arc::new(DiffuseShader::new(Spectrum::black()))),
    );
    let scene = Arc::new(InstanceList::new(vec![shell]));
    let mut server = LightServer::new(scene, lights);
    server.set_threads(threads);
    server
}

#[test]
fn every_photon_is_emitted_once_and_power_is_conserved() {
    let power = Spectrum::rgb(30.0, 20.0, 10.0);
    let lights: Vec<Arc<dyn LightSource>> =
        vec![Arc::new(PointLight::new(Point3f::new(1.0, 2.0, 0.5), power))];
    let server = enclosed_server(lights, 4);
    // not divisible by the thread count
    let store = CountingStore::new(1003);
    emit_photons(&server, &store, "test", 0, &CancelFlag::new()).unwrap();
    let tally = store.tally.lock().unwrap();
    assert_eq!(tally.prepared, 1);
    assert_eq!(tally.initialized, 1);
    assert_eq!(tally.stored, 1003);
    for c in 0..3 {
        let expected: Float = power.c[c];
        assert!((tally.power.c[c] - expected).abs() < 1e-2 * expected);
    }
}

#[test]
fn photons_from_several_lights_are_all_traced() {
    let lights: Vec<Arc<dyn LightSource>> = vec![
        Arc::new(PointLight::new(Point3f::new(-1.0, 0.0, 0.0), Spectrum::new(1.0))),
        Arc::new(PointLight::new(Point3f::new(1.0, 0.0, 0.0), Spectrum::new(3.0))),
    ];
    let server = enclosed_server(lights, 2);
    let store = CountingStore::new(4000);
    emit_photons(&server, &store, "test", 0, &CancelFlag::new()).unwrap();
    let tally = store.tally.lock().unwrap();
    assert_eq!(tally.stored, 4000);
}

#[test]
fn emission_needs_lights_and_photons() {
    let server = enclosed_server(Vec::new(), 1);
    let store = CountingStore::new(100);
    match emit_photons(&server, &store, "test", 0, &CancelFlag::new()) {
        Err(LumenError::NoLights { .. }) => {}
        other => panic!("unexpected result {:?}", other),
    }
    let lights: Vec<Arc<dyn LightSource>> = vec![Arc::new(PointLight::new(
        Point3f::new(0.0, 0.0, 0.0),
        Spectrum::black(),
    ))];
    let server = enclosed_server(lights, 1);
    match emit_photons(&server, &store, "test", 0, &CancelFlag::new()) {
        Err(LumenError::NoPower { .. }) => {}
        other => panic!("unexpected result {:?}", other),
    }
    let lights: Vec<Arc<dyn LightSource>> = vec![Arc::new(PointLight::new(
        Point3f::new(0.0, 0.0, 0.0),
        Spectrum::new(1.0),
    ))];
    let server = enclosed_server(lights, 1);
    let empty = CountingStore::new(0);
    match emit_photons(&server, &empty, "test", 0, &CancelFlag::new()) {
        Err(LumenError::NoPhotons { .. }) => {}
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(store.tally.lock().unwrap().stored, 0);
}

#[test]
fn cancelled_emission_skips_init() {
    let lights: Vec<Arc<dyn LightSource>> = vec![Arc::new(PointLight::new(
        Point3f::new(0.0, 0.0, 0.0),
        Spectrum::new(1.0),
    ))];
    let server = enclosed_server(lights, 2);
    let store = CountingStore::new(500);
    let cancel = CancelFlag::new();
    cancel.cancel();
    match emit_photons(&server, &store, "test", 0, &cancel) {
        Err(LumenError::Cancelled { .. }) => {}
        other => panic!("unexpected result {:?}", other),
    }
    let tally = store.tally.lock().unwrap();
    assert_eq!(tally.stored, 0);
    assert_eq!(tally.initialized, 0);
}

#[test]
fn caustics_without_lights_fail_the_build() {
    let mut server = enclosed_server(Vec::new(), 1);
    let mut options = ParamSet::default();
    options.add_string("caustics", "kd");
    assert!(matches!(
        server.build(&options, &CancelFlag::new()),
        Err(LumenError::NoLights { .. })
    ));
    // without a photon pass the same scene builds fine
    let mut server = enclosed_server(Vec::new(), 1);
    assert!(server.build(&ParamSet::default(), &CancelFlag::new()).is_ok());
}
