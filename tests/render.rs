use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rs_lumen::accelerators::instancelist::InstanceList;
use rs_lumen::cameras::pinhole::PinholeCamera;
use rs_lumen::core::error::LumenError;
use rs_lumen::core::geometry::{Point3f, Vector3f};
use rs_lumen::core::gi::GiEngine;
use rs_lumen::core::instance::Instance;
use rs_lumen::core::interaction::IntersectionState;
use rs_lumen::core::light::LightSource;
use rs_lumen::core::lightserver::LightServer;
use rs_lumen::core::lumen::{Float, Spectrum};
use rs_lumen::core::parallel::CancelFlag;
use rs_lumen::core::paramset::ParamSet;
use rs_lumen::core::sampler::{RadianceSample, RadianceSource};
use rs_lumen::core::scene::Scene;
use rs_lumen::core::shading::ShadingState;
use rs_lumen::core::world::World;
use rs_lumen::displays::frame::FrameDisplay;
use rs_lumen::lights::point::PointLight;
use rs_lumen::samplers::bucket::BucketRenderer;
use rs_lumen::shaders::constant::ConstantShader;
use rs_lumen::shaders::diffuse::DiffuseShader;
use rs_lumen::shaders::mirror::MirrorShader;
use rs_lumen::shapes::plane::Plane;
use rs_lumen::shapes::sphere::Sphere;

fn small_world(width: i32, height: i32) -> World {
    let floor = Instance::new(
        Arc::new(Plane::new(Point3f::new(0.0, -1.0, 0.0), Vector3f::new(0.0, 1.0, 0.0))),
        Some(Arc::new(DiffuseShader::new(Spectrum::new(0.5)))),
    );
    let ball = Instance::new(
        Arc::new(Sphere::new(Point3f::new(0.0, 0.0, 0.0), 1.0)),
        Some(Arc::new(DiffuseShader::new(Spectrum::rgb(0.8, 0.3, 0.2)))),
    );
    let scene = Arc::new(InstanceList::new(vec![floor, ball]));
    let lights: Vec<Arc<dyn LightSource>> = vec![Arc::new(PointLight::new(
        Point3f::new(0.0, 6.0, 4.0),
        Spectrum::new(1000.0),
    ))];
    let camera = Arc::new(PinholeCamera::new(
        Point3f::new(0.0, 0.5, 6.0),
        Point3f::new(0.0, 0.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        40.0,
        width as Float / height as Float,
    ));
    World::new(camera, LightServer::new(scene, lights), width, height)
}

fn options(pairs: &[(&str, i32)]) -> ParamSet {
    let mut options = ParamSet::default();
    for (name, value) in pairs {
        options.add_int(name, *value);
    }
    options
}

#[test]
fn full_render_fills_every_bucket() {
    let mut world = small_world(48, 40);
    assert_eq!(world.image_size(), (48, 40));
    let options = options(&[("threads", 3), ("bucket.size", 16), ("aa.min", 0), ("aa.max", 1)]);
    let display = FrameDisplay::new();
    world.render(&options, &display, &CancelFlag::new()).unwrap();
    assert!(world.is_built());
    assert_eq!(display.begins.load(Ordering::SeqCst), 1);
    assert_eq!(display.ends.load(Ordering::SeqCst), 1);
    // 3 x 3 buckets, the last row and column partial
    assert_eq!(display.prepares.load(Ordering::SeqCst), 9);
    assert_eq!(display.updates.load(Ordering::SeqCst), 9);
    let center = display.get_pixel(24, 20).unwrap();
    assert!(!center.is_black());
    assert!(center.c[0] > center.c[2]);
    assert_eq!(display.pixels().len(), 48 * 40);
    assert!(display.pixels().iter().all(|c| !c.has_nans()));
}

#[test]
fn repeated_renders_are_deterministic() {
    let opts = options(&[("threads", 4), ("bucket.size", 16), ("aa.min", -1), ("aa.max", 1)]);
    let mut a = small_world(32, 32);
    let mut b = small_world(32, 32);
    let da = FrameDisplay::new();
    let db = FrameDisplay::new();
    a.render(&opts, &da, &CancelFlag::new()).unwrap();
    b.render(&opts, &db, &CancelFlag::new()).unwrap();
    for (pa, pb) in da.pixels().iter().zip(db.pixels().iter()) {
        for c in 0..3 {
            assert!((pa.c[c] - pb.c[c]).abs() < 1e-5);
        }
    }
}

#[test]
fn gi_engines_and_cache_render() {
    for engine in &["ambocc", "fake", "path"] {
        let mut world = small_world(16, 16);
        let mut opts = options(&[("threads", 2), ("bucket.size", 16), ("gi.ambocc.samples", 4), ("gi.path.samples", 2)]);
        opts.add_string("gi.engine", engine);
        opts.add_float("shading.cache", 1.0);
        opts.add_rgb_spectrum("gi.fake.sky", Spectrum::rgb(0.2, 0.3, 0.8));
        opts.add_vector3f("gi.fake.up", Vector3f::new(0.0, 1.0, 0.0));
        let display = FrameDisplay::new();
        world.render(&opts, &display, &CancelFlag::new()).unwrap();
        assert_eq!(display.ends.load(Ordering::SeqCst), 1);
        assert!(display.pixels().iter().all(|c| !c.has_nans()));
    }
}

#[test]
fn mirror_caustics_build_and_render() {
    let floor = Instance::new(
        Arc::new(Plane::new(Point3f::new(0.0, -1.0, 0.0), Vector3f::new(0.0, 1.0, 0.0))),
        Some(Arc::new(DiffuseShader::new(Spectrum::new(0.5)))),
    );
    let ball = Instance::new(
        Arc::new(Sphere::new(Point3f::new(0.0, 0.0, 0.0), 1.0)),
        Some(Arc::new(MirrorShader::new(Spectrum::new(0.9)))),
    );
    let scene = Arc::new(InstanceList::new(vec![floor, ball]));
    let lights: Vec<Arc<dyn LightSource>> = vec![Arc::new(PointLight::new(
        Point3f::new(0.0, 4.0, 0.0),
        Spectrum::new(500.0),
    ))];
    let camera = Arc::new(PinholeCamera::new(
        Point3f::new(0.0, 2.0, 6.0),
        Point3f::new(0.0, -0.5, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0,
        1.0,
    ));
    let mut world = World::new(camera, LightServer::new(scene, lights), 16, 16);
    let mut opts = options(&[("threads", 2), ("caustics.emit", 2000)]);
    opts.add_string("caustics", "kd");
    world.build(&opts, &CancelFlag::new()).unwrap();
    let display = FrameDisplay::new();
    world.render(&opts, &display, &CancelFlag::new()).unwrap();
    assert_eq!(display.ends.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_build_does_not_render() {
    let scene = Arc::new(InstanceList::new(Vec::new()));
    let camera = Arc::new(PinholeCamera::new(
        Point3f::new(0.0, 0.0, 5.0),
        Point3f::new(0.0, 0.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0,
        1.0,
    ));
    let mut world = World::new(camera, LightServer::new(scene, Vec::new()), 16, 16);
    let mut opts = ParamSet::default();
    opts.add_string("caustics", "kd");
    let display = FrameDisplay::new();
    assert!(world.render(&opts, &display, &CancelFlag::new()).is_err());
    assert!(!world.is_built());
    assert_eq!(display.begins.load(Ordering::SeqCst), 0);
}

/// GI engine that cannot be set up for any scene.
struct UnusableGi {
    inits: Arc<AtomicUsize>,
}

impl GiEngine for UnusableGi {
    fn init(&mut self, _scene: &dyn Scene) -> bool {
        self.inits.fetch_add(1, Ordering::SeqCst);
        false
    }
    fn get_irradiance(&self, _state: &mut ShadingState, _diffuse_reflectance: &Spectrum) -> Spectrum {
        Spectrum::new(1.0)
    }
    fn get_global_radiance(&self, _state: &mut ShadingState) -> Spectrum {
        Spectrum::new(1.0)
    }
}

#[test]
fn gi_init_failure_stops_the_render() {
    let inits = Arc::new(AtomicUsize::new(0));
    let mut world = small_world(16, 16);
    world.light_server.set_gi_engine(Some(Box::new(UnusableGi {
        inits: inits.clone(),
    })));
    let display = FrameDisplay::new();
    let result = world.render(&options(&[("threads", 2)]), &display, &CancelFlag::new());
    assert!(matches!(result, Err(LumenError::GiEngineInit(_))));
    assert_eq!(inits.load(Ordering::SeqCst), 1);
    assert!(!world.is_built());
    assert_eq!(display.begins.load(Ordering::SeqCst), 0);
    assert_eq!(display.updates.load(Ordering::SeqCst), 0);
    assert_eq!(display.ends.load(Ordering::SeqCst), 0);
}

/// Flat colored source that raises the cancel flag after a number of
/// samples.
struct CancellingSource<'a> {
    calls: AtomicUsize,
    limit: usize,
    cancel: &'a CancelFlag,
}

impl<'a> RadianceSource for CancellingSource<'a> {
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
        if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.limit {
            self.cancel.cancel();
        }
        Some(RadianceSample {
            result: Spectrum::new(0.25),
            instance: Some(1),
            shader: Some(1),
            normal: Some(Vector3f::new(0.0, 0.0, 1.0)),
        })
    }
}

#[test]
fn cancellation_stops_after_the_current_bucket() {
    let cancel = CancelFlag::new();
    let source = CancellingSource {
        calls: AtomicUsize::new(0),
        limit: 10,
        cancel: &cancel,
    };
    let mut renderer = BucketRenderer::new();
    renderer.prepare(&options(&[("bucket.size", 16)]), 64, 64);
    let display = FrameDisplay::new();
    renderer.render(&source, &display, 1, &cancel);
    assert!(cancel.is_cancelled());
    assert_eq!(display.begins.load(Ordering::SeqCst), 1);
    assert_eq!(display.ends.load(Ordering::SeqCst), 1);
    // 16 buckets in total, the single worker finishes the one it holds
    assert_eq!(display.updates.load(Ordering::SeqCst), 1);
}

#[test]
fn cancelled_before_start_still_finishes_the_display() {
    let cancel = CancelFlag::new();
    cancel.cancel();
    let mut renderer = BucketRenderer::new();
    renderer.prepare(&ParamSet::default(), 64, 64);
    let display = FrameDisplay::new();
    let source = CancellingSource {
        calls: AtomicUsize::new(0),
        limit: usize::MAX,
        cancel: &cancel,
    };
    renderer.render(&source, &display, 4, &cancel);
    assert_eq!(display.updates.load(Ordering::SeqCst), 0);
    assert_eq!(display.ends.load(Ordering::SeqCst), 1);
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn shader_override_replaces_every_shader() {
    let mut world = small_world(16, 16);
    world
        .light_server
        .set_shader_override(Some(Arc::new(ConstantShader::new(Spectrum::rgb(0.0, 1.0, 0.0)))), false);
    let display = FrameDisplay::new();
    world
        .render(&options(&[("threads", 1)]), &display, &CancelFlag::new())
        .unwrap();
    let center = display.get_pixel(8, 8).unwrap();
    assert!((center.c[1] - 1.0).abs() < 1e-4);
    assert!(center.c[0].abs() < 1e-4);
}
