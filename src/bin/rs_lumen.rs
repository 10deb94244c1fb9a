// std
use std::path::PathBuf;
use std::sync::Arc;
// others
use anyhow::Context;
use clap::Parser;
// lumen
use rs_lumen::accelerators::instancelist::InstanceList;
use rs_lumen::cameras::pinhole::PinholeCamera;
use rs_lumen::core::geometry::{Point3f, Vector3f};
use rs_lumen::core::instance::Instance;
use rs_lumen::core::light::LightSource;
use rs_lumen::core::lightserver::LightServer;
use rs_lumen::core::lumen::{Float, Spectrum};
use rs_lumen::core::parallel::CancelFlag;
use rs_lumen::core::paramset::ParamSet;
use rs_lumen::core::world::World;
use rs_lumen::displays::file::FileDisplay;
use rs_lumen::lights::point::PointLight;
use rs_lumen::shaders::diffuse::DiffuseShader;
use rs_lumen::shaders::mirror::MirrorShader;
use rs_lumen::shaders::primid::PrimIdShader;
use rs_lumen::shapes::plane::Plane;
use rs_lumen::shapes::sphere::Sphere;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render the built-in demo scene (two spheres on a floor, one of
/// them a mirror) with the bucket renderer.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// image width in pixels
    #[arg(long, default_value_t = 640)]
    width: i32,
    /// image height in pixels
    #[arg(long, default_value_t = 480)]
    height: i32,
    /// use specified number of threads for rendering (0 = all cores)
    #[arg(short = 't', long = "nthreads", default_value_t = 0)]
    nthreads: i32,
    /// minimum anti-aliasing depth
    #[arg(long = "aa-min", default_value_t = 0, allow_hyphen_values = true)]
    aa_min: i32,
    /// maximum anti-aliasing depth
    #[arg(long = "aa-max", default_value_t = 2, allow_hyphen_values = true)]
    aa_max: i32,
    /// supersamples taken per image sample
    #[arg(long, default_value_t = 1)]
    samples: i32,
    /// contrast threshold for refinement
    #[arg(long, default_value_t = 0.1)]
    contrast: Float,
    /// jitter sample positions inside their subpixels
    #[arg(long)]
    jitter: bool,
    /// show the sampled fraction of every pixel instead of colors
    #[arg(long = "aa-display")]
    aa_display: bool,
    /// pixel reconstruction filter
    #[arg(long, default_value = "box")]
    filter: String,
    /// bucket size in pixels
    #[arg(long = "bucket-size", default_value_t = 32)]
    bucket_size: i32,
    /// bucket order, e.g. "hilbert" or "reverse spiral"
    #[arg(long = "bucket-order", default_value = "hilbert")]
    bucket_order: String,
    /// global illumination engine (none, ambocc, fake, path)
    #[arg(long, default_value = "none")]
    gi: String,
    /// caustic photon map (none, kd)
    #[arg(long, default_value = "none")]
    caustics: String,
    /// number of caustic photons to emit
    #[arg(long = "caustics-emit", default_value_t = 100000)]
    caustics_emit: i32,
    /// shading cache rate (0 disables the cache)
    #[arg(long = "shading-cache", default_value_t = 0.0)]
    shading_cache: Float,
    /// color every primitive by its id
    #[arg(long = "prim-id")]
    prim_id: bool,
    /// output image (format follows the extension)
    #[arg(short, long, default_value = "lumen.png")]
    output: PathBuf,
}

impl Cli {
    fn to_options(&self) -> ParamSet {
        let mut options: ParamSet = ParamSet::default();
        options.add_int("threads", self.nthreads);
        options.add_int("aa.min", self.aa_min);
        options.add_int("aa.max", self.aa_max);
        options.add_int("aa.samples", self.samples);
        options.add_float("aa.contrast", self.contrast);
        options.add_bool("aa.jitter", self.jitter);
        options.add_bool("aa.display", self.aa_display);
        options.add_string("filter", &self.filter);
        options.add_int("bucket.size", self.bucket_size);
        options.add_string("bucket.order", &self.bucket_order);
        options.add_string("gi.engine", &self.gi);
        options.add_string("caustics", &self.caustics);
        options.add_int("caustics.emit", self.caustics_emit);
        options.add_float("shading.cache", self.shading_cache);
        options
    }
}

fn demo_world(args: &Cli) -> World {
    let floor = Instance::new(
        Arc::new(Plane::new(Point3f::new(0.0, -1.0, 0.0), Vector3f::new(0.0, 1.0, 0.0))),
        Some(Arc::new(DiffuseShader::new(Spectrum::rgb(0.7, 0.7, 0.7)))),
    );
    let matte = Instance::new(
        Arc::new(Sphere::new(Point3f::new(-1.1, 0.0, 0.0), 1.0)),
        Some(Arc::new(DiffuseShader::new(Spectrum::rgb(0.8, 0.2, 0.15)))),
    );
    let mirror = Instance::new(
        Arc::new(Sphere::new(Point3f::new(1.1, 0.0, 0.5), 1.0)),
        Some(Arc::new(MirrorShader::new(Spectrum::rgb(0.9, 0.9, 0.9)))),
    );
    let scene = Arc::new(InstanceList::new(vec![floor, matte, mirror]));
    let lights: Vec<Arc<dyn LightSource>> = vec![Arc::new(PointLight::new(
        Point3f::new(2.0, 5.0, 4.0),
        Spectrum::new(800.0),
    ))];
    let mut light_server: LightServer = LightServer::new(scene, lights);
    if args.prim_id {
        light_server.set_shader_override(Some(Arc::new(PrimIdShader)), false);
    }
    let aspect: Float = args.width.max(1) as Float / args.height.max(1) as Float;
    let camera = Arc::new(PinholeCamera::new(
        Point3f::new(0.0, 1.5, 7.0),
        Point3f::new(0.0, 0.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0,
        aspect,
    ));
    World::new(camera, light_server, args.width, args.height)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Cli = Cli::parse();
    log::info!(
        "lumen version {} [Detected {} cores]",
        VERSION,
        num_cpus::get()
    );
    let options: ParamSet = args.to_options();
    let mut world: World = demo_world(&args);
    let cancel: CancelFlag = CancelFlag::new();
    world
        .build(&options, &cancel)
        .context("failed to build the demo scene")?;
    // the display writes the image when the render ends
    let display: FileDisplay = FileDisplay::new(args.output.clone());
    world
        .render(&options, &display, &cancel)
        .with_context(|| format!("failed to render {}", args.output.display()))?;
    Ok(())
}
