use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use anyhow::{bail, Context};
use log::info;
use rand::prelude::*;
use rand::rngs::SmallRng;

use glint::camera::Camera;
use glint::config::RenderDesc;
use glint::ppm::write_ppm;
use glint::vec3::Vec3;
use glint::{par_cast, random_scene, CancelToken};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let scene_path = args.next();
    let out_path = args.next().unwrap_or_else(|| "output.ppm".to_string());
    if args.next().is_some() {
        bail!("usage: glint [scene.json] [output.ppm]");
    }

    let (scene, camera, nx, ny, depth, seed) = match &scene_path {
        Some(path) => {
            let desc =
                RenderDesc::from_file(path).with_context(|| format!("loading scene {}", path))?;
            let (scene, camera) = desc.build();
            (
                scene,
                camera,
                desc.width,
                desc.height(),
                desc.bounce_limit,
                desc.seed,
            )
        }
        None => {
            const NX: usize = 720;
            const NY: usize = 405;
            const NS: usize = 100;
            const SEED: u64 = 0xDEADBEEF;

            let mut rng = SmallRng::seed_from_u64(SEED);
            let scene = random_scene(&mut rng);
            let camera = Camera::look(
                Vec3(13., 2., 3.),
                Vec3(0., 0., 0.),
                Vec3(0., 1., 0.),
                20.,
                NX as f64 / NY as f64,
                NS,
            );
            (scene, camera, NX, NY, 10, SEED)
        }
    };

    info!(
        "rendering {}x{} at {} samples/pixel, {} objects",
        nx,
        ny,
        camera.samples_per_pixel(),
        scene.len()
    );

    let cancel = CancelToken::new();
    let start = Instant::now();
    let image = match par_cast(nx, ny, &camera, &scene, depth, &cancel, seed) {
        Some(image) => image,
        None => bail!("render cancelled"),
    };
    info!("rendered in {:?}", start.elapsed());

    let file = File::create(&out_path).with_context(|| format!("creating {}", out_path))?;
    write_ppm(&image, &mut BufWriter::new(file))?;
    info!("wrote {}", out_path);

    Ok(())
}
