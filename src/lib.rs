#![deny(unsafe_code)]

pub mod camera;
pub mod config;
pub mod material;
pub mod object;
pub mod ppm;
pub mod ray;
pub mod vec3;

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;
use rand::prelude::*;
use rand::rngs::SmallRng;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::material::Material;
use crate::object::{HitRecord, Object, Sphere};
use crate::ray::Ray;
use crate::vec3::{Axis::*, Channel::*, *};

/// Offset of the valid hit interval away from a ray's origin. Scattered rays
/// start exactly on a surface, and without this offset they tend to re-hit
/// that surface at tiny `t` (shadow acne).
const T_MIN: f64 = 0.001;

/// An unordered, append-only collection of objects, answering closest-hit
/// queries by linear scan.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<Box<dyn Object>>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn add(&mut self, object: impl Object + 'static) {
        self.objects.push(Box::new(object));
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Finds the nearest intersection of `ray` with any object, within
    /// `t_range`.
    ///
    /// As hits are found, the upper end of the interval shrinks to the best
    /// `t` so far, so each remaining object is only tested against the range
    /// that could still beat it.
    pub fn hit_closest(&self, ray: &Ray, mut t_range: Range<f64>) -> Option<HitRecord<'_>> {
        let mut hit = None;
        for object in &self.objects {
            if let Some(rec) = object.hit(ray, t_range.clone()) {
                t_range.end = rec.t;
                hit = Some(rec);
            }
        }
        hit
    }
}

/// Computes the color seen along `ray` for the scene of objects `scene`.
///
/// This is the actual ray-tracing routine. It is the recursive estimator
/// `attenuation * color(scattered)` unrolled into a loop: `strength` carries
/// the running product of every attenuation so far, and the loop ends when
/// the ray escapes to the sky or the bounce budget runs out. A ray that runs
/// out of bounces contributes nothing.
pub fn color(scene: &Scene, mut ray: Ray, depth: usize, rng: &mut impl Rng) -> Vec3 {
    // Records the cumulative (product) attenuation of each surface we've
    // visited so far.
    let mut strength = Vec3::from(1.);

    for _ in 0..depth {
        match scene.hit_closest(&ray, T_MIN..f64::INFINITY) {
            Some(hit) => {
                let (scattered, attenuation) = hit.material.scatter(&ray, &hit, rng);
                strength = strength * attenuation;
                ray = scattered;
            }
            None => return strength * sky(&ray),
        }
    }

    Vec3::default()
}

/// Background radiance for rays that escape the scene: a vertical gradient
/// from white at the horizon to sky blue straight up.
pub fn sky(ray: &Ray) -> Vec3 {
    let unit_direction = ray.direction.into_unit();
    let t = 0.5 * (unit_direction[Y] + 1.);
    (1. - t) * Vec3::from(1.) + t * Vec3(0.5, 0.7, 1.0)
}

/// Cooperative cancellation for an in-flight render. Clones share one flag, so
/// a handle kept by the caller can stop a render running elsewhere.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A rendered pixel buffer: `width * height` pixels of three gamma-corrected
/// channels each, R, G, B, in `[0, 1]`, row-major with the top scanline first.
///
/// Display and file-output collaborators borrow this; the renderer owns it
/// only while filling it in.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: Vec<f64>,
}

impl Image {
    pub(crate) fn with_size(width: usize, height: usize) -> Self {
        Image {
            width,
            height,
            channels: Vec::with_capacity(width * height * 3),
        }
    }

    /// Averages `samples` summed radiance estimates and appends the result as
    /// the next pixel, applying square-root gamma correction per channel.
    pub(crate) fn push_pixel(&mut self, summed: Vec3, samples: usize) {
        let col = (summed / samples as f64).map(f64::sqrt);
        self.channels.push(col[R]);
        self.channels.push(col[G]);
        self.channels.push(col[B]);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The flat channel sequence, `width * height * 3` values once rendering
    /// has finished.
    pub fn channels(&self) -> &[f64] {
        &self.channels
    }
}

/// One pixel's worth of jittered samples, summed but not yet averaged.
fn sample_pixel(
    x: usize,
    y: usize,
    nx: usize,
    ny: usize,
    camera: &Camera,
    scene: &Scene,
    depth: usize,
    rng: &mut impl Rng,
) -> Vec3 {
    (0..camera.samples_per_pixel())
        .map(|_| {
            let u = (x as f64 + rng.gen::<f64>()) / (nx - 1) as f64;
            let v = (y as f64 + rng.gen::<f64>()) / (ny - 1) as f64;
            color(scene, camera.get_ray(u, v), depth, rng)
        })
        .sum()
}

/// Renders the scene serially into an `nx * ny` image, scanning rows from the
/// top of the image down, using the single generator `rng` throughout. For a
/// seeded generator the output is fully reproducible.
///
/// Both dimensions must be at least 2. Returns `None` if `cancel` fires
/// before the last scanline.
pub fn cast(
    nx: usize,
    ny: usize,
    camera: &Camera,
    scene: &Scene,
    depth: usize,
    cancel: &CancelToken,
    rng: &mut impl Rng,
) -> Option<Image> {
    debug_assert!(nx > 1 && ny > 1);

    let mut image = Image::with_size(nx, ny);
    for y in (0..ny).rev() {
        if cancel.is_cancelled() {
            return None;
        }
        debug!("scanlines remaining: {}", y);
        for x in 0..nx {
            let summed = sample_pixel(x, y, nx, ny, camera, scene, depth, rng);
            image.push_pixel(summed, camera.samples_per_pixel());
        }
    }
    Some(image)
}

/// Renders the scene with one rayon task per scanline.
///
/// Every row derives an independent generator from `seed`, so no worker
/// shares random state with another and the output for a given seed does not
/// depend on how rows get scheduled. The scene and camera are only read.
/// Returns `None` if `cancel` fires before every row has been rendered.
pub fn par_cast(
    nx: usize,
    ny: usize,
    camera: &Camera,
    scene: &Scene,
    depth: usize,
    cancel: &CancelToken,
    seed: u64,
) -> Option<Image> {
    debug_assert!(nx > 1 && ny > 1);

    let rows: Option<Vec<Vec<Vec3>>> = (0..ny)
        .into_par_iter()
        .rev()
        .map(|y| {
            if cancel.is_cancelled() {
                return None;
            }
            let mut rng = SmallRng::seed_from_u64(row_seed(seed, y));
            Some(
                (0..nx)
                    .map(|x| sample_pixel(x, y, nx, ny, camera, scene, depth, &mut rng))
                    .collect(),
            )
        })
        .collect();

    let mut image = Image::with_size(nx, ny);
    for row in rows? {
        for summed in row {
            image.push_pixel(summed, camera.samples_per_pixel());
        }
    }
    Some(image)
}

/// Splitmix-style stream separation, so adjacent rows get unrelated seeds.
fn row_seed(seed: u64, row: usize) -> u64 {
    seed ^ (row as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// The demo scene: a gray ground sphere, a grid of small randomized matte,
/// metal, and glass spheres, and three large feature spheres.
pub fn random_scene(rng: &mut impl Rng) -> Scene {
    let mut scene = Scene::new();

    scene.add(Sphere {
        center: Vec3(0., -1000., 0.),
        radius: 1000.,
        material: Material::Lambertian {
            albedo: Vec3::from(0.5),
        },
    });

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );
            if (center - Vec3(4., 0.2, 0.)).length() <= 0.9 {
                continue;
            }

            let choose_mat = rng.gen::<f64>();
            let material = if choose_mat < 0.8 {
                Material::Lambertian {
                    albedo: rng.gen::<Vec3>() * rng.gen::<Vec3>(),
                }
            } else if choose_mat < 0.95 {
                Material::Metal {
                    albedo: 0.5 * (1. + rng.gen::<Vec3>()),
                    fuzz: 0.5 * rng.gen::<f64>(),
                }
            } else {
                Material::Dielectric {
                    ref_idx: 1.5,
                    frost: 0.,
                }
            };
            scene.add(Sphere {
                center,
                radius: 0.2,
                material,
            });
        }
    }

    scene.add(Sphere {
        center: Vec3(0., 1., 0.),
        radius: 1.,
        material: Material::Dielectric {
            ref_idx: 1.5,
            frost: 0.,
        },
    });
    scene.add(Sphere {
        center: Vec3(-4., 1., 0.),
        radius: 1.,
        material: Material::Lambertian {
            albedo: Vec3(0.4, 0.2, 0.1),
        },
    });
    scene.add(Sphere {
        center: Vec3(4., 1., 0.),
        radius: 1.,
        material: Material::Metal {
            albedo: Vec3(0.7, 0.6, 0.5),
            fuzz: 0.,
        },
    });

    scene
}
