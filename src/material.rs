use rand::prelude::*;

use crate::object::HitRecord;
use crate::ray::Ray;
use crate::vec3::{reflect, refract, Vec3};

/// Material options for a rendered object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Material {
    /// An opaque material with a matte surface, where lighting is calculated
    /// using [Lambertian reflectance][lambert].
    ///
    /// [lambert]: https://en.wikipedia.org/wiki/Lambertian_reflectance
    Lambertian {
        /// The amount of light energy reflected in each color component, so
        /// `Vec3(1., 1., 1.)` is a white surface, and `Vec3(0., 0., 0.)` is
        /// totally black.
        albedo: Vec3,
    },
    /// A reflective material that looks like polished or frosted metal.
    Metal {
        albedo: Vec3,
        /// The amount of randomness introduced into reflected rays. A `fuzz` of
        /// 0 makes the surface look polished and mirror-smooth, while a `fuzz`
        /// of 1 produces a frosted, almost matte surface.
        fuzz: f64,
    },
    /// A transparent refractive material like glass or water.
    Dielectric {
        /// [Refractive index][ref-idx] of the material, which determines how
        /// much light is bent when traveling into or out of an object.
        ///
        /// [ref-idx]: https://en.wikipedia.org/wiki/Refractive_index
        ref_idx: f64,
        /// Extra jitter added to transmitted rays, giving frosted glass at
        /// larger values. 0 is perfectly clear.
        frost: f64,
    },
}

impl Material {
    /// Performs surface scattering from a material.
    ///
    /// When light traveling along `ray` reaches a surface made out of this
    /// material (intersection described by `hit`), some of it is absorbed and
    /// the rest is reflected or refracted. `scatter` returns a new `Ray`
    /// giving the outgoing direction of the light, and a `Vec3` with the
    /// amount of energy carried onward in each of red, green, and blue. None
    /// of these materials absorbs light outright, so there is always an
    /// outgoing ray.
    ///
    /// (In reality, light at a dielectric surface would be *both* reflected
    /// and refracted, but we choose one or the other randomly and use
    /// over-sampling to produce a blend.)
    pub fn scatter(&self, ray: &Ray, hit: &HitRecord, rng: &mut impl Rng) -> (Ray, Vec3) {
        match self {
            Material::Lambertian { albedo } => {
                let mut direction = hit.normal + Vec3::in_hemisphere(hit.normal, rng);
                if direction.near_zero() {
                    // The hemisphere sample canceled the normal almost
                    // exactly; scatter along the normal instead.
                    direction = hit.normal;
                }
                (
                    Ray {
                        origin: hit.p,
                        direction,
                    },
                    *albedo,
                )
            }
            Material::Metal { albedo, fuzz } => {
                let direction = reflect(ray.direction.into_unit(), hit.normal)
                    + *fuzz * Vec3::in_unit_sphere(rng);
                // Large fuzz values can push the ray under the surface. The
                // reference renderer accepts that artifact, and so do we.
                (
                    Ray {
                        origin: hit.p,
                        direction,
                    },
                    *albedo,
                )
            }
            Material::Dielectric { ref_idx, frost } => {
                let unit_in = ray.direction.into_unit();
                let refraction_ratio = if hit.front_face {
                    1. / ref_idx
                } else {
                    *ref_idx
                };

                let cos_theta = (-unit_in).dot(hit.normal).min(1.);
                let sin_theta = (1. - cos_theta * cos_theta).sqrt();

                let total_internal = refraction_ratio * sin_theta > 1.;
                let direction = if total_internal
                    || rng.gen::<f64>() < schlick(cos_theta, refraction_ratio)
                {
                    reflect(unit_in, hit.normal)
                } else {
                    refract(unit_in, hit.normal, refraction_ratio)
                        + *frost * Vec3::in_unit_sphere(rng)
                };

                (
                    Ray {
                        origin: hit.p,
                        direction,
                    },
                    // Transparent, nothing absorbed.
                    Vec3::from(1.),
                )
            }
        }
    }
}

/// [Schlick's approximation][schlick] for computing reflection vs. refraction
/// at a material surface.
///
/// [schlick]: https://en.wikipedia.org/wiki/Schlick%27s_approximation
#[inline]
fn schlick(cos: f64, ref_idx: f64) -> f64 {
    let r0 = (1. - ref_idx) / (1. + ref_idx);
    let r0 = r0 * r0;
    r0 + (1. - r0) * f64::powf(1. - cos, 5.)
}
