use std::ops::Range;

use crate::material::Material;
use crate::ray::Ray;
use crate::vec3::Vec3;

/// An object in a scene.
///
/// The primary purpose of an `Object` is to interact with rays of light using
/// the `hit` method.
pub trait Object: std::fmt::Debug + Sync + Send {
    /// Tests if `ray` intersects the object `self`, and if so, if that
    /// intersection occurs within `t_range` along the ray. (Recall that `Ray`
    /// is defined in terms of a `t` value that refers to points along the ray.)
    ///
    /// The `t_range` serves two purposes here. First, if the intersection
    /// occurs at *negative* `t`, the object is behind the photons instead of in
    /// front of them, and the intersection is an illusion. Second, while the
    /// upper end of `t_range` starts out as infinity, we adjust it down as we
    /// find objects along `ray`. Once we've found an object at position `t`, we
    /// can ignore any objects at positions greater than `t`.
    ///
    /// Both ends of `t_range` are exclusive.
    fn hit<'o>(&'o self, ray: &Ray, t_range: Range<f64>) -> Option<HitRecord<'o>>;
}

/// A sphere.
#[derive(Debug)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Vec3,
    /// Radius of the sphere.
    pub radius: f64,
    /// Material of the sphere.
    pub material: Material,
}

impl Object for Sphere {
    #[inline]
    fn hit<'o>(&'o self, ray: &Ray, t_range: Range<f64>) -> Option<HitRecord<'o>> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;
        let discriminant = b * b - a * c;
        if discriminant < 0. {
            return None;
        }

        // Smaller root first; we want the entry intersection when both are in
        // range.
        for &t in &[
            (-b - discriminant.sqrt()) / a,
            (-b + discriminant.sqrt()) / a,
        ] {
            if t > t_range.start && t < t_range.end {
                let p = ray.point_at_parameter(t);
                let outward_normal = (p - self.center) / self.radius;
                let front_face = ray.direction.dot(outward_normal) < 0.;
                return Some(HitRecord {
                    t,
                    p,
                    normal: if front_face {
                        outward_normal
                    } else {
                        -outward_normal
                    },
                    front_face,
                    material: &self.material,
                });
            }
        }
        None
    }
}

/// A description of a `Ray` hitting an `Object`. This stores information needed
/// for rendering later.
///
/// The `'m` lifetime refers to the `Material` of the `Object`, which we capture
/// by reference. Thus, a `HitRecord` cannot outlive the `Object` it refers to.
#[derive(Clone)]
pub struct HitRecord<'m> {
    /// Position along the ray, expressed in distance from the origin.
    pub t: f64,
    /// Position along the ray, as an actual point.
    pub p: Vec3,
    /// Surface normal of the object at the hit position, unit length, oriented
    /// to oppose the incoming ray.
    pub normal: Vec3,
    /// Whether the ray originated outside the surface. When false, `normal` is
    /// the flipped outward normal.
    pub front_face: bool,
    /// Material of the object at the hit position.
    pub material: &'m Material,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_sphere(center: Vec3, radius: f64) -> Sphere {
        Sphere {
            center,
            radius,
            material: Material::Lambertian {
                albedo: Vec3::from(0.5),
            },
        }
    }

    #[test]
    fn head_on_hit_reports_entry_point() {
        let sphere = test_sphere(Vec3(0., 0., -2.), 0.5);
        let ray = Ray {
            origin: Vec3::default(),
            direction: Vec3(0., 0., -1.),
        };

        let hit = sphere.hit(&ray, 0.0..f64::INFINITY).unwrap();
        assert!((hit.t - 1.5).abs() < 1e-12);
        assert!(hit.front_face);
        assert!((hit.normal - Vec3(0., 0., 1.)).length() < 1e-12);
        assert!((hit.normal.length() - 1.).abs() < 1e-12);
        // The hit point lies on the surface.
        assert!(((hit.p - sphere.center).length() - sphere.radius).abs() < 1e-9);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let sphere = test_sphere(Vec3(0., 0., -2.), 0.5);
        let ray = Ray {
            origin: Vec3::default(),
            direction: Vec3(0., 1., 0.),
        };
        assert!(sphere.hit(&ray, 0.0..f64::INFINITY).is_none());
    }

    #[test]
    fn sphere_behind_origin_misses() {
        let sphere = test_sphere(Vec3(0., 0., 2.), 0.5);
        let ray = Ray {
            origin: Vec3::default(),
            direction: Vec3(0., 0., -1.),
        };
        assert!(sphere.hit(&ray, 0.0..f64::INFINITY).is_none());
    }

    #[test]
    fn hit_from_inside_flips_the_normal() {
        let sphere = test_sphere(Vec3::default(), 2.);
        let ray = Ray {
            origin: Vec3::default(),
            direction: Vec3(0., 0., -1.),
        };

        let hit = sphere.hit(&ray, 0.0..f64::INFINITY).unwrap();
        assert!((hit.t - 2.).abs() < 1e-12);
        assert!(!hit.front_face);
        // Flipped to oppose the ray even though we're exiting.
        assert!((hit.normal - Vec3(0., 0., 1.)).length() < 1e-12);
    }

    #[test]
    fn range_ends_are_exclusive() {
        let sphere = test_sphere(Vec3(0., 0., -2.), 0.5);
        let ray = Ray {
            origin: Vec3::default(),
            direction: Vec3(0., 0., -1.),
        };

        // Entry root at t = 1.5 sits on either boundary.
        assert!(sphere.hit(&ray, 1.5..2.0).is_none());
        assert!(sphere.hit(&ray, 1.0..1.5).is_none());
        // The far root at t = 2.5 is still found when the near one is excluded
        // by the interval.
        let hit = sphere.hit(&ray, 2.0..3.0).unwrap();
        assert!((hit.t - 2.5).abs() < 1e-12);
    }

    #[test]
    fn grazing_ray_still_hits() {
        let sphere = test_sphere(Vec3(0., 0., -2.), 0.5);
        let ray = Ray {
            origin: Vec3(0., 0.5, 0.),
            direction: Vec3(0., 0., -1.),
        };
        let hit = sphere.hit(&ray, 0.0..f64::INFINITY).unwrap();
        assert!((hit.t - 2.).abs() < 1e-9);
    }
}
