use crate::ray::Ray;
use crate::vec3::Vec3;

/// Maps normalized screen coordinates to primary rays.
///
/// The viewport is a virtual rectangle one unit in front of the camera along
/// its backward axis `w`; its size comes from the vertical field of view and
/// the aspect ratio. All of this is derived once at construction.
#[derive(Debug)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    samples_per_pixel: usize,
}

impl Camera {
    /// Builds a camera at `look_from` aimed at `look_at`. `up` picks the
    /// camera's roll, `fov` is the vertical field of view in degrees, and
    /// `aspect` is width over height.
    ///
    /// `look_from` and `look_at` must be distinct, and `up` must not be
    /// collinear with the view axis; configuration loading checks this before
    /// we get here.
    pub fn look(
        look_from: Vec3,
        look_at: Vec3,
        up: Vec3,
        fov: f64,
        aspect: f64,
        samples_per_pixel: usize,
    ) -> Self {
        let theta = fov * std::f64::consts::PI / 180.;
        let half_height = f64::tan(theta / 2.);
        let half_width = aspect * half_height;
        let origin = look_from;
        let w = (look_from - look_at).into_unit();
        let u = up.cross(&w).into_unit();
        let v = w.cross(&u);
        let lower_left_corner = origin - half_width * u - half_height * v - w;
        Camera {
            origin,
            lower_left_corner,
            horizontal: 2. * half_width * u,
            vertical: 2. * half_height * v,
            samples_per_pixel,
        }
    }

    /// Returns the primary ray through the viewport point `(s, t)`, where both
    /// coordinates run over `[0, 1]` from the lower left corner.
    pub fn get_ray(&self, s: f64, t: f64) -> Ray {
        Ray {
            origin: self.origin,
            direction: self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin,
        }
    }

    /// How many jittered samples the renderer should average per pixel.
    pub fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_camera() -> Camera {
        Camera::look(
            Vec3::default(),
            Vec3(0., 0., -1.),
            Vec3(0., 1., 0.),
            90.,
            1.,
            1,
        )
    }

    #[test]
    fn center_ray_points_at_the_target() {
        let camera = default_camera();
        let ray = camera.get_ray(0.5, 0.5);
        assert_eq!(ray.origin, Vec3::default());
        assert!((ray.direction.into_unit() - Vec3(0., 0., -1.)).length() < 1e-12);
    }

    #[test]
    fn corner_rays_are_symmetric() {
        let camera = default_camera();
        let ll = camera.get_ray(0., 0.).direction;
        let ur = camera.get_ray(1., 1.).direction;
        assert!((ll.0 + ur.0).abs() < 1e-12);
        assert!((ll.1 + ur.1).abs() < 1e-12);
        assert!((ll.2 - ur.2).abs() < 1e-12);
    }

    #[test]
    fn fov_sets_the_viewport_height() {
        // At fov 90 and aspect 1 the viewport spans [-1, 1] on both axes at
        // distance 1.
        let camera = default_camera();
        let top = camera.get_ray(0.5, 1.).direction;
        assert!((top.1 / -top.2 - 1.).abs() < 1e-9);
    }
}
