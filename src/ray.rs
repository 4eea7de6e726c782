use crate::vec3::Vec3;

/// A ray, beginning at `origin` and extending along `direction`.
///
/// `direction` is not required to be a unit vector.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Finds the point along the ray at distance `t` from the origin. Positive
    /// values of `t` represent positions forward from the origin, and negative
    /// values, behind the origin.
    pub fn point_at_parameter(&self, t: f64) -> Vec3 {
        self.origin + t * self.direction
    }
}
