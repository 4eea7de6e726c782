use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// A three-vector of doubles, used as a color, coordinate, etc.
///
/// The components of the vector can be accessed in three ways:
///
/// 1. Tuple-style: `v.0`, `v.1`, `v.2`.
/// 2. Using the `Axis` enum: `v[X]`, `v[Y]`, `v[Z]`. This requires a `use
///    glint::vec3::Axis::*` statement.
/// 2. Using the `Channel` enum: `v[R]`, `v[G]`, `v[B]`. This requires a `use
///    glint::vec3::Channel::*` statement.
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec3(pub f64, pub f64, pub f64);

impl Vec3 {
    /// Generates a random `Vec3` inside a sphere with unit radius. The length
    /// of the result is between 0 and 1.
    pub fn in_unit_sphere(rng: &mut impl Rng) -> Self {
        loop {
            let v = 2. * rng.gen::<Vec3>() - Vec3::from(1.);
            if v.dot(v) < 1. {
                return v;
            }
        }
    }

    /// Generates a random `Vec3` inside the unit ball, flipped where needed so
    /// that it falls in the hemisphere `normal` points into.
    pub fn in_hemisphere(normal: Vec3, rng: &mut impl Rng) -> Self {
        let v = Self::in_unit_sphere(rng);
        if v.dot(normal) > 0. {
            v
        } else {
            -v
        }
    }

    /// Computes the dot product of two vectors.
    #[inline]
    pub fn dot(&self, other: Self) -> f64 {
        self.zip_with(other, core::ops::Mul::mul)
            .reduce(core::ops::Add::add)
    }

    /// Computes the cross product of two vectors.
    pub fn cross(&self, other: &Self) -> Self {
        Vec3(
            self.1 * other.2 - self.2 * other.1,
            -(self.0 * other.2 - self.2 * other.0),
            self.0 * other.1 - self.1 * other.0,
        )
    }

    /// Gets the length/magnitude of a vector.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Gets the squared length of a vector, skipping the square root.
    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.dot(*self)
    }

    /// Produces a vector collinear with `self` but with unit length. That is,
    /// the result points the same direction as `self` relative to the origin.
    ///
    /// Normalizing a zero-length vector is a caller bug.
    pub fn into_unit(self) -> Self {
        debug_assert!(self.length_squared() > 0.);
        self / self.length()
    }

    /// Checks whether every component is within `1e-8` of zero, which is how
    /// degenerate scatter directions get detected.
    pub fn near_zero(&self) -> bool {
        self.map(f64::abs).reduce(f64::max) < 1e-8
    }

    /// Applies `f` to each element of the vector in turn, giving a new vector.
    #[inline]
    pub fn map(self, mut f: impl FnMut(f64) -> f64) -> Self {
        Vec3(f(self.0), f(self.1), f(self.2))
    }

    /// Combines each corresponding element of `self` and `other` by giving them
    /// as arguments to function `f`. The results are collected into a new
    /// vector.
    #[inline]
    pub fn zip_with(self, other: Vec3, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        Vec3(f(self.0, other.0), f(self.1, other.1), f(self.2, other.2))
    }

    /// Combines the elements of `self` using `f` until only one result remains.
    #[inline]
    pub fn reduce(self, f: impl Fn(f64, f64) -> f64) -> f64 {
        f(f(self.0, self.1), self.2)
    }
}

/// Broadcasts a single value to all vector lanes.
impl From<f64> for Vec3 {
    #[inline]
    fn from(v: f64) -> Self {
        Vec3(v, v, v)
    }
}

/// Element-wise multiplication (Hadamard product). I have reservations about
/// making this available as `*`, but it sure is convenient...
impl std::ops::Mul for Vec3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        self.zip_with(rhs, std::ops::Mul::mul)
    }
}

/// `scalar * vector`
impl std::ops::Mul<Vec3> for f64 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::from(self) * rhs
    }
}

/// `vector / scalar`
impl std::ops::Div<f64> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn div(self, rhs: f64) -> Self::Output {
        self.map(|x| x / rhs)
    }
}

/// `vector + vector`
impl std::ops::Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Self::Output {
        self.zip_with(rhs, std::ops::Add::add)
    }
}

/// `scalar + vector`
impl std::ops::Add<Vec3> for f64 {
    type Output = Vec3;

    #[inline]
    fn add(self, rhs: Vec3) -> Self::Output {
        rhs.map(|x| self + x)
    }
}

/// `vector - vector`
impl std::ops::Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, rhs: Vec3) -> Self::Output {
        self.zip_with(rhs, std::ops::Sub::sub)
    }
}

/// `-vector`
impl std::ops::Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Self::Output {
        self.map(std::ops::Neg::neg)
    }
}

/// Allow accumulation of vectors from an iterator.
impl std::iter::Sum for Vec3 {
    #[inline]
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Self>,
    {
        iter.fold(Vec3::default(), std::ops::Add::add)
    }
}

/// Allow `Vec3` to be produced by `Rng::gen`.
///
/// The resulting vector has each component in the half-open range `[0,1)`. Note
/// that this is *not* a unit vector.
impl rand::distributions::Distribution<Vec3> for rand::distributions::Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        Vec3(rng.gen(), rng.gen(), rng.gen())
    }
}

/// Names for vector lanes when used as a color.
///
/// `Vec3` has an `Index` impl for `Channel`, so you can use `Channel` values to
/// select components from a `Vec3`:
///
/// ```
/// use glint::vec3::{Vec3, Channel::*};
///
/// let v = Vec3(1., 2., 3.);
/// assert_eq!(v[R], 1.);
/// assert_eq!(v[G], 2.);
/// assert_eq!(v[B], 3.);
/// ```
#[derive(Copy, Clone, Debug)]
pub enum Channel {
    /// Red.
    R,
    /// Green.
    G,
    /// Blue.
    B,
}

use Channel::*;

impl ::std::ops::Index<Channel> for Vec3 {
    type Output = f64;

    fn index(&self, idx: Channel) -> &Self::Output {
        match idx {
            R => &self.0,
            G => &self.1,
            B => &self.2,
        }
    }
}

/// Names for vector lanes when used as a coordinate.
///
/// `Vec3` has an `Index` impl for `Axis`, so you can use `Axis` values to
/// select components from a `Vec3`:
///
/// ```
/// use glint::vec3::{Vec3, Axis::*};
///
/// let v = Vec3(1., 2., 3.);
/// assert_eq!(v[X], 1.);
/// assert_eq!(v[Y], 2.);
/// assert_eq!(v[Z], 3.);
/// ```
#[derive(Copy, Clone, Debug)]
pub enum Axis {
    X,
    Y,
    Z,
}

use Axis::*;

impl ::std::ops::Index<Axis> for Vec3 {
    type Output = f64;

    fn index(&self, idx: Axis) -> &Self::Output {
        match idx {
            X => &self.0,
            Y => &self.1,
            Z => &self.2,
        }
    }
}

/// Reflects a vector `v` around a surface normal `n`.
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2. * v.dot(n) * n
}

/// Refracts the unit vector `uv` through a surface with unit normal `n`, by
/// splitting the transmitted ray into its components perpendicular and
/// parallel to `n`. `etai_over_etat` is the ratio of the refractive index on
/// the incident side over the transmitted side.
///
/// Total internal reflection is the caller's problem: when the ratio and
/// incident angle rule out a transmitted ray, the result is meaningless.
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1. - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;

    #[test]
    fn reflect_preserves_length_and_flips_incidence() {
        let cases = [
            (Vec3(1., -1., 0.), Vec3(0., 1., 0.)),
            (Vec3(3., -2., 7.), Vec3(1., 1., 1.).into_unit()),
            (Vec3(-0.3, 0.1, -5.), Vec3(0., 0., 1.)),
        ];
        for &(v, n) in &cases {
            let r = reflect(v, n);
            assert!((r.length() - v.length()).abs() < 1e-12);
            assert!((r.dot(n) + v.dot(n)).abs() < 1e-12);
        }
    }

    #[test]
    fn refract_through_identity_medium_is_identity() {
        let uv = Vec3(1., -2., 0.5).into_unit();
        let n = Vec3(0., 1., 0.);
        let out = refract(uv, n, 1.);
        assert!((out - uv).length() < 1e-12);
    }

    #[test]
    fn near_zero_thresholds() {
        assert!(Vec3(1e-9, -1e-9, 0.).near_zero());
        assert!(!Vec3(1e-7, 0., 0.).near_zero());
        assert!(!Vec3(0., 0., -1.).near_zero());
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Vec3(1., 0., 0.);
        let y = Vec3(0., 1., 0.);
        assert_eq!(x.cross(&y), Vec3(0., 0., 1.));
        assert_eq!(y.cross(&x), Vec3(0., 0., -1.));
    }

    #[test]
    fn into_unit_produces_unit_length() {
        let v = Vec3(3., 4., 12.).into_unit();
        assert!((v.length() - 1.).abs() < 1e-12);
    }

    #[test]
    fn in_unit_sphere_stays_inside() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(Vec3::in_unit_sphere(&mut rng).length() < 1.);
        }
    }

    #[test]
    fn in_hemisphere_respects_normal() {
        let mut rng = SmallRng::seed_from_u64(2);
        let n = Vec3(0., 1., 0.);
        for _ in 0..100 {
            assert!(Vec3::in_hemisphere(n, &mut rng).dot(n) >= 0.);
        }
    }
}
