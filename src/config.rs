//! Scene and render configuration.
//!
//! A render is described by a JSON document: the image geometry, the sampling
//! budget, the camera placement, and the sphere list with per-sphere
//! materials. Descriptions are validated before anything is built, so the
//! renderer itself can assume a well-formed scene and camera.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::material::Material;
use crate::object::Sphere;
use crate::vec3::Vec3;
use crate::Scene;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("image must be at least 2x2 pixels, got {width}x{height}")]
    ImageTooSmall { width: usize, height: usize },
    #[error("aspect ratio must be positive and finite, got {0}")]
    BadAspectRatio(f64),
    #[error("vertical fov must be inside (0, 180) degrees, got {0}")]
    BadFov(f64),
    #[error("look_from, look_at and view_up do not span a view basis")]
    DegenerateView,
    #[error("samples_per_pixel must be at least 1")]
    NoSamples,
    #[error("bounce_limit must be at least 1")]
    NoBounces,
    #[error("sphere {index}: radius must be finite and nonzero, got {radius}")]
    BadRadius { index: usize, radius: f64 },
}

/// On-disk description of a material, tagged by kind.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Diffuse {
        albedo: Vec3,
    },
    Metal {
        albedo: Vec3,
        #[serde(default)]
        fuzz: f64,
    },
    Dielectric {
        ref_idx: f64,
        #[serde(default)]
        frost: f64,
    },
}

impl From<MaterialDesc> for Material {
    fn from(desc: MaterialDesc) -> Self {
        match desc {
            MaterialDesc::Diffuse { albedo } => Material::Lambertian { albedo },
            MaterialDesc::Metal { albedo, fuzz } => Material::Metal { albedo, fuzz },
            MaterialDesc::Dielectric { ref_idx, frost } => {
                Material::Dielectric { ref_idx, frost }
            }
        }
    }
}

/// On-disk description of one sphere.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Vec3,
    pub radius: f64,
    pub material: MaterialDesc,
}

/// A full render description: everything the binary needs to produce an
/// image.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderDesc {
    /// Output width in pixels; the height follows from the aspect ratio.
    pub width: usize,
    pub aspect_ratio: f64,
    /// Vertical field of view in degrees.
    pub vertical_fov: f64,
    pub look_from: Vec3,
    pub look_at: Vec3,
    #[serde(default = "default_view_up")]
    pub view_up: Vec3,
    pub samples_per_pixel: usize,
    pub bounce_limit: usize,
    #[serde(default)]
    pub seed: u64,
    pub spheres: Vec<SphereDesc>,
}

fn default_view_up() -> Vec3 {
    Vec3(0., 1., 0.)
}

impl RenderDesc {
    /// Loads and validates a description from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let desc: RenderDesc = serde_json::from_reader(BufReader::new(file))?;
        desc.validate()?;
        Ok(desc)
    }

    /// Output height in pixels.
    pub fn height(&self) -> usize {
        (self.width as f64 / self.aspect_ratio) as usize
    }

    /// Rejects descriptions the renderer cannot handle, before any of the
    /// degenerate values can turn into NaNs mid-render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0. {
            return Err(ConfigError::BadAspectRatio(self.aspect_ratio));
        }
        let height = self.height();
        if self.width < 2 || height < 2 {
            // Pixel jitter divides by width-1 and height-1.
            return Err(ConfigError::ImageTooSmall {
                width: self.width,
                height,
            });
        }
        if !self.vertical_fov.is_finite() || self.vertical_fov <= 0. || self.vertical_fov >= 180. {
            return Err(ConfigError::BadFov(self.vertical_fov));
        }
        let w = self.look_from - self.look_at;
        if w.near_zero() || self.view_up.cross(&w).near_zero() {
            return Err(ConfigError::DegenerateView);
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::NoSamples);
        }
        if self.bounce_limit == 0 {
            return Err(ConfigError::NoBounces);
        }
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !sphere.radius.is_finite() || sphere.radius == 0. {
                return Err(ConfigError::BadRadius {
                    index,
                    radius: sphere.radius,
                });
            }
        }
        Ok(())
    }

    /// Builds the immutable scene and camera this description names. Call
    /// [`RenderDesc::validate`] first (loading via `from_file` already does).
    pub fn build(&self) -> (Scene, Camera) {
        let mut scene = Scene::new();
        for sphere in &self.spheres {
            scene.add(Sphere {
                center: sphere.center,
                radius: sphere.radius,
                material: sphere.material.into(),
            });
        }
        let camera = Camera::look(
            self.look_from,
            self.look_at,
            self.view_up,
            self.vertical_fov,
            self.aspect_ratio,
            self.samples_per_pixel,
        );
        (scene, camera)
    }
}
