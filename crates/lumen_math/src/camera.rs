use glam::{Vec2, Vec3};
use crate::Ray;

/// Camera pose as supplied by the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width over height
    pub aspect: f32,
}

impl CameraPose {
    /// Create a new camera pose looking at `target`.
    ///
    /// The default 90 degree field of view maps uv [-1, 1] straight onto
    /// the basis vectors.
    pub fn new(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: std::f32::consts::FRAC_PI_2,
            aspect,
        }
    }

    /// Update aspect ratio (e.g., on window resize)
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// True when a ray-generation basis can be derived from this pose.
    pub fn is_valid(&self) -> bool {
        let forward = self.target - self.position;
        self.position.is_finite()
            && self.target.is_finite()
            && self.up.is_finite()
            && forward.length_squared() > 1e-8
            && forward.normalize().cross(self.up).length_squared() > 1e-8
            && self.fov_y > 0.0
            && self.fov_y < std::f32::consts::PI
            && self.aspect > 0.0
    }

    /// Derive the orthonormal ray-generation basis.
    pub fn basis(&self) -> CameraBasis {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        CameraBasis {
            origin: self.position,
            forward,
            right,
            up,
            plane_scale: (self.fov_y * 0.5).tan(),
            aspect: self.aspect,
        }
    }
}

/// Orthonormal basis used to turn pixel coordinates into primary rays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub origin: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// tan(fov_y / 2)
    pub plane_scale: f32,
    pub aspect: f32,
}

impl CameraBasis {
    /// Primary ray through `uv` in [0, 1]² (v = 0 at the bottom edge).
    pub fn ray(&self, uv: Vec2) -> Ray {
        let p = uv * 2.0 - Vec2::ONE;
        let u = p.x * self.aspect * self.plane_scale;
        let v = p.y * self.plane_scale;

        let direction = (self.forward + u * self.right + v * self.up).normalize();
        Ray::new(self.origin, direction)
    }
}
