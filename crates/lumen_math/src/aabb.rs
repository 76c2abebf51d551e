use crate::{Ray, Vec3};

/// Relative slack used when deciding which face a surface point lies on.
const FACE_BIAS: f32 = 1.0001;

/// Axis-Aligned Bounding Box used directly as scene geometry.
///
/// An AABB is defined by its minimum and maximum corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from two corner points (in any order).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB centered on the origin with the given full size.
    pub fn centered(size: Vec3) -> Self {
        Self::from_points(size * -0.5, size * 0.5)
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half of the box size along each axis.
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// True when the box has zero or negative extent on some axis.
    pub fn is_degenerate(&self) -> bool {
        let size = self.max - self.min;
        !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0)
    }

    /// Slab test against all three axis pairs.
    ///
    /// Returns `(t_near, t_far)` when the ray line overlaps the box and the
    /// exit distance is not behind the origin. `t_near` is negative when the
    /// origin is inside the box.
    pub fn slab(&self, ray: &Ray) -> Option<(f32, f32)> {
        let inv_dir = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv_dir;
        let t1 = (self.max - ray.origin) * inv_dir;

        let t_near = t0.min(t1).max_element();
        let t_far = t0.max(t1).min_element();

        if t_near > t_far || t_far < 0.0 {
            return None;
        }
        Some((t_near, t_far))
    }

    /// Outward unit normal of the face containing `p`.
    ///
    /// The first axis (x, then y, then z) whose offset from the center
    /// reaches its half-extent within `FACE_BIAS` wins. Points that match no
    /// face fall back to the axis with the largest relative offset, so the
    /// result is always unit length.
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        let local = p - self.centroid();
        let half = self.half_extents();

        for axis in 0..3 {
            if local[axis].abs() >= half[axis] / FACE_BIAS {
                return Self::axis_normal(axis, local[axis]);
            }
        }

        let relative = local.abs() / half;
        let axis = if relative.x >= relative.y && relative.x >= relative.z {
            0
        } else if relative.y >= relative.z {
            1
        } else {
            2
        };
        Self::axis_normal(axis, local[axis])
    }

    fn axis_normal(axis: usize, coord: f32) -> Vec3 {
        let mut normal = Vec3::ZERO;
        normal[axis] = if coord < 0.0 { -1.0 } else { 1.0 };
        normal
    }

    /// The eight corners, ordered by bit pattern (x = bit 0, y = bit 1, z = bit 2).
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
        }
        corners
    }
}
