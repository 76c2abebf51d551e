// Rigid transforms for rotated scene volumes
//
// A volume is authored in an un-rotated local frame centered on its pivot.
// Rays are brought into that frame; normals are rotated back out.

use glam::{Quat, Vec3};
use crate::Ray;

/// Rotation about a pivot point (no scale, no shear).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// World-space position of the local origin
    pub pivot: Vec3,
    /// Local-to-world rotation (unit quaternion)
    pub rotation: Quat,
}

impl RigidTransform {
    /// Create a transform from a pivot and a local-to-world rotation.
    pub fn new(pivot: Vec3, rotation: Quat) -> Self {
        Self {
            pivot,
            rotation: rotation.normalize(),
        }
    }

    /// Rotation about Y, then X, then Z (angles in radians).
    ///
    /// World = Rz * Rx * Ry * local.
    pub fn from_yxz(pivot: Vec3, y: f32, x: f32, z: f32) -> Self {
        let rotation = Quat::from_rotation_z(z) * Quat::from_rotation_x(x) * Quat::from_rotation_y(y);
        Self::new(pivot, rotation)
    }

    /// Bring a world-space ray into the local frame.
    ///
    /// Lengths are preserved, so hit distances are valid in both frames.
    pub fn to_local_ray(&self, ray: &Ray) -> Ray {
        let inverse = self.rotation.conjugate();
        Ray::new(
            inverse * (ray.origin - self.pivot),
            inverse * ray.direction,
        )
    }

    /// Rotate a local direction (e.g. a surface normal) into world space.
    pub fn to_world_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Map a local point into world space.
    pub fn to_world_point(&self, point: Vec3) -> Vec3 {
        self.pivot + self.rotation * point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_point_round_trip() {
        let transform = RigidTransform::from_yxz(Vec3::new(180.0, 140.0, 205.0), PI / 4.0, PI / 4.0, 0.0);
        let local = Vec3::new(5.0, -3.0, 2.0);
        let world = transform.to_world_point(local);

        let ray = transform.to_local_ray(&Ray::new(world, Vec3::X));
        assert!((ray.origin - local).length() < 1e-3);
    }

    #[test]
    fn test_rotation_y_matches_right_handed_convention() {
        // 90 degrees about Y takes +X to -Z
        let transform = RigidTransform::from_yxz(Vec3::ZERO, PI / 2.0, 0.0, 0.0);
        let v = transform.to_world_vector(Vec3::X);
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_order_is_y_then_x() {
        let transform = RigidTransform::from_yxz(Vec3::ZERO, PI / 2.0, PI / 2.0, 0.0);
        // Y: +X -> -Z, then X: -Z -> +Y
        let v = transform.to_world_vector(Vec3::X);
        assert!((v - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_local_ray_preserves_length() {
        let transform = RigidTransform::from_yxz(Vec3::new(1.0, 2.0, 3.0), -1.15, 0.3, 0.2);
        let dir = Vec3::new(0.3, -0.5, 0.8).normalize();
        let local = transform.to_local_ray(&Ray::new(Vec3::ZERO, dir));
        assert!((local.direction.length() - 1.0).abs() < 1e-5);

        let back = transform.to_world_vector(local.direction);
        assert!((back - dir).length() < 1e-5);
    }
}
