//! Box intersection, axis-aligned or rotated about a pivot.
//!
//! Rotated boxes are intersected in their local frame: the ray is brought in
//! with the inverse rotation, tested against the un-rotated bounds with the
//! slab method, and the face normal is rotated back out. Hit distances are
//! identical in both frames since the transform is rigid.

use lumen_core::Cuboid;
use lumen_math::{Interval, Ray};

use crate::hittable::{Hit, Hittable};

impl Hittable for Cuboid {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let local_ray = match &self.transform {
            Some(transform) => transform.to_local_ray(ray),
            None => *ray,
        };

        let (t_near, t_far) = self.bounds.slab(&local_ray)?;

        // Entry point, or the exit point for a ray starting inside
        let t = if t_near > ray_t.min {
            t_near
        } else if t_far > ray_t.min {
            t_far
        } else {
            return None;
        };
        if t >= ray_t.max {
            return None;
        }

        let local_normal = self.bounds.normal_at(local_ray.at(t));
        let normal = match &self.transform {
            Some(transform) => transform.to_world_vector(local_normal),
            None => local_normal,
        };

        Some(Hit {
            t,
            point: ray.at(t),
            normal,
            material: self.material,
        })
    }
}
