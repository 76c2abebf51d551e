//! Hittable trait and Hit record for ray-object intersection.

use lumen_core::{MaterialId, Primitive, Scene, SceneObject};
use lumen_math::{Interval, Ray, Vec3};

/// Offset along the normal for secondary ray origins, and the minimum
/// accepted hit distance.
pub const EPSILON: f32 = 0.001;

/// Hits beyond this distance count as misses.
pub const MAX_DISTANCE: f32 = 10_000.0;

/// Interval every primary and secondary ray is tested against.
pub const TRACE_INTERVAL: Interval = Interval {
    min: EPSILON,
    max: MAX_DISTANCE,
};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Geometric outward normal (not flipped towards the ray)
    pub normal: Vec3,
    pub material: MaterialId,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest hit strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit>;
}

impl Hittable for Primitive {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        match self {
            Primitive::Sphere(sphere) => sphere.hit(ray, ray_t),
            Primitive::Cuboid(cuboid) => cuboid.hit(ray, ray_t),
        }
    }
}

impl Hittable for SceneObject {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        self.primitive.hit(ray, ray_t)
    }
}

impl Hittable for Scene {
    /// Linear scan in object order. On an exact tie the earlier object wins.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut closest_so_far = ray_t.max;

        for object in self.objects() {
            if let Some(hit) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = hit.t;
                closest = Some(hit);
            }
        }

        closest
    }
}

/// Nearest scene hit in `(EPSILON, MAX_DISTANCE)`.
#[inline]
pub fn intersect(scene: &Scene, ray: &Ray) -> Option<Hit> {
    scene.hit(ray, TRACE_INTERVAL)
}

/// True if anything blocks `ray` before `max_t`.
pub fn occluded(scene: &Scene, ray: &Ray, max_t: f32) -> bool {
    let ray_t = TRACE_INTERVAL.with_max(max_t.min(MAX_DISTANCE));
    scene.objects().iter().any(|object| object.hit(ray, ray_t).is_some())
}
