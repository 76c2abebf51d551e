//! Sphere intersection.

use lumen_core::Sphere;
use lumen_math::{Interval, Ray};

use crate::hittable::{Hit, Hittable};

impl Hittable for Sphere {
    /// Only the near root is considered. A ray starting inside the sphere
    /// does not hit it, so refracted rays leave glass spheres through the
    /// scene behind them rather than the far wall.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<Hit> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let root = (h - discriminant.sqrt()) / a;
        if !ray_t.surrounds(root) {
            return None;
        }

        let point = ray.at(root);
        Some(Hit {
            t: root,
            point,
            normal: (point - self.center).normalize(),
            material: self.material,
        })
    }
}
