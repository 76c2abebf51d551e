//! Next-event estimation against the area light.

use lumen_core::{Color, Scene};
use lumen_math::{Ray, Vec3};
use rand::RngCore;

use crate::hittable::{occluded, EPSILON};
use crate::rng::gen_f32;

/// Shadow rays stop this far short of the light sample.
pub const SHADOW_TOLERANCE: f32 = 0.1;

/// Incident radiance from one uniform sample on the scene's area light,
/// already divided by the sample pdf (1 / area).
///
/// The caller multiplies by its BRDF; for a Lambertian surface that is
/// `albedo / PI`. Returns zero for back-facing geometry or an occluded
/// sample.
pub fn sample_direct(scene: &Scene, point: Vec3, normal: Vec3, rng: &mut dyn RngCore) -> Color {
    let light = scene.light();
    let target = light.point_at(gen_f32(rng), gen_f32(rng));

    let to_light = target - point;
    let distance_squared = to_light.length_squared();
    let distance = distance_squared.sqrt();
    if distance <= EPSILON {
        return Color::ZERO;
    }
    let direction = to_light / distance;

    let n_dot_l = normal.dot(direction);
    let l_dot_n = (-direction).dot(light.normal);
    if n_dot_l <= 0.0 || l_dot_n <= 0.0 {
        return Color::ZERO;
    }

    let shadow_ray = Ray::new(point + normal * EPSILON, direction);
    if occluded(scene, &shadow_ray, distance - SHADOW_TOLERANCE) {
        return Color::ZERO;
    }

    let geometry = n_dot_l * l_dot_n / distance_squared;
    light.emission * geometry * light.area()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_back_facing_surface_gets_nothing() {
        let scene = Scene::cornell_box(80.0).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..32 {
            let direct = sample_direct(&scene, Vec3::new(278.0, 0.0, 400.0), Vec3::NEG_Y, &mut rng);
            assert_eq!(direct, Color::ZERO);
        }
    }

    #[test]
    fn test_open_floor_is_lit() {
        let scene = Scene::cornell_box(80.0).unwrap();
        let mut rng = StdRng::seed_from_u64(12);

        let mut total = Color::ZERO;
        for _ in 0..128 {
            let direct = sample_direct(&scene, Vec3::new(60.0, 0.0, 700.0), Vec3::Y, &mut rng);
            assert!(direct.min_element() >= 0.0);
            assert!(direct.is_finite());
            total += direct;
        }
        assert!(total.x > 0.0);
        // Neutral light, neutral estimate
        assert!((total.x - total.y).abs() < 1e-3 * total.x.max(1.0));
    }

    #[test]
    fn test_point_above_light_is_unlit() {
        let scene = Scene::cornell_box(80.0).unwrap();
        let mut rng = StdRng::seed_from_u64(13);

        // Top of the ceiling sees the light's back
        let direct = sample_direct(&scene, Vec3::new(278.0, 600.0, 400.0), Vec3::NEG_Y, &mut rng);
        assert_eq!(direct, Color::ZERO);
    }

    #[test]
    fn test_floor_under_tall_box_is_shadowed() {
        let scene = Scene::cornell_box(80.0).unwrap();
        let mut rng = StdRng::seed_from_u64(15);

        // The tall box hangs over this spot and blocks every light sample
        let point = Vec3::new(265.0, 0.0, 375.0);
        for _ in 0..64 {
            assert_eq!(sample_direct(&scene, point, Vec3::Y, &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_light_box_does_not_shadow_point_below_it() {
        let scene = Scene::cornell_box(80.0).unwrap();
        let mut rng = StdRng::seed_from_u64(16);
        let point = Vec3::new(278.0, 540.0, 400.0);

        for _ in 0..64 {
            let direct = sample_direct(&scene, point, Vec3::Y, &mut rng);
            assert!(direct.min_element() > 0.0, "sample was shadowed: {:?}", direct);
        }

        // Without the tolerance the emitting face itself would count as a blocker
        let target = scene.light().point_at(0.5, 0.5);
        let to_light = target - point;
        let shadow_ray = Ray::new(point + Vec3::Y * EPSILON, to_light.normalize());
        assert!(occluded(&scene, &shadow_ray, to_light.length() + 1.0));
        assert!(!occluded(&scene, &shadow_ray, to_light.length() - SHADOW_TOLERANCE));
    }

    #[test]
    fn test_estimate_scales_with_intensity() {
        let dim = Scene::cornell_box(10.0).unwrap();
        let bright = Scene::cornell_box(40.0).unwrap();
        let point = Vec3::new(60.0, 0.0, 700.0);

        let a = sample_direct(&dim, point, Vec3::Y, &mut StdRng::seed_from_u64(14));
        let b = sample_direct(&bright, point, Vec3::Y, &mut StdRng::seed_from_u64(14));
        assert!((b - a * 4.0).length() <= 1e-3 * b.length().max(1.0));
    }
}
