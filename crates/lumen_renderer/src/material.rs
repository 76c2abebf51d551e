//! Surface scattering for each material kind.
//!
//! `Material` itself is plain data in `lumen_core`; the `Scatter` trait adds
//! the sampling behavior the integrator needs. Every sampler returns the
//! continuation ray and the throughput weight for it.

use std::f32::consts::PI;

use lumen_core::{Color, Material};
use lumen_math::{Ray, Vec3};
use rand::RngCore;

use crate::hittable::{Hit, EPSILON};
use crate::rng::gen_f32;

/// Added to microfacet denominators.
const MICROFACET_EPSILON: f32 = 0.001;

/// Result of scattering a ray off a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Throughput multiplier for the scattered path
    pub attenuation: Color,
    /// Continuation ray
    pub scattered: Ray,
}

/// Sampling behavior of a material.
pub trait Scatter {
    /// Sample a continuation ray. `None` absorbs the path.
    fn scatter(&self, ray_in: &Ray, hit: &Hit, rng: &mut dyn RngCore) -> Option<ScatterResult>;
}

impl Scatter for Material {
    fn scatter(&self, ray_in: &Ray, hit: &Hit, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        match *self {
            Material::Diffuse { albedo } => Some(scatter_diffuse(albedo, hit, rng)),
            Material::Mirror { albedo } => Some(scatter_mirror(albedo, ray_in, hit)),
            Material::Light { .. } => None,
            Material::Glass { ior } => Some(scatter_glass(ior, ray_in, hit, rng)),
            Material::Microfacet { albedo, roughness } => scatter_microfacet(albedo, roughness, ray_in, hit, rng),
        }
    }
}

/// Cosine-weighted bounce; the cosine and 1/pi cancel against the pdf.
fn scatter_diffuse(albedo: Color, hit: &Hit, rng: &mut dyn RngCore) -> ScatterResult {
    let local = cosine_hemisphere(gen_f32(rng), gen_f32(rng));
    ScatterResult {
        attenuation: albedo,
        scattered: Ray::new(hit.point + hit.normal * EPSILON, to_world(local, hit.normal)),
    }
}

fn scatter_mirror(albedo: Color, ray_in: &Ray, hit: &Hit) -> ScatterResult {
    ScatterResult {
        attenuation: albedo,
        scattered: Ray::new(
            hit.point + hit.normal * EPSILON,
            reflect(ray_in.direction(), hit.normal),
        ),
    }
}

/// Smooth dielectric: one of reflection or refraction, chosen by Schlick
/// Fresnel. Lossless, so the throughput passes through untouched.
fn scatter_glass(ior: f32, ray_in: &Ray, hit: &Hit, rng: &mut dyn RngCore) -> ScatterResult {
    let direction = ray_in.direction();
    let d_dot_n = direction.dot(hit.normal);

    let entering = d_dot_n < 0.0;
    let (outward, eta) = if entering {
        (hit.normal, 1.0 / ior)
    } else {
        (-hit.normal, ior)
    };

    let reflected = || Ray::new(hit.point + outward * EPSILON, reflect(direction, outward));

    let Some(refracted) = refract(direction, outward, eta) else {
        // Total internal reflection
        return ScatterResult {
            attenuation: Color::ONE,
            scattered: reflected(),
        };
    };

    // Schlick's cosine is taken on the low-index side of the interface
    let cosine = if entering {
        -d_dot_n
    } else {
        (-outward).dot(refracted).max(0.0)
    };

    let scattered = if gen_f32(rng) < schlick_reflectance(cosine, ior) {
        reflected()
    } else {
        Ray::new(hit.point - outward * EPSILON, refracted)
    };

    ScatterResult {
        attenuation: Color::ONE,
        scattered,
    }
}

/// GGX reflection with importance-sampled microfacet normals.
///
/// With h drawn proportionally to D(h) * cos(theta_h), the estimator
/// f * cos(theta_l) / pdf(l) reduces to F * G * (v.h) / ((n.v) * (n.h)).
fn scatter_microfacet(
    albedo: Color,
    roughness: f32,
    ray_in: &Ray,
    hit: &Hit,
    rng: &mut dyn RngCore,
) -> Option<ScatterResult> {
    let n = hit.normal;
    let wo = -ray_in.direction().normalize();
    let alpha = roughness * roughness;

    let h = sample_ggx(n, alpha, gen_f32(rng), gen_f32(rng));
    let wi = reflect(-wo, h);

    let n_dot_l = n.dot(wi);
    if n_dot_l <= 0.0 {
        return None;
    }

    let n_dot_v = n.dot(wo).max(0.0);
    let n_dot_h = n.dot(h).max(0.0);
    let v_dot_h = wo.dot(h).max(0.0);

    let g = smith_g_schlick(n_dot_l, n_dot_v, roughness);
    let f = schlick_fresnel3(albedo, v_dot_h);
    let weight = g * v_dot_h / (n_dot_v * n_dot_h + MICROFACET_EPSILON);

    Some(ScatterResult {
        attenuation: f * weight,
        scattered: Ray::new(hit.point + n * EPSILON, wi),
    })
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface whose normal faces it.
///
/// `eta` is the ratio of indices (incident over transmitted). Returns `None`
/// on total internal reflection.
#[inline]
pub fn refract(i: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let n_dot_i = n.dot(i);
    let k = 1.0 - eta * eta * (1.0 - n_dot_i * n_dot_i);
    if k < 0.0 {
        return None;
    }
    Some(eta * i - (eta * n_dot_i + k.sqrt()) * n)
}

/// Schlick's approximation for reflectance against vacuum.
#[inline]
pub fn schlick_reflectance(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * schlick_weight(cosine)
}

/// (1 - cos)^5
#[inline]
fn schlick_weight(cos_theta: f32) -> f32 {
    let x = (1.0 - cos_theta).clamp(0.0, 1.0);
    let x2 = x * x;
    x2 * x2 * x
}

#[inline]
fn schlick_fresnel3(f0: Color, cos_theta: f32) -> Color {
    f0 + (Color::ONE - f0) * schlick_weight(cos_theta)
}

/// Smith geometry term with the Schlick-GGX approximation, k = (r + 1)^2 / 8.
#[inline]
fn smith_g_schlick(n_dot_l: f32, n_dot_v: f32, roughness: f32) -> f32 {
    let k = (roughness + 1.0) * (roughness + 1.0) / 8.0;
    let g1 = |n_dot_x: f32| n_dot_x / (n_dot_x * (1.0 - k) + k);
    g1(n_dot_l) * g1(n_dot_v)
}

/// Cosine-weighted direction in tangent space (z up).
#[inline]
pub fn cosine_hemisphere(r1: f32, r2: f32) -> Vec3 {
    let phi = 2.0 * PI * r1;
    let r = r2.sqrt();
    Vec3::new(r * phi.cos(), r * phi.sin(), (1.0 - r2).max(0.0).sqrt())
}

/// Sample a GGX microfacet normal around `n`.
fn sample_ggx(n: Vec3, alpha: f32, r1: f32, r2: f32) -> Vec3 {
    let phi = 2.0 * PI * r1;
    let cos_theta = ((1.0 - r2) / (1.0 + (alpha * alpha - 1.0) * r2)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    let local = Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
    to_world(local, n)
}

/// Rotate a tangent-space vector so that +z maps to `n`.
#[inline]
fn to_world(local: Vec3, n: Vec3) -> Vec3 {
    let (tangent, bitangent) = build_orthonormal_basis(n);
    local.x * tangent + local.y * bitangent + local.z * n
}

/// Build an orthonormal basis from a unit normal.
///
/// Duff et al. 2017, "Building an Orthonormal Basis, Revisited".
fn build_orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let sign = if n.z >= 0.0 { 1.0 } else { -1.0 };
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;

    let tangent = Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let bitangent = Vec3::new(b, sign + n.y * n.y * a, -n.y);

    (tangent, bitangent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{MaterialId, GLASS_IOR, MICROFACET_ROUGHNESS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn floor_hit(material: MaterialId) -> Hit {
        Hit {
            t: 1.0,
            point: Vec3::ZERO,
            normal: Vec3::Y,
            material,
        }
    }

    #[test]
    fn test_schlick_normal_incidence() {
        assert!((schlick_reflectance(1.0, 1.5) - 0.04).abs() < 1e-6);
        assert!((schlick_reflectance(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_normal_incidence_is_straight() {
        let refracted = refract(Vec3::NEG_Z, Vec3::Z, 1.0 / 1.5).unwrap();
        assert!((refracted - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_refract_snell() {
        let theta_i = 30f32.to_radians();
        let i = Vec3::new(theta_i.sin(), -theta_i.cos(), 0.0);
        let t = refract(i, Vec3::Y, 1.0 / 1.5).unwrap();

        assert!((t.length() - 1.0).abs() < 1e-5);
        let sin_t = t.x;
        assert!((sin_t - theta_i.sin() / 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_total_internal_reflection() {
        // Leaving glass at 60 degrees exceeds the ~41.8 degree critical angle
        let theta = 60f32.to_radians();
        let i = Vec3::new(theta.sin(), -theta.cos(), 0.0);
        assert!(refract(i, Vec3::Y, 1.5).is_none());
    }

    #[test]
    fn test_glass_tir_reflects_inside() {
        let mut rng = StdRng::seed_from_u64(1);
        let glass = Material::Glass { ior: GLASS_IOR };
        // Inside the glass, travelling up into the surface at a grazing angle
        let theta = 70f32.to_radians();
        let ray = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(theta.sin(), theta.cos(), 0.0));
        let hit = floor_hit(MaterialId::GLASS);

        for _ in 0..16 {
            let result = glass.scatter(&ray, &hit, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            assert!(result.scattered.direction().y < 0.0);
            assert!(result.scattered.origin().y < 0.0);
        }
    }

    #[test]
    fn test_glass_mostly_transmits_at_normal_incidence() {
        let mut rng = StdRng::seed_from_u64(2);
        let glass = Material::Glass { ior: GLASS_IOR };
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let hit = floor_hit(MaterialId::GLASS);

        let n = 20_000;
        let reflected = (0..n)
            .filter(|_| glass.scatter(&ray, &hit, &mut rng).unwrap().scattered.direction().y > 0.0)
            .count();
        let fraction = reflected as f32 / n as f32;
        assert!((fraction - 0.04).abs() < 0.01, "reflected fraction {}", fraction);
    }

    #[test]
    fn test_glass_refracted_ray_starts_below_surface() {
        let mut rng = StdRng::seed_from_u64(3);
        let glass = Material::Glass { ior: GLASS_IOR };
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let hit = floor_hit(MaterialId::GLASS);

        for _ in 0..64 {
            let scattered = glass.scatter(&ray, &hit, &mut rng).unwrap().scattered;
            if scattered.direction().y < 0.0 {
                assert!((scattered.origin().y + EPSILON).abs() < 1e-6);
            } else {
                assert!((scattered.origin().y - EPSILON).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_mirror_reflects() {
        let mut rng = StdRng::seed_from_u64(4);
        let mirror = Material::Mirror { albedo: Color::splat(0.95) };
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0).normalize());

        let result = mirror.scatter(&ray, &floor_hit(MaterialId::MIRROR), &mut rng).unwrap();
        assert_eq!(result.attenuation, Color::splat(0.95));
        assert!((result.scattered.direction() - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_light_absorbs() {
        let mut rng = StdRng::seed_from_u64(5);
        let light = Material::Light { emission: Color::splat(80.0) };
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y);
        assert!(light.scatter(&ray, &floor_hit(MaterialId::LIGHT), &mut rng).is_none());
    }

    #[test]
    fn test_diffuse_stays_in_hemisphere() {
        let mut rng = StdRng::seed_from_u64(6);
        let albedo = Color::new(0.65, 0.05, 0.05);
        let diffuse = Material::Diffuse { albedo };
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y);
        let hit = floor_hit(MaterialId::RED);

        let mut mean_cos = 0.0;
        let n = 10_000;
        for _ in 0..n {
            let result = diffuse.scatter(&ray, &hit, &mut rng).unwrap();
            let dir = result.scattered.direction();
            assert_eq!(result.attenuation, albedo);
            assert!(dir.y >= 0.0);
            assert!((dir.length() - 1.0).abs() < 1e-4);
            mean_cos += dir.y;
        }
        // E[cos] under a cosine-weighted pdf is 2/3
        let mean_cos = mean_cos / n as f32;
        assert!((mean_cos - 2.0 / 3.0).abs() < 0.01, "mean cos {}", mean_cos);
    }

    #[test]
    fn test_microfacet_conserves_energy() {
        let mut rng = StdRng::seed_from_u64(7);
        let metal = Material::Microfacet {
            albedo: Color::ONE,
            roughness: MICROFACET_ROUGHNESS,
        };
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y);
        let hit = floor_hit(MaterialId::MICROFACET);

        let n = 20_000;
        let mut total = 0.0;
        for _ in 0..n {
            if let Some(result) = metal.scatter(&ray, &hit, &mut rng) {
                assert!(result.scattered.direction().y > 0.0);
                total += result.attenuation.x;
            }
        }
        let mean = total / n as f32;
        assert!(mean > 0.9 && mean <= 1.001, "mean weight {}", mean);
    }

    #[test]
    fn test_orthonormal_basis() {
        for n in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::NEG_Z, Vec3::new(1.0, 2.0, -3.0).normalize()] {
            let (t, b) = build_orthonormal_basis(n);
            assert!(t.dot(n).abs() < 1e-5);
            assert!(b.dot(n).abs() < 1e-5);
            assert!(t.dot(b).abs() < 1e-5);
            assert!((t.length() - 1.0).abs() < 1e-5);
            assert!((b.length() - 1.0).abs() < 1e-5);
        }
    }
}
