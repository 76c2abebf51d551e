//! Iterative path tracing with next-event estimation.
//!
//! Diffuse hits take an explicit light sample; camera rays that land on the
//! light directly pick up its emission. Emission found by later bounces is
//! discarded so the light is not counted twice.

use std::f32::consts::PI;

use lumen_core::{Color, RenderSettings, Scene};
use lumen_math::{CameraBasis, Ray, Vec2};
use rand::RngCore;

use crate::accumulation::PixelEstimator;
use crate::hittable::intersect;
use crate::light::sample_direct;
use crate::material::Scatter;
use crate::rng::gen_f32;

/// Path tracing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceConfig {
    /// Maximum path vertices per sample
    pub max_bounces: u32,
    /// Russian roulette applies to bounce indices strictly above this
    pub roulette_after_bounce: u32,
    /// Radiance added when a path escapes the scene
    pub ambient: Color,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::from(&RenderSettings::default())
    }
}

impl From<&RenderSettings> for TraceConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            max_bounces: settings.max_bounces,
            roulette_after_bounce: settings.roulette_after_bounce,
            ambient: Color::splat(settings.ambient),
        }
    }
}

/// Radiance arriving along `ray`.
pub fn trace(ray: Ray, scene: &Scene, config: &TraceConfig, rng: &mut dyn RngCore) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = ray;

    for bounce in 0..config.max_bounces {
        let Some(hit) = intersect(scene, &ray) else {
            radiance += config.ambient;
            break;
        };

        let material = scene.materials().lookup(hit.material);

        if material.is_emissive() {
            if bounce == 0 {
                radiance += throughput * material.emission();
            }
            break;
        }

        if material.receives_direct_light() {
            let direct = sample_direct(scene, hit.point, hit.normal, rng);
            radiance += throughput * material.albedo() / PI * direct;
        }

        if bounce > config.roulette_after_bounce {
            match russian_roulette(throughput, gen_f32(rng)) {
                Some(boosted) => throughput = boosted,
                None => break,
            }
        }

        let Some(scattered) = material.scatter(&ray, &hit, rng) else {
            break;
        };
        throughput *= scattered.attenuation;
        ray = scattered.scattered;
    }

    radiance
}

/// Survive with probability equal to the brightest throughput channel.
///
/// Returns the reweighted throughput, or `None` if the path terminates.
/// The survival probability is capped at one.
#[inline]
pub fn russian_roulette(throughput: Color, u: f32) -> Option<Color> {
    let p = throughput.max_element().min(1.0);
    if p <= 0.0 || u > p {
        return None;
    }
    Some(throughput / p)
}

/// Per-frame estimator: one path per pixel through a fixed camera.
pub struct PathTracer<'a> {
    scene: &'a Scene,
    camera: CameraBasis,
    config: TraceConfig,
}

impl<'a> PathTracer<'a> {
    pub fn new(scene: &'a Scene, camera: CameraBasis, config: TraceConfig) -> Self {
        Self { scene, camera, config }
    }
}

impl PixelEstimator for PathTracer<'_> {
    #[inline]
    fn estimate(&self, uv: Vec2, rng: &mut dyn RngCore) -> Color {
        trace(self.camera.ray(uv), self.scene, &self.config, rng)
    }
}
