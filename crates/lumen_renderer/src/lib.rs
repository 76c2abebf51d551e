//! Lumen Renderer - Progressive CPU path tracing of the Cornell box.
//!
//! One path per pixel per frame, blended into a running mean that resets
//! whenever the camera, the light, or the output size changes. The
//! `Orchestrator` drives the frame loop; everything below it is a pure
//! function of the scene, the camera, and a per-pixel hash RNG.
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::RenderSettings;
//! use lumen_renderer::{Orchestrator, TickOutcome};
//!
//! let mut orchestrator = Orchestrator::new(RenderSettings::default())?;
//! while let TickOutcome::Rendered { frame } = orchestrator.tick() {
//!     if frame == 64 {
//!         break;
//!     }
//! }
//! let rgba = orchestrator.presented_rgba8();
//! ```

mod accumulation;
mod buffer;
mod cuboid;
mod display;
mod error;
mod hittable;
mod integrator;
mod light;
mod material;
mod orchestrator;
mod rng;
mod sphere;

pub use accumulation::{clamp_for_frame, FrameState, PixelEstimator};
pub use buffer::ImageBuffer;
pub use display::{color_to_rgba, present_into, to_rgba8, tone_map, GAMMA};
pub use error::{RenderError, RenderResult};
pub use hittable::{intersect, occluded, Hit, Hittable, EPSILON, MAX_DISTANCE, TRACE_INTERVAL};
pub use integrator::{russian_roulette, trace, PathTracer, TraceConfig};
pub use light::{sample_direct, SHADOW_TOLERANCE};
pub use material::{cosine_hemisphere, reflect, refract, schlick_reflectance, Scatter, ScatterResult};
pub use orchestrator::{ControlEvent, FrameObserver, Orchestrator, RunState, TickOutcome};
pub use rng::{gen_f32, hash, hash_step, HashRng};

/// Re-export common types from lumen_core and lumen_math
pub use lumen_core::{Color, Scene};
pub use lumen_math::{Ray, Vec2, Vec3};
