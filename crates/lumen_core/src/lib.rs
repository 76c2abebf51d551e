//! Lumen Core - Scene description and settings for the Cornell box renderer.
//!
//! This crate provides:
//!
//! - **Materials**: `Material`, `MaterialId`, `MaterialTable`
//! - **Scene**: `Scene`, `Primitive`, `AreaLight`, built and validated once
//! - **Settings**: `RenderSettings`, loadable from JSON
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{RenderSettings, Scene};
//!
//! let settings = RenderSettings::load("settings.json")?;
//! let scene = Scene::cornell_box(settings.light_intensity)?;
//! println!("{} primitives", scene.objects().len());
//! ```

pub mod material;
pub mod scene;
pub mod settings;

// Re-export commonly used types
pub use material::{Color, Material, MaterialId, MaterialKind, MaterialTable, GLASS_IOR, MICROFACET_ROUGHNESS};
pub use scene::{AreaLight, Cuboid, Primitive, Scene, SceneError, SceneObject, SceneResult, Sphere};
pub use settings::{
    validate_light_intensity, CameraSettings, RenderSettings, SettingsError, SettingsResult, MAX_LIGHT_INTENSITY,
};
