//! Render settings loaded from JSON.
//!
//! Every field has a default, so an empty object `{}` is a valid settings
//! file. Keys are camelCase.

use std::path::Path;

use lumen_math::{CameraPose, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest light intensity the controls expose.
pub const MAX_LIGHT_INTENSITY: f32 = 100.0;

/// Errors that can occur while loading or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Resolution must be positive, got {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Light intensity must be within 0..=100, got {0}")]
    InvalidLightIntensity(f32),

    #[error("Max bounces must be at least 1, got {0}")]
    InvalidBounces(u32),

    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidRadiance { field: &'static str, value: f32 },

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Camera placement in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(278.0, 273.0, -400.0),
            target: Vec3::new(278.0, 273.0, 0.0),
            up: Vec3::Y,
            fov_y_degrees: 90.0,
        }
    }
}

impl CameraSettings {
    /// Camera pose for an output of the given aspect ratio.
    pub fn pose(&self, aspect: f32) -> CameraPose {
        CameraPose {
            position: self.position,
            target: self.target,
            up: self.up,
            fov_y: self.fov_y_degrees.to_radians(),
            aspect,
        }
    }
}

/// All render-affecting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Multiplies the light's emission on every channel
    pub light_intensity: f32,
    pub max_bounces: u32,
    /// Russian roulette applies to bounce indices strictly above this
    pub roulette_after_bounce: u32,
    /// Radiance returned on a scene miss
    pub ambient: f32,
    /// Frames since reset that use the preview clamp
    pub preview_frames: u32,
    pub preview_clamp: f32,
    pub steady_clamp: f32,
    /// Progress is reported every this many frames
    pub progress_interval: u32,
    /// Deterministic per-frame seeds when set
    pub seed: Option<u64>,
    pub camera: CameraSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            light_intensity: 80.0,
            max_bounces: 12,
            roulette_after_bounce: 3,
            ambient: 0.01,
            preview_frames: 10,
            preview_clamp: 0.8,
            steady_clamp: 10.0,
            progress_interval: 5,
            seed: None,
            camera: CameraSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Parse settings from a JSON string and validate them.
    pub fn from_json_str(raw: &str) -> SettingsResult<Self> {
        let settings: RenderSettings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file and validate them.
    pub fn load<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&raw)?;
        log::info!("Loaded render settings from {:?}", path);
        Ok(settings)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Camera pose at the configured resolution.
    pub fn camera_pose(&self) -> CameraPose {
        self.camera.pose(self.aspect())
    }

    pub fn validate(&self) -> SettingsResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }

        validate_light_intensity(self.light_intensity)?;

        if self.max_bounces == 0 {
            return Err(SettingsError::InvalidBounces(self.max_bounces));
        }

        for (field, value) in [
            ("ambient", self.ambient),
            ("previewClamp", self.preview_clamp),
            ("steadyClamp", self.steady_clamp),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::InvalidRadiance { field, value });
            }
        }

        if !self.camera_pose().is_valid() {
            return Err(SettingsError::InvalidCamera(format!(
                "position {:?}, target {:?}, up {:?}, fov {} degrees",
                self.camera.position, self.camera.target, self.camera.up, self.camera.fov_y_degrees
            )));
        }

        if self.progress_interval == 0 {
            log::warn!("progressInterval of 0 disables periodic progress reports");
        }

        Ok(())
    }
}

/// Check a light intensity against the range the controls expose.
pub fn validate_light_intensity(intensity: f32) -> SettingsResult<()> {
    if (0.0..=MAX_LIGHT_INTENSITY).contains(&intensity) {
        Ok(())
    } else {
        Err(SettingsError::InvalidLightIntensity(intensity))
    }
}
