//! Error types for the renderer.

use lumen_core::{SceneError, SettingsError};
use thiserror::Error;

/// Errors surfaced by the orchestrator.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

pub type RenderResult<T> = Result<T, RenderError>;
