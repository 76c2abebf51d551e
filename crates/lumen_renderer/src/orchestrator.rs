//! Frame-loop state machine.
//!
//! The orchestrator owns the scene, the camera, and the accumulation
//! buffers. The surrounding shell feeds it `ControlEvent`s from whatever
//! input, UI, or window layer it has, and calls `tick()` once per display
//! refresh. Each tick while running renders and presents one frame; while
//! paused it does nothing and the last presented image stays valid.

use lumen_core::{validate_light_intensity, RenderSettings, Scene, SettingsError};
use lumen_math::{CameraBasis, CameraPose};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::accumulation::{clamp_for_frame, FrameState};
use crate::buffer::ImageBuffer;
use crate::display;
use crate::error::RenderResult;
use crate::integrator::{PathTracer, TraceConfig};

/// Upper bound (exclusive) of the per-frame seed.
const FRAME_SEED_RANGE: f32 = 1000.0;

/// Whether ticks render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// State-change notification from an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// The camera moved; the aspect ratio is taken from the output size
    CameraChanged(CameraPose),
    LightIntensityChanged(f32),
    Resized { width: u32, height: u32 },
    Reset,
    Pause,
    Resume,
    TogglePause,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was accumulated and presented; `frame` counts since reset
    Rendered { frame: u32 },
    Paused,
}

/// Receives progress notifications: every `progress_interval` frames, and
/// zero on every reset.
pub trait FrameObserver: Send {
    fn frame_observed(&mut self, frame: u32);
}

impl<F: FnMut(u32) + Send> FrameObserver for F {
    fn frame_observed(&mut self, frame: u32) {
        self(frame)
    }
}

pub struct Orchestrator {
    settings: RenderSettings,
    scene: Scene,
    pose: CameraPose,
    camera: CameraBasis,
    config: TraceConfig,
    frames: FrameState,
    presented: ImageBuffer,
    state: RunState,
    seeds: StdRng,
    observer: Option<Box<dyn FrameObserver>>,
}

impl Orchestrator {
    /// Validate `settings`, build the scene, and allocate buffers.
    /// Starts in `Running` at frame zero.
    pub fn new(settings: RenderSettings) -> RenderResult<Self> {
        settings.validate()?;
        let scene = Scene::cornell_box(settings.light_intensity)?;

        let pose = settings.camera_pose();
        let seeds = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "Allocating {}x{} accumulation buffers",
            settings.width,
            settings.height
        );

        Ok(Self {
            camera: pose.basis(),
            config: TraceConfig::from(&settings),
            frames: FrameState::new(settings.width, settings.height),
            presented: ImageBuffer::new(settings.width, settings.height),
            state: RunState::Running,
            observer: None,
            settings,
            scene,
            pose,
            seeds,
        })
    }

    /// Attach a progress observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: impl FrameObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn with_observer(mut self, observer: impl FrameObserver + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Frames accumulated since the last reset.
    pub fn frame(&self) -> u32 {
        self.frames.frame()
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera_pose(&self) -> &CameraPose {
        &self.pose
    }

    /// Last presented (tone-mapped, gamma-encoded) image.
    pub fn presented(&self) -> &ImageBuffer {
        &self.presented
    }

    /// Last presented image as RGBA8 bytes.
    pub fn presented_rgba8(&self) -> Vec<u8> {
        display::to_rgba8(&self.presented)
    }

    /// React to a state change. On error nothing changes.
    pub fn handle(&mut self, event: ControlEvent) -> RenderResult<()> {
        match event {
            ControlEvent::CameraChanged(mut pose) => {
                pose.set_aspect(self.settings.aspect());
                if !pose.is_valid() {
                    return Err(SettingsError::InvalidCamera(format!("{:?}", pose)).into());
                }
                self.pose = pose;
                self.camera = pose.basis();
                self.reset();
            }
            ControlEvent::LightIntensityChanged(intensity) => {
                validate_light_intensity(intensity)?;
                self.scene = Scene::cornell_box(intensity)?;
                self.settings.light_intensity = intensity;
                self.reset();
            }
            ControlEvent::Resized { width, height } => {
                if width == 0 || height == 0 {
                    return Err(SettingsError::InvalidResolution { width, height }.into());
                }
                self.settings.width = width;
                self.settings.height = height;
                self.pose.set_aspect(self.settings.aspect());
                self.camera = self.pose.basis();

                log::info!("Reallocating accumulation buffers at {}x{}", width, height);
                self.frames.resize(width, height);
                self.presented = ImageBuffer::new(width, height);
                self.reset();
            }
            ControlEvent::Reset => self.reset(),
            ControlEvent::Pause => self.set_state(RunState::Paused),
            ControlEvent::Resume => self.set_state(RunState::Running),
            ControlEvent::TogglePause => {
                let next = match self.state {
                    RunState::Running => RunState::Paused,
                    RunState::Paused => RunState::Running,
                };
                self.set_state(next);
            }
        }
        Ok(())
    }

    /// Run one frame cycle if running.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state == RunState::Paused {
            return TickOutcome::Paused;
        }

        let frame_seed = self.seeds.gen::<f32>() * FRAME_SEED_RANGE;
        let clamp = clamp_for_frame(&self.settings, self.frames.frame());

        let tracer = PathTracer::new(&self.scene, self.camera, self.config);
        self.frames.accumulate(&tracer, frame_seed, clamp);
        display::present_into(self.frames.previous(), &mut self.presented);

        let frame = self.frames.frame();
        log::debug!("Frame {} (seed {:.3}, clamp {})", frame, frame_seed, clamp);

        let interval = self.settings.progress_interval;
        if interval > 0 && frame % interval == 0 {
            self.notify(frame);
        }

        TickOutcome::Rendered { frame }
    }

    /// Release the buffers.
    pub fn shutdown(self) {
        log::info!(
            "Shutting down after {} frames; releasing {}x{} accumulation buffers",
            self.frames.frame(),
            self.frames.width(),
            self.frames.height()
        );
    }

    fn reset(&mut self) {
        self.frames.reset();
        log::info!("Accumulation reset");
        self.notify(0);
    }

    fn set_state(&mut self, state: RunState) {
        if self.state != state {
            log::info!("{:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn notify(&mut self, frame: u32) {
        if let Some(observer) = self.observer.as_mut() {
            observer.frame_observed(frame);
        }
    }
}
