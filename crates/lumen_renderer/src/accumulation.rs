//! Progressive accumulation across frames.
//!
//! Two full-resolution buffers alternate roles every frame: one holds the
//! running mean so far, the other receives
//! `history * (1 - w) + sample * w` with `w = 1 / (frame + 1)`. After a
//! reset the frame counter is zero, so the first frame's weight is exactly
//! one and stale history is discarded without clearing either buffer.
//!
//! Rows are distributed across the rayon pool. Each pixel draws from its own
//! `HashRng`, so the result does not depend on scheduling.

use lumen_core::{Color, RenderSettings};
use lumen_math::Vec2;
use rand::RngCore;
use rayon::prelude::*;

use crate::buffer::ImageBuffer;
use crate::rng::HashRng;

/// Anything that produces one radiance sample for a pixel.
pub trait PixelEstimator: Sync {
    /// Sample the pixel centred at `uv` (v = 0 is the bottom row).
    fn estimate(&self, uv: Vec2, rng: &mut dyn RngCore) -> Color;
}

/// Per-channel sample ceiling for the given frame index.
///
/// The preview clamp keeps early frames free of fireflies; once enough
/// samples exist it relaxes to the steady clamp.
pub fn clamp_for_frame(settings: &RenderSettings, frame: u32) -> f32 {
    if frame < settings.preview_frames {
        settings.preview_clamp
    } else {
        settings.steady_clamp
    }
}

/// Ping-pong accumulation state.
#[derive(Debug, Clone)]
pub struct FrameState {
    buffers: [ImageBuffer; 2],
    /// Index of the buffer the next frame writes into
    current: usize,
    /// Frames accumulated since the last reset
    frame: u32,
}

impl FrameState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffers: [ImageBuffer::new(width, height), ImageBuffer::new(width, height)],
            current: 0,
            frame: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.buffers[0].width
    }

    pub fn height(&self) -> u32 {
        self.buffers[0].height
    }

    /// Frames accumulated since the last reset.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Buffer the next frame will write.
    pub fn current(&self) -> &ImageBuffer {
        &self.buffers[self.current]
    }

    /// Buffer holding the latest accumulated result.
    pub fn previous(&self) -> &ImageBuffer {
        &self.buffers[1 - self.current]
    }

    /// Weight of the next frame's samples.
    #[inline]
    pub fn blend_weight(&self) -> f32 {
        1.0 / (self.frame as f32 + 1.0)
    }

    /// Restart accumulation. Buffer contents are left in place; the next
    /// frame overwrites them with weight one.
    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Swap buffer roles and count the frame.
    pub fn advance(&mut self) {
        self.current = 1 - self.current;
        self.frame += 1;
    }

    /// Reallocate both buffers at a new resolution and reset.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Render one frame into the current buffer, blending against the
    /// previous one, then advance.
    ///
    /// Samples are clamped per channel to `clamp`. Non-finite samples count
    /// as black.
    pub fn accumulate<E: PixelEstimator>(&mut self, estimator: &E, frame_seed: f32, clamp: f32) {
        let weight = self.blend_weight();
        let width = self.width() as usize;
        let height = self.height();
        if width == 0 || height == 0 {
            self.advance();
            return;
        }

        let (head, tail) = self.buffers.split_at_mut(1);
        let (write, read) = if self.current == 0 {
            (&mut head[0], &tail[0])
        } else {
            (&mut tail[0], &head[0])
        };

        let ceiling = Color::splat(clamp);
        let inv_width = 1.0 / width as f32;
        let inv_height = 1.0 / height as f32;

        write
            .pixels
            .par_chunks_mut(width)
            .zip(read.pixels.par_chunks(width))
            .enumerate()
            .for_each(|(y, (out_row, history_row))| {
                let v = 1.0 - (y as f32 + 0.5) * inv_height;
                for (x, (out, history)) in out_row.iter_mut().zip(history_row).enumerate() {
                    let uv = Vec2::new((x as f32 + 0.5) * inv_width, v);
                    let mut rng = HashRng::for_pixel(frame_seed, uv);

                    let sample = estimator.estimate(uv, &mut rng);
                    let sample = if sample.is_finite() {
                        sample.min(ceiling)
                    } else {
                        Color::ZERO
                    };

                    *out = *history * (1.0 - weight) + sample * weight;
                }
            });

        self.advance();
    }
}
