//! Headless shell: renders a number of progressive frames and saves a PNG.
//!
//! Usage: `lumen_viewer [settings.json] [frames] [output.png]`

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use lumen_core::RenderSettings;
use lumen_renderer::{Orchestrator, TickOutcome};

const DEFAULT_FRAMES: u32 = 64;
const DEFAULT_OUTPUT: &str = "render.png";

struct Args {
    settings: Option<PathBuf>,
    frames: u32,
    output: PathBuf,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = std::env::args().skip(1);

        let settings = args.next().map(PathBuf::from);
        let frames = match args.next() {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Frame count '{}' is not a number", raw))?,
            None => DEFAULT_FRAMES,
        };
        let output = args.next().map(PathBuf::from).unwrap_or_else(|| DEFAULT_OUTPUT.into());

        if args.next().is_some() {
            bail!("usage: lumen_viewer [settings.json] [frames] [output.png]");
        }

        Ok(Self {
            settings,
            frames,
            output,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Lumen Viewer");

    let args = Args::parse()?;
    let settings = match &args.settings {
        Some(path) => RenderSettings::load(path)
            .with_context(|| format!("Failed to load settings from {:?}", path))?,
        None => RenderSettings::default(),
    };

    let (width, height) = (settings.width, settings.height);
    let mut orchestrator = Orchestrator::new(settings)
        .context("Failed to initialize renderer")?
        .with_observer(|frame: u32| log::info!("Progress: {} frames", frame));

    log::info!("Rendering {} frames at {}x{}", args.frames, width, height);
    let start = Instant::now();
    for _ in 0..args.frames {
        if let TickOutcome::Paused = orchestrator.tick() {
            break;
        }
    }
    let elapsed = start.elapsed();
    log::info!(
        "Rendered {} frames in {:.2?} ({:.1} ms/frame)",
        orchestrator.frame(),
        elapsed,
        elapsed.as_secs_f64() * 1000.0 / orchestrator.frame().max(1) as f64
    );

    let rgba = orchestrator.presented_rgba8();
    let image = image::RgbaImage::from_raw(width, height, rgba)
        .context("Presented image does not match the configured resolution")?;
    image
        .save(&args.output)
        .with_context(|| format!("Failed to save {:?}", args.output))?;
    log::info!("Saved to {:?}", args.output);

    orchestrator.shutdown();
    Ok(())
}
