use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use prism_common::{FrameClock, FrameStats};
use prism_input::{InputSnapshot, Key};
use prism_render::{RecordingDevice, Scene, SceneConfig};
use prism_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prism-cli", about = "Headless frame runner for prism scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Simulate frames against the recording device
    Run {
        /// Scene file (YAML). Uses the built-in demo scene when omitted
        #[arg(long)]
        scene: Option<PathBuf>,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Keys held for the whole run (e.g. w, space)
        #[arg(long, value_delimiter = ',')]
        hold: Vec<Key>,
        /// Pointer delta per frame while dragging, as "x,y"
        #[arg(long, value_parser = parse_vec2)]
        drag: Option<Vec2>,
        /// Camera to view through
        #[arg(long, default_value = "0")]
        camera: usize,
        /// Window size as "WIDTHxHEIGHT", applied before the first frame
        #[arg(long, value_parser = parse_size)]
        size: Option<(u32, u32)>,
        /// Freeze entity animation
        #[arg(long)]
        pause: bool,
        /// Print the device calls of the last frame
        #[arg(long)]
        log_calls: bool,
    },
    /// Print scene, camera, entity and material summaries
    Inspect {
        #[arg(long)]
        scene: Option<PathBuf>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the demo scene as YAML
    Export {
        /// Output path
        out: PathBuf,
    },
}

fn parse_vec2(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'x,y', got '{s}'"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected 'WIDTHxHEIGHT', got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    Ok((w, h))
}

fn load_scene(path: Option<&Path>) -> anyhow::Result<Scene> {
    let config = match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene {}", path.display()))?,
        None => SceneConfig::demo(),
    };
    Ok(config.build()?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("prism-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", prism_common::crate_info());
            println!("input: {}", prism_input::crate_info());
            println!("render: {}", prism_render::crate_info());
            println!("tools: {}", prism_tools::crate_info());
        }
        Commands::Run {
            scene,
            frames,
            dt,
            hold,
            drag,
            camera,
            size,
            pause,
            log_calls,
        } => {
            let mut scene = load_scene(scene.as_deref())?;
            scene.set_active_camera(camera)?;
            if let Some((width, height)) = size {
                scene.on_resize(width, height);
            }
            if pause {
                scene.set_motion_paused(true);
            }

            let mut input = InputSnapshot::with_keys(hold);
            if let Some(delta) = drag {
                input = input.dragging(delta);
            }

            let mut clock = FrameClock::new();
            let mut stats = FrameStats::new();
            let mut device = RecordingDevice::new();
            let mut draws = 0;
            for _ in 0..frames {
                let started = Instant::now();
                let time = clock.tick_secs(dt);
                device.clear();
                scene.update(time, &input);
                scene.draw(&mut device, time)?;
                draws += device.draw_count();
                stats.record(started.elapsed());
            }
            tracing::info!(frames = clock.frames(), draws, "run finished");

            println!("{}", SceneInspector::summary(&scene));
            let active = scene.active_camera_index();
            println!(
                "{}",
                SceneInspector::camera_info(active, scene.active_camera())
            );
            println!(
                "Frames: {} draws={} avg={:?} worst={:?}",
                clock.frames(),
                draws,
                stats.average(),
                stats.worst()
            );
            if log_calls {
                print!("{}", device.log());
            }
        }
        Commands::Inspect { scene, json } => {
            let scene = load_scene(scene.as_deref())?;
            let summary = SceneInspector::summary(&scene);
            let cameras = SceneInspector::cameras(&scene);
            let entities = SceneInspector::entities(&scene);
            let materials = SceneInspector::materials(&scene);
            if json {
                let doc = serde_json::json!({
                    "summary": summary,
                    "cameras": cameras,
                    "entities": entities,
                    "materials": materials,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("{summary}");
                for c in &cameras {
                    println!("  {c}");
                }
                for e in &entities {
                    println!("  {e}");
                }
                for m in &materials {
                    println!("  {m}");
                }
            }
        }
        Commands::Export { out } => {
            SceneConfig::demo()
                .save(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote demo scene to {}", out.display());
        }
    }

    Ok(())
}
