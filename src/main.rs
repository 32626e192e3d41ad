//! stormscape - a procedural 2D weather scene engine
//!
//! Headless driver: advances the scene a configured number of frames,
//! renders each frame through a recording canvas, and emits per-frame
//! JSONL records for inspection and CI.

mod config;

use anyhow::{bail, Context, Result};
use config::SimConfig;
use std::{env, path::PathBuf};
use stormscape_engine::WeatherScene;
use stormscape_testkit::{DrawRecorder, FrameRecord, JsonlSink, RunHeader};
use tracing::info;

#[derive(Debug, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    frames: Option<u64>,
    dt: Option<f32>,
    out: Option<PathBuf>,
    help: bool,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Self> {
        let mut options = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let value = args.next().context("--config requires a path")?;
                    options.config_path = Some(PathBuf::from(value));
                }
                "--seed" => {
                    let value = args.next().context("--seed requires a value")?;
                    options.seed = Some(value.parse().context("--seed must be an integer")?);
                }
                "--frames" => {
                    let value = args.next().context("--frames requires a value")?;
                    options.frames = Some(value.parse().context("--frames must be an integer")?);
                }
                "--dt" => {
                    let value = args.next().context("--dt requires a value")?;
                    let dt: f32 = value.parse().context("--dt must be a number")?;
                    if dt <= 0.0 {
                        bail!("--dt must be positive");
                    }
                    options.dt = Some(dt);
                }
                "--out" => {
                    let value = args.next().context("--out requires a path")?;
                    options.out = Some(PathBuf::from(value));
                }
                "--help" | "-h" => options.help = true,
                other => bail!("unknown option: {other}"),
            }
        }
        Ok(options)
    }
}

fn print_usage() {
    println!("stormscape - procedural 2D weather scene engine");
    println!();
    println!("Usage: stormscape [options]");
    println!("  --config <path>   config file (default: {})", config::DEFAULT_CONFIG_PATH);
    println!("  --seed <u64>      master RNG seed");
    println!("  --frames <u64>    frames to simulate");
    println!("  --dt <f32>        fixed timestep per frame");
    println!("  --out <path>      write per-frame JSONL records here");
    println!("  -h, --help        show this help");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = CliOptions::parse(env::args().skip(1))?;
    if options.help {
        print_usage();
        return Ok(());
    }

    let mut sim = SimConfig::load(
        options
            .config_path
            .as_deref()
            .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.as_ref()),
    );
    if let Some(seed) = options.seed {
        sim.seed = seed;
    }
    if let Some(frames) = options.frames {
        sim.frames = frames;
    }
    if let Some(dt) = options.dt {
        sim.dt = dt;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        seed = sim.seed,
        frames = sim.frames,
        dt = sim.dt,
        "starting stormscape"
    );

    run(&sim, options.out.as_deref())
}

fn run(sim: &SimConfig, out: Option<&std::path::Path>) -> Result<()> {
    let mut scene = WeatherScene::new(sim.scene, sim.seed);
    let mut recorder = DrawRecorder::new();
    let mut sink = match out {
        Some(path) => {
            let mut sink = JsonlSink::create(path)
                .with_context(|| format!("creating frame log at {}", path.display()))?;
            sink.write(&RunHeader::new(sim.seed, sim.dt))?;
            Some(sink)
        }
        None => None,
    };

    for frame in 0..sim.frames {
        scene.advance(sim.dt);
        scene.render(&mut recorder);

        let env = scene.env();
        if sim.log_every > 0 && frame % sim.log_every == 0 {
            info!(
                frame,
                state = env.state.display_name(),
                time_of_day = env.time_of_day,
                fog = scene.fog_density(),
                clouds = scene.cloud_count(),
                particles = scene.particle_count(),
                draw_calls = recorder.calls().len(),
                "frame"
            );
        }

        if let Some(sink) = sink.as_mut() {
            sink.write(&FrameRecord {
                frame,
                state: env.state.display_name(),
                time_of_day: env.time_of_day,
                fog_density: scene.fog_density(),
                clouds: scene.cloud_count(),
                particles: scene.particle_count(),
                bolts: scene.bolt_count(),
                flash: scene.flash_intensity(),
            })?;
        }
    }

    info!(
        frames = sim.frames,
        final_state = scene.env().state.display_name(),
        "run complete"
    );
    Ok(())
}
