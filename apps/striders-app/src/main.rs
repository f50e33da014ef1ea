//! Striders CLI.
//!
//! Three modes of operation:
//! - `walk`: Drag a walker across terrain headlessly and print statistics
//! - `presets`: Print the built-in step presets
//! - `info`: Print workspace crate versions

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nalgebra::Vector3;

use striders_core::prelude::*;
use striders_sim::WalkerBuilder;
use striders_terrain::GroundWorld;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Procedural leg stepping and body balancing, headless.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Drag a walker across terrain and print statistics.
    Walk {
        /// Number of ticks to simulate.
        #[arg(short, long, default_value_t = 1000)]
        ticks: u32,

        /// Seed for per-leg preset jitter.
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Built-in preset name (see `presets`).
        #[arg(short, long, default_value = "spider")]
        preset: String,

        /// TOML preset file; overrides `--preset`.
        #[arg(long)]
        preset_file: Option<std::path::PathBuf>,

        /// Leg layout.
        #[arg(short, long, value_enum, default_value_t = Layout::Quad)]
        layout: Layout,

        /// Terrain to walk over.
        #[arg(long, value_enum, default_value_t = Terrain::Flat)]
        terrain: Terrain,

        /// Forward drag applied to the body each tick.
        #[arg(long, default_value_t = 0.05)]
        drag: f32,
    },

    /// Print the built-in step presets.
    Presets,

    /// Print crate information.
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum Layout {
    Quad,
    Hex,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Terrain {
    Flat,
    Slope,
    Steps,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Walk {
            ticks,
            seed,
            preset,
            preset_file,
            layout,
            terrain,
            drag,
        }) => walk(ticks, seed, &preset, preset_file.as_deref(), layout, terrain, drag),
        Some(Commands::Presets) => {
            print_presets();
            Ok(())
        }
        Some(Commands::Info) | None => {
            print_info();
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// walk
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn walk(
    ticks: u32,
    seed: u64,
    preset_name: &str,
    preset_file: Option<&std::path::Path>,
    layout: Layout,
    terrain: Terrain,
    drag: f32,
) -> Result<()> {
    let preset = match preset_file {
        Some(path) => StepPreset::from_file(path)?,
        None => presets::by_name(preset_name)
            .ok_or_else(|| anyhow!("unknown preset '{preset_name}', see `presets`"))?,
    };

    let ground = build_terrain(terrain);
    let builder = match layout {
        Layout::Quad => WalkerBuilder::quad(2.0),
        Layout::Hex => WalkerBuilder::hex(2.5),
    };
    let mut scene = builder
        .with_preset(preset)
        .with_seed(seed)
        .with_ground(ground)
        .build()?;

    println!(
        "Walking {} legs over {:?} terrain for {ticks} ticks (seed {seed})",
        scene.rig().map_or(0, |rig| rig.len()),
        terrain,
    );

    for tick in 0..ticks {
        scene.nudge_body(Vector3::new(0.0, 0.0, drag));
        scene.tick();
        if ticks >= 4 && tick % (ticks / 4) == (ticks / 4) - 1 {
            let body = scene.body().map_or_else(Vector3::zeros, |b| b.pose.position);
            println!(
                "  tick {:>6}: body at [{:.2}, {:.2}, {:.2}]",
                tick + 1,
                body.x,
                body.y,
                body.z,
            );
        }
    }

    println!("{}", scene.stats().summary());
    Ok(())
}

fn build_terrain(terrain: Terrain) -> GroundWorld {
    match terrain {
        Terrain::Flat => GroundWorld::new().with_flat(0.0),
        Terrain::Slope => GroundWorld::new().with_slope(0.0, 0.15),
        Terrain::Steps => {
            let mut world = GroundWorld::new().with_flat(0.0);
            for i in 0..8 {
                let z = 15.0 + 8.0 * i as f32;
                let top = 0.5 * (i + 1) as f32;
                world = world.with_box(
                    Vector3::new(0.0, top - 0.25, z),
                    Vector3::new(30.0, 0.25, 4.0),
                );
            }
            world
        }
    }
}

// ---------------------------------------------------------------------------
// presets / info
// ---------------------------------------------------------------------------

fn print_presets() {
    for name in presets::NAMES {
        let Some(p) = presets::by_name(name) else {
            continue;
        };
        println!("{name}:");
        println!("  near/far distance: {:.2} / {:.2}", p.near_distance, p.far_distance);
        println!("  leg length:        {:.2}", p.leg_length);
        println!("  step speed:        {:.2} (long ×{:.2}, run ×{:.2})",
            p.step_speed, p.long_step_speed_modifier, p.run_modifier);
        println!("  step height:       {:.2} (short ×{:.2})",
            p.step_height, p.short_step_height_modifier);
    }
}

fn print_info() {
    println!("striders {}", env!("CARGO_PKG_VERSION"));
    for name in [
        "striders-core",
        "striders-gait",
        "striders-balance",
        "striders-terrain",
        "striders-sim",
    ] {
        println!("  {name}");
    }
    println!("Run `striders walk --help` to simulate a walker.");
}
