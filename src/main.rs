//! Hex map viewer.
//!
//! Generates a painted, chunked hex map at startup and renders it with
//! terraced connections, cliffs and river channels.

use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;
#[cfg(feature = "native")]
use clap::Parser;
use hex_map::terrain::{TerrainConfig, TerrainPlugin};

/// Viewer options; anything left out keeps the default config.
#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(version, about = "Hex map terrain viewer")]
struct Args {
    /// Chunks per row.
    #[arg(long)]
    chunks_x: Option<usize>,
    /// Chunk rows.
    #[arg(long)]
    chunks_z: Option<usize>,
    /// Seed of the height field.
    #[arg(long)]
    seed: Option<u32>,
    /// Seed of the vertex perturbation noise.
    #[arg(long)]
    noise_seed: Option<u32>,
    /// Number of rivers to trace.
    #[arg(long)]
    rivers: Option<usize>,
    /// Open the world inspector.
    #[arg(long)]
    inspect: bool,
}

#[cfg(feature = "native")]
impl Args {
    fn apply(&self, cfg: &mut TerrainConfig) {
        if let Some(n) = self.chunks_x {
            cfg.grid.chunk_count_x = n;
        }
        if let Some(n) = self.chunks_z {
            cfg.grid.chunk_count_z = n;
        }
        if let Some(seed) = self.seed {
            cfg.terrain.height_noise_seed = seed;
        }
        if let Some(seed) = self.noise_seed {
            cfg.metrics.noise_seed = seed;
        }
        if let Some(n) = self.rivers {
            cfg.terrain.river_count = n;
        }
    }
}

fn main() {
    #[cfg(feature = "native")]
    let (cfg, inspect) = {
        let args = Args::parse();
        let mut cfg = TerrainConfig::default();
        args.apply(&mut cfg);
        (cfg, args.inspect)
    };
    #[cfg(not(feature = "native"))]
    let (cfg, inspect) = (TerrainConfig::default(), false);

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hex Map".into(),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(TerrainPlugin(cfg));

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    if inspect {
        app.add_plugins(bevy_egui::EguiPlugin::default())
            .add_plugins(WorldInspectorPlugin::new());
    }

    app.run();
}
