//! Hex terrain: cell store, geometry metrics, chunked triangulation, and the
//! plugin that keeps chunk meshes in sync with the grid.
//!
//! The core ([`hex_grid`], [`triangulation`], [`hex_mesh`]) is plain data and
//! functions; the ECS side only owns the grid and swaps meshes.

pub mod edge_vertices;
pub mod hex_cell;
pub mod hex_coordinates;
pub mod hex_direction;
pub mod hex_grid;
pub mod hex_mesh;
pub mod hex_metrics;
pub mod terrain_painter;
pub mod triangulation;

mod entities;
mod startup_systems;
mod systems;

pub use entities::{HexGridChunk, TerrainMap};

use bevy::prelude::*;

/// Nested configuration for the terrain subsystem.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct TerrainConfig {
    /// Grid dimensions and initial cell color.
    pub grid: GridSettings,
    /// Noise and perturbation parameters.
    pub metrics: MetricsSettings,
    /// Startup painter: heights, palette, rivers.
    pub terrain: TerrainSettings,
    /// Background clear color.
    pub clear_color: Color,
}

/// Grid layout in chunks of cells.
#[derive(Clone, Debug, Reflect)]
pub struct GridSettings {
    /// Chunks per row.
    pub chunk_count_x: usize,
    /// Chunk rows.
    pub chunk_count_z: usize,
    /// Cells per chunk row.
    pub chunk_size_x: usize,
    /// Cell rows per chunk.
    pub chunk_size_z: usize,
    /// Color every cell starts with.
    pub default_color: Color,
}

/// Noise channels behind vertex and elevation jitter.
#[derive(Clone, Debug, Reflect)]
pub struct MetricsSettings {
    /// Seed of the first channel; the others use the following seeds.
    pub noise_seed: u32,
    /// Octaves per channel.
    pub noise_octaves: usize,
    /// World-to-noise scale factor.
    pub noise_scale: f64,
    /// Maximum horizontal displacement of a perturbed vertex.
    pub cell_perturb_strength: f32,
    /// Maximum vertical displacement of a cell center.
    pub elevation_perturb_strength: f32,
}

/// Parameters of the deterministic startup painter.
#[derive(Clone, Debug, Reflect)]
pub struct TerrainSettings {
    /// Seed for the height field.
    pub height_noise_seed: u32,
    /// Octaves of the height field.
    pub height_noise_octaves: usize,
    /// World-to-noise scale factor of the height field.
    pub height_noise_scale: f64,
    /// Highest elevation level the painter assigns.
    pub max_elevation: i32,
    /// Number of rivers to trace from the highest cells.
    pub river_count: usize,
    /// Maximum number of steps a single river takes downhill.
    pub max_river_length: usize,
    /// Colors by elevation band, lowest first.
    pub palette: Vec<Color>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            grid: GridSettings {
                chunk_count_x: 4,
                chunk_count_z: 3,
                chunk_size_x: 5,
                chunk_size_z: 5,
                default_color: Color::srgb(0.9, 0.9, 0.9),
            },
            metrics: MetricsSettings {
                noise_seed: 7,
                noise_octaves: 3,
                noise_scale: 0.03,
                cell_perturb_strength: 4.0,
                elevation_perturb_strength: 1.5,
            },
            terrain: TerrainSettings {
                height_noise_seed: 42,
                height_noise_octaves: 4,
                height_noise_scale: 0.008,
                max_elevation: 6,
                river_count: 4,
                max_river_length: 24,
                palette: vec![
                    Color::srgb(0.85, 0.8, 0.55),
                    Color::srgb(0.45, 0.7, 0.3),
                    Color::srgb(0.3, 0.55, 0.25),
                    Color::srgb(0.5, 0.45, 0.35),
                    Color::srgb(0.95, 0.95, 0.97),
                ],
            },
            clear_color: Color::srgb(0.55, 0.7, 0.85),
        }
    }
}

/// Terrain plugin: builds and paints the grid at startup, then rebuilds the
/// mesh of every chunk the grid reports stale.
pub struct TerrainPlugin(pub TerrainConfig);

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TerrainConfig>()
            .register_type::<HexGridChunk>()
            .insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.clear_color))
            .add_systems(Startup, startup_systems::generate_map)
            .add_systems(
                Update,
                systems::rebuild_dirty_chunks.run_if(resource_exists::<TerrainMap>),
            );
    }
}
