use bevy::prelude::*;

use super::TerrainConfig;
use super::entities::{HexGridChunk, TerrainMap};
use super::hex_grid::HexGrid;
use super::hex_mesh::HexMeshData;
use super::hex_metrics::{HexMetrics, INNER_RADIUS, OUTER_RADIUS};
use super::terrain_painter;

// ── Startup ─────────────────────────────────────────────────────────

/// Builds and paints the grid, spawns one empty-mesh entity per chunk under a
/// common parent, and frames the map with a camera and a sun.
///
/// Every chunk starts dirty, so the meshes are filled on the first update.
pub fn generate_map(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<TerrainConfig>,
) {
    let mut grid = HexGrid::new(&cfg.grid, HexMetrics::from_settings(&cfg.metrics));
    terrain_painter::paint_terrain(&mut grid, &cfg.terrain);

    // Vertex colors carry the cell colors.
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.9,
        ..default()
    });

    let map_entity = commands
        .spawn((
            Name::new("HexGrid"),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    for index in 0..grid.chunk_count() {
        let chunk = commands
            .spawn((
                HexGridChunk { index },
                Name::new(format!("HexGridChunk({index})")),
                Mesh3d(meshes.add(HexMeshData::default().into_mesh())),
                MeshMaterial3d(material.clone()),
                Transform::default(),
            ))
            .id();
        commands.entity(map_entity).add_child(chunk);
    }

    let width = grid.cell_count_x() as f32 * INNER_RADIUS * 2.0;
    let depth = grid.cell_count_z() as f32 * OUTER_RADIUS * 1.5;
    let center = Vec3::new(width * 0.5, 0.0, depth * 0.5);

    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Transform::from_xyz(center.x, width.max(depth) * 0.6, center.z + depth * 0.7)
            .looking_at(center, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(1.0, 2.0, 0.5).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!(
        "generated hex map: {}x{} cells in {} chunks",
        grid.cell_count_x(),
        grid.cell_count_z(),
        grid.chunk_count()
    );
    commands.insert_resource(TerrainMap { grid });
}
