use bevy::prelude::*;

use super::entities::{HexGridChunk, TerrainMap};
use super::triangulation;

// ── Update: chunk meshes ───────────────────────────────────────────

/// Re-triangulates every chunk the grid reports stale and swaps its mesh.
///
/// Stale chunks are drained once per frame, so any number of cell edits in
/// a frame costs one rebuild per affected chunk.
pub fn rebuild_dirty_chunks(
    mut commands: Commands,
    mut map: ResMut<TerrainMap>,
    mut meshes: ResMut<Assets<Mesh>>,
    chunks: Query<(Entity, &HexGridChunk, Option<&Mesh3d>)>,
) {
    let dirty = map.grid.take_dirty_chunks();
    if dirty.is_empty() {
        return;
    }

    for (entity, chunk, old_mesh) in &chunks {
        if dirty.binary_search(&chunk.index).is_err() {
            continue;
        }
        let data = triangulation::triangulate_chunk(&map.grid, chunk.index);
        debug!(
            "rebuilt chunk {}: {} triangles",
            chunk.index,
            data.triangle_count()
        );
        if let Some(old) = old_mesh {
            meshes.remove(&old.0);
        }
        commands
            .entity(entity)
            .insert(Mesh3d(meshes.add(data.into_mesh())));
    }
}
