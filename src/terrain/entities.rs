use bevy::prelude::*;

use super::hex_grid::HexGrid;

/// Owns the cell store. Edit cells through `grid`; stale chunks are picked
/// up by the rebuild system on the next update.
#[derive(Resource)]
pub struct TerrainMap {
    /// The map's cells, chunk membership and dirty set.
    pub grid: HexGrid,
}

/// One render group of the map. Its mesh is replaced whenever the grid
/// reports the chunk stale.
#[derive(Component, Reflect)]
pub struct HexGridChunk {
    /// Chunk index inside the grid.
    pub index: usize,
}
