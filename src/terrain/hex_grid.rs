//! Cell store: an arena of cells with neighbor links, rivers and chunk
//! dirty tracking.

use bevy::color::Color;
use bevy::log::debug;
use bevy::math::Vec3;
use bevy::platform::collections::HashSet;

use super::GridSettings;
use super::hex_cell::{CellId, HexCell};
use super::hex_coordinates::HexCoordinates;
use super::hex_direction::HexDirection;
use super::hex_metrics::{ELEVATION_STEP, HexMetrics};

/// Arena of cells laid out in offset rows, split into rectangular chunks.
///
/// Neighbor links are [`CellId`]s into the arena. Every mutation records the
/// chunks whose geometry went stale; callers drain them with
/// [`HexGrid::take_dirty_chunks`] and rebuild.
pub struct HexGrid {
    cell_count_x: usize,
    cell_count_z: usize,
    chunk_count: usize,
    cells: Vec<HexCell>,
    chunks: Vec<Vec<CellId>>,
    dirty_chunks: HashSet<usize>,
    metrics: HexMetrics,
}

impl HexGrid {
    /// Creates a flat, uniformly colored grid. All chunks start dirty.
    pub fn new(g: &GridSettings, metrics: HexMetrics) -> Self {
        let cell_count_x = g.chunk_count_x * g.chunk_size_x;
        let cell_count_z = g.chunk_count_z * g.chunk_size_z;
        let chunk_count = g.chunk_count_x * g.chunk_count_z;

        let mut grid = Self {
            cell_count_x,
            cell_count_z,
            chunk_count,
            cells: Vec::with_capacity(cell_count_x * cell_count_z),
            chunks: vec![Vec::new(); chunk_count],
            dirty_chunks: HashSet::default(),
            metrics,
        };

        for z in 0..cell_count_z {
            for x in 0..cell_count_x {
                let chunk = (z / g.chunk_size_z) * g.chunk_count_x + x / g.chunk_size_x;
                grid.create_cell(x, z, chunk, g.default_color);
            }
        }

        grid.mark_all_dirty();
        grid
    }

    fn create_cell(&mut self, x: usize, z: usize, chunk: usize, color: Color) {
        let id = CellId(self.cells.len());
        let coordinates = HexCoordinates::from_offset_coordinates(x as i32, z as i32);
        self.cells.push(HexCell::new(coordinates, color, chunk));
        self.chunks[chunk].push(id);

        let width = self.cell_count_x;
        if x > 0 {
            self.set_neighbor(id, HexDirection::West, CellId(id.0 - 1));
        }
        if z > 0 {
            if z % 2 == 0 {
                self.set_neighbor(id, HexDirection::SouthEast, CellId(id.0 - width));
                if x > 0 {
                    self.set_neighbor(id, HexDirection::SouthWest, CellId(id.0 - width - 1));
                }
            } else {
                self.set_neighbor(id, HexDirection::SouthWest, CellId(id.0 - width));
                if x < width - 1 {
                    self.set_neighbor(id, HexDirection::SouthEast, CellId(id.0 - width + 1));
                }
            }
        }
    }

    // ── Lookup ─────────────────────────────────────────────────────

    /// Noise and perturbation settings used by this grid.
    pub fn metrics(&self) -> &HexMetrics {
        &self.metrics
    }

    /// Number of cells per row.
    pub fn cell_count_x(&self) -> usize {
        self.cell_count_x
    }

    /// Number of rows.
    pub fn cell_count_z(&self) -> usize {
        self.cell_count_z
    }

    /// Number of render groups.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Cell by id. Ids handed out by this grid are always valid.
    pub fn cell(&self, id: CellId) -> &HexCell {
        &self.cells[id.0]
    }

    /// All cells with their ids, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &HexCell)> {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i), c))
    }

    /// Cells belonging to render group `chunk`.
    pub fn chunk_cells(&self, chunk: usize) -> &[CellId] {
        &self.chunks[chunk]
    }

    /// Cell at `coordinates`, or `None` outside the grid.
    pub fn cell_at(&self, coordinates: HexCoordinates) -> Option<CellId> {
        let (x, z) = coordinates.to_offset_coordinates();
        let x = usize::try_from(x).ok()?;
        let z = usize::try_from(z).ok()?;
        let inside = x < self.cell_count_x && z < self.cell_count_z;
        inside.then_some(CellId(z * self.cell_count_x + x))
    }

    /// Cell under the horizontal part of a grid-local position.
    pub fn cell_at_position(&self, position: Vec3) -> Option<CellId> {
        self.cell_at(HexCoordinates::from_position(position))
    }

    /// Neighbor of `id` in `direction`.
    pub fn neighbor(&self, id: CellId, direction: HexDirection) -> Option<CellId> {
        self.cells[id.0].neighbor(direction)
    }

    /// Neighbor of `cell` in `direction`, resolved to the cell itself.
    pub fn neighbor_cell(&self, cell: &HexCell, direction: HexDirection) -> Option<&HexCell> {
        cell.neighbor(direction).map(|id| &self.cells[id.0])
    }

    /// Links `id` and `other` across `direction`, in both directions.
    ///
    /// Cells previously linked through either slot lose their back link, and
    /// rivers over a replaced edge are removed.
    pub fn set_neighbor(&mut self, id: CellId, direction: HexDirection, other: CellId) {
        if self.neighbor(id, direction) == Some(other) {
            return;
        }
        let back = direction.opposite();
        self.unlink(id, direction);
        self.unlink(other, back);
        self.cells[id.0].neighbors[direction.index()] = Some(other);
        self.cells[other.0].neighbors[back.index()] = Some(id);
        self.refresh(id);
        self.refresh(other);
    }

    fn unlink(&mut self, id: CellId, direction: HexDirection) {
        let Some(old) = self.neighbor(id, direction) else {
            return;
        };
        if self.cells[id.0].outgoing_river == Some(direction) {
            self.remove_outgoing_river(id);
        }
        if self.cells[id.0].incoming_river == Some(direction) {
            self.remove_incoming_river(id);
        }
        self.refresh(old);

        self.cells[id.0].neighbors[direction.index()] = None;
        let back = &mut self.cells[old.0].neighbors[direction.opposite().index()];
        if *back == Some(id) {
            *back = None;
        }
    }

    // ── Dirty tracking ─────────────────────────────────────────────

    /// Drains the stale render groups, in ascending order.
    pub fn take_dirty_chunks(&mut self) -> Vec<usize> {
        let mut dirty: Vec<usize> = self.dirty_chunks.drain().collect();
        dirty.sort_unstable();
        dirty
    }

    /// Marks every render group stale.
    pub fn mark_all_dirty(&mut self) {
        self.dirty_chunks.extend(0..self.chunk_count);
    }

    /// Marks the cell's chunk and every neighboring chunk stale.
    fn refresh(&mut self, id: CellId) {
        let cell = &self.cells[id.0];
        let chunk = cell.chunk;
        let neighbor_chunks: Vec<usize> = cell
            .neighbors
            .iter()
            .flatten()
            .map(|n| self.cells[n.0].chunk)
            .filter(|&c| c != chunk)
            .collect();
        self.dirty_chunks.insert(chunk);
        self.dirty_chunks.extend(neighbor_chunks);
    }

    fn refresh_self_only(&mut self, id: CellId) {
        self.dirty_chunks.insert(self.cells[id.0].chunk);
    }

    // ── Mutation ───────────────────────────────────────────────────

    /// Sets the surface color.
    pub fn set_color(&mut self, id: CellId, color: Color) {
        if self.cells[id.0].color == color {
            return;
        }
        self.cells[id.0].color = color;
        self.refresh(id);
    }

    /// Sets the elevation level, re-jitters the cell height, and drops any
    /// river that would now flow uphill.
    pub fn set_elevation(&mut self, id: CellId, elevation: i32) {
        if self.cells[id.0].elevation == elevation {
            return;
        }

        let mut position = self.cells[id.0].position;
        position.y = elevation as f32 * ELEVATION_STEP + self.metrics.elevation_perturbation(position);

        let cell = &mut self.cells[id.0];
        cell.elevation = elevation;
        cell.position = position;

        if let Some(direction) = self.cells[id.0].outgoing_river
            && let Some(n) = self.neighbor(id, direction)
            && elevation < self.cells[n.0].elevation
        {
            self.remove_outgoing_river(id);
        }
        if let Some(direction) = self.cells[id.0].incoming_river
            && let Some(n) = self.neighbor(id, direction)
            && elevation > self.cells[n.0].elevation
        {
            self.remove_incoming_river(id);
        }

        self.refresh(id);
    }

    /// Starts a river leaving `id` through `direction`.
    ///
    /// Ignored when there is no neighbor there or the neighbor is higher.
    /// Replaces any existing outgoing river of `id` and any incoming river of
    /// the neighbor.
    pub fn set_outgoing_river(&mut self, id: CellId, direction: HexDirection) {
        let cell = &self.cells[id.0];
        if cell.outgoing_river == Some(direction) {
            return;
        }
        let Some(n) = cell.neighbor(direction) else {
            debug!("river from {} {direction:?} rejected: no neighbor", cell.coordinates);
            return;
        };
        if cell.elevation < self.cells[n.0].elevation {
            debug!("river from {} {direction:?} rejected: uphill", cell.coordinates);
            return;
        }

        self.remove_outgoing_river(id);
        if self.cells[id.0].incoming_river == Some(direction) {
            self.remove_incoming_river(id);
        }
        self.cells[id.0].outgoing_river = Some(direction);
        self.refresh_self_only(id);

        self.remove_incoming_river(n);
        self.cells[n.0].incoming_river = Some(direction.opposite());
        self.refresh_self_only(n);
    }

    /// Removes the outgoing river of `id` and the matching incoming river of
    /// its downstream neighbor.
    pub fn remove_outgoing_river(&mut self, id: CellId) {
        let Some(direction) = self.cells[id.0].outgoing_river.take() else {
            return;
        };
        self.refresh_self_only(id);
        if let Some(n) = self.neighbor(id, direction) {
            self.cells[n.0].incoming_river = None;
            self.refresh_self_only(n);
        }
    }

    /// Removes the incoming river of `id` and the matching outgoing river of
    /// its upstream neighbor.
    pub fn remove_incoming_river(&mut self, id: CellId) {
        let Some(direction) = self.cells[id.0].incoming_river.take() else {
            return;
        };
        self.refresh_self_only(id);
        if let Some(n) = self.neighbor(id, direction) {
            self.cells[n.0].outgoing_river = None;
            self.refresh_self_only(n);
        }
    }

    /// Removes both rivers touching `id`.
    pub fn remove_river(&mut self, id: CellId) {
        self.remove_outgoing_river(id);
        self.remove_incoming_river(id);
    }
}
