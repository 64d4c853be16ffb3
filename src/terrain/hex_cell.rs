//! Cell state: elevation, color, rivers and neighbor links.

use bevy::color::Color;
use bevy::math::Vec3;
use bevy::reflect::Reflect;

use super::hex_coordinates::HexCoordinates;
use super::hex_direction::HexDirection;
use super::hex_metrics::{ELEVATION_STEP, HexEdgeType, STREAM_BED_ELEVATION_OFFSET, edge_type};

/// Index of a cell inside its [`HexGrid`](super::hex_grid::HexGrid) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct CellId(pub usize);

/// Per-cell state. Owned by the grid; mutated only through grid methods so
/// neighbor and river links stay mirrored.
#[derive(Clone, Debug)]
pub struct HexCell {
    /// Identity of the cell.
    pub coordinates: HexCoordinates,
    pub(super) position: Vec3,
    pub(super) elevation: i32,
    pub(super) color: Color,
    pub(super) chunk: usize,
    pub(super) neighbors: [Option<CellId>; 6],
    pub(super) incoming_river: Option<HexDirection>,
    pub(super) outgoing_river: Option<HexDirection>,
}

impl HexCell {
    pub(super) fn new(coordinates: HexCoordinates, color: Color, chunk: usize) -> Self {
        Self {
            coordinates,
            position: coordinates.to_position(),
            elevation: 0,
            color,
            chunk,
            neighbors: [None; 6],
            incoming_river: None,
            outgoing_river: None,
        }
    }

    /// Center of the cell, including elevation and its vertical jitter.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Integer elevation level.
    pub fn elevation(&self) -> i32 {
        self.elevation
    }

    /// Surface color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Render group this cell's geometry belongs to.
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// Neighbor in `direction`, if any.
    pub fn neighbor(&self, direction: HexDirection) -> Option<CellId> {
        self.neighbors[direction.index()]
    }

    /// Direction the river enters from, if any.
    pub fn incoming_river(&self) -> Option<HexDirection> {
        self.incoming_river
    }

    /// Direction the river leaves through, if any.
    pub fn outgoing_river(&self) -> Option<HexDirection> {
        self.outgoing_river
    }

    /// Whether a river enters this cell.
    pub fn has_incoming_river(&self) -> bool {
        self.incoming_river.is_some()
    }

    /// Whether a river leaves this cell.
    pub fn has_outgoing_river(&self) -> bool {
        self.outgoing_river.is_some()
    }

    /// Whether any river touches this cell.
    pub fn has_river(&self) -> bool {
        self.has_incoming_river() || self.has_outgoing_river()
    }

    /// Whether this cell is a river source or sink.
    pub fn has_river_begin_or_end(&self) -> bool {
        self.has_incoming_river() != self.has_outgoing_river()
    }

    /// Whether a river crosses the edge in `direction`.
    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }

    /// Height of the river bottom in this cell.
    pub fn stream_bed_y(&self) -> f32 {
        (self.elevation as f32 + STREAM_BED_ELEVATION_OFFSET) * ELEVATION_STEP
    }

    /// Edge type between this cell and `other`.
    pub fn edge_type_with(&self, other: &HexCell) -> HexEdgeType {
        edge_type(self.elevation, other.elevation)
    }
}
