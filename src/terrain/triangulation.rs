//! Turns cells into mesh buffers: per-direction fans and river channels,
//! terraced or straight connections to neighbors, and corner fills where
//! three cells meet.
//!
//! Each connection and corner is emitted once, by the cell that owns it
//! (connections for NE, E, SE; corners for NE and E), so triangulating a
//! chunk never duplicates geometry of its neighbors.

use bevy::color::{LinearRgba, Mix};
use bevy::math::Vec3;

use super::edge_vertices::EdgeVertices;
use super::hex_cell::{CellId, HexCell};
use super::hex_direction::HexDirection;
use super::hex_grid::HexGrid;
use super::hex_mesh::{HexMeshBuilder, HexMeshData};
use super::hex_metrics::{
    self, HexEdgeType, INNER_TO_OUTER, TERRACE_STEPS, first_solid_corner, second_solid_corner,
    solid_edge_middle, terrace_lerp, terrace_lerp_color,
};

/// Triangulates `cells` of `grid` into one set of buffers.
pub fn triangulate(grid: &HexGrid, cells: impl IntoIterator<Item = CellId>) -> HexMeshData {
    let mut t = Triangulator {
        grid,
        mesh: HexMeshBuilder::new(grid.metrics()),
    };
    for id in cells {
        t.triangulate_cell(grid.cell(id));
    }
    t.mesh.finish()
}

/// Triangulates every cell of render group `chunk`.
pub fn triangulate_chunk(grid: &HexGrid, chunk: usize) -> HexMeshData {
    triangulate(grid, grid.chunk_cells(chunk).iter().copied())
}

/// A corner where three cells meet: the point plus the cell it belongs to.
#[derive(Clone, Copy)]
struct Corner<'c> {
    position: Vec3,
    cell: &'c HexCell,
}

impl Corner<'_> {
    fn elevation(&self) -> i32 {
        self.cell.elevation()
    }

    fn color(&self) -> LinearRgba {
        self.cell.color().to_linear()
    }
}

/// Rotates three corners so the first is the lowest.
///
/// Only rotates, never swaps, so the winding of the triangle is preserved.
/// On ties the earlier corner in `c1, c2, c3` order wins.
fn order_corner<'c>(
    c1: Corner<'c>,
    c2: Corner<'c>,
    c3: Corner<'c>,
) -> (Corner<'c>, Corner<'c>, Corner<'c>) {
    if c1.elevation() <= c2.elevation() {
        if c1.elevation() <= c3.elevation() {
            (c1, c2, c3)
        } else {
            (c3, c1, c2)
        }
    } else if c2.elevation() <= c3.elevation() {
        (c2, c3, c1)
    } else {
        (c3, c1, c2)
    }
}

struct Triangulator<'a> {
    grid: &'a HexGrid,
    mesh: HexMeshBuilder<'a>,
}

impl<'a> Triangulator<'a> {
    fn perturb(&self, position: Vec3) -> Vec3 {
        self.grid.metrics().perturb(position)
    }

    fn triangulate_cell(&mut self, cell: &'a HexCell) {
        for direction in HexDirection::ALL {
            self.triangulate_direction(direction, cell);
        }
    }

    fn triangulate_direction(&mut self, direction: HexDirection, cell: &'a HexCell) {
        let center = cell.position();
        let color = cell.color().to_linear();
        let mut e = EdgeVertices::new(
            center + first_solid_corner(direction),
            center + second_solid_corner(direction),
        );

        if cell.has_river() {
            if cell.has_river_through_edge(direction) {
                e.v3.y = cell.stream_bed_y();
                if cell.has_river_begin_or_end() {
                    self.triangulate_with_river_begin_or_end(center, &e, color);
                } else {
                    self.triangulate_with_river(direction, cell, center, &e, color);
                }
            } else {
                self.triangulate_adjacent_to_river(direction, cell, center, &e, color);
            }
        } else {
            self.triangulate_edge_fan(center, &e, color);
        }

        if direction <= HexDirection::SouthEast {
            self.triangulate_connection(direction, cell, &e);
        }
    }

    // ── Rivers ─────────────────────────────────────────────────────

    fn triangulate_with_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        center: Vec3,
        e: &EdgeVertices,
        color: LinearRgba,
    ) {
        let (center_l, center_r) = if cell.has_river_through_edge(direction.opposite()) {
            (
                center + first_solid_corner(direction.previous()) * 0.25,
                center + second_solid_corner(direction.next()) * 0.25,
            )
        } else if cell.has_river_through_edge(direction.next()) {
            (center, center.lerp(e.v5, 2.0 / 3.0))
        } else if cell.has_river_through_edge(direction.previous()) {
            (center.lerp(e.v1, 2.0 / 3.0), center)
        } else if cell.has_river_through_edge(direction.next2()) {
            (
                center,
                center + solid_edge_middle(direction.next()) * (0.5 * INNER_TO_OUTER),
            )
        } else {
            (
                center + solid_edge_middle(direction.previous()) * (0.5 * INNER_TO_OUTER),
                center,
            )
        };

        let mut center = center_l.lerp(center_r, 0.5);
        let mut m = EdgeVertices::build(center_l.lerp(e.v1, 0.5), center_r.lerp(e.v5, 0.5), true);
        m.v3.y = e.v3.y;
        center.y = e.v3.y;

        self.triangulate_edge_strip(&m, color, e, color);

        self.mesh.add_triangle(center_l, m.v1, m.v2);
        self.mesh.add_triangle_color(color);
        self.mesh.add_quad(center_l, center, m.v2, m.v3);
        self.mesh.add_quad_color(color);
        self.mesh.add_quad(center, center_r, m.v3, m.v4);
        self.mesh.add_quad_color(color);
        self.mesh.add_triangle(center_r, m.v4, m.v5);
        self.mesh.add_triangle_color(color);
    }

    fn triangulate_with_river_begin_or_end(
        &mut self,
        center: Vec3,
        e: &EdgeVertices,
        color: LinearRgba,
    ) {
        let mut m = EdgeVertices::build(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5), false);
        m.v3.y = e.v3.y;
        self.triangulate_edge_strip(&m, color, e, color);
        self.triangulate_edge_fan(center, &m, color);
    }

    /// Part of a river cell the river does not cross. The fan center moves
    /// toward this edge where the channel bends, keeping the banks convex.
    fn triangulate_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        mut center: Vec3,
        e: &EdgeVertices,
        color: LinearRgba,
    ) {
        if cell.has_river_through_edge(direction.next()) {
            if cell.has_river_through_edge(direction.previous()) {
                center += solid_edge_middle(direction) * (INNER_TO_OUTER * 0.5);
            } else if cell.has_river_through_edge(direction.previous2()) {
                center += first_solid_corner(direction) * 0.25;
            }
        } else if cell.has_river_through_edge(direction.previous())
            && cell.has_river_through_edge(direction.next2())
        {
            center += second_solid_corner(direction) * 0.25;
        }

        let m = EdgeVertices::build(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5), false);
        self.triangulate_edge_strip(&m, color, e, color);
        self.triangulate_edge_fan(center, &m, color);
    }

    // ── Fans & strips ──────────────────────────────────────────────

    fn triangulate_edge_fan(&mut self, center: Vec3, edge: &EdgeVertices, color: LinearRgba) {
        let p = edge.points();
        for pair in p.windows(2) {
            self.mesh.add_triangle(center, pair[0], pair[1]);
            self.mesh.add_triangle_color(color);
        }
    }

    fn triangulate_edge_strip(
        &mut self,
        e1: &EdgeVertices,
        c1: LinearRgba,
        e2: &EdgeVertices,
        c2: LinearRgba,
    ) {
        let (a, b) = (e1.points(), e2.points());
        for (s, t) in a.windows(2).zip(b.windows(2)) {
            self.mesh.add_quad(s[0], s[1], t[0], t[1]);
            self.mesh.add_quad_color_pair(c1, c2);
        }
    }

    // ── Connections ────────────────────────────────────────────────

    fn triangulate_connection(
        &mut self,
        direction: HexDirection,
        cell: &'a HexCell,
        e1: &EdgeVertices,
    ) {
        let Some(neighbor) = self.grid.neighbor_cell(cell, direction) else {
            return;
        };

        let mut bridge = hex_metrics::bridge(direction);
        bridge.y = neighbor.position().y - cell.position().y;
        let mut e2 = EdgeVertices::new(e1.v1 + bridge, e1.v5 + bridge);
        if cell.has_river_through_edge(direction) {
            e2.v3.y = neighbor.stream_bed_y();
        }

        if cell.edge_type_with(neighbor) == HexEdgeType::Slope {
            self.triangulate_edge_terraces(e1, cell, &e2, neighbor);
        } else {
            self.triangulate_edge_strip(
                e1,
                cell.color().to_linear(),
                &e2,
                neighbor.color().to_linear(),
            );
        }

        if direction <= HexDirection::East
            && let Some(next) = self.grid.neighbor_cell(cell, direction.next())
        {
            let mut v5 = e1.v5 + hex_metrics::bridge(direction.next());
            v5.y = next.position().y;
            let (bottom, left, right) = order_corner(
                Corner { position: e1.v5, cell },
                Corner { position: e2.v5, cell: neighbor },
                Corner { position: v5, cell: next },
            );
            self.triangulate_corner(bottom, left, right);
        }
    }

    fn triangulate_edge_terraces(
        &mut self,
        begin: &EdgeVertices,
        begin_cell: &HexCell,
        end: &EdgeVertices,
        end_cell: &HexCell,
    ) {
        let begin_color = begin_cell.color().to_linear();
        let end_color = end_cell.color().to_linear();

        let mut e2 = EdgeVertices::terrace_lerp(begin, end, 1);
        let mut c2 = terrace_lerp_color(begin_color, end_color, 1);
        self.triangulate_edge_strip(begin, begin_color, &e2, c2);

        for i in 2..TERRACE_STEPS {
            let (e1, c1) = (e2, c2);
            e2 = EdgeVertices::terrace_lerp(begin, end, i);
            c2 = terrace_lerp_color(begin_color, end_color, i);
            self.triangulate_edge_strip(&e1, c1, &e2, c2);
        }

        self.triangulate_edge_strip(&e2, c2, end, end_color);
    }

    // ── Corners ────────────────────────────────────────────────────

    /// Fills the gap between three cells. `bottom` must be the lowest.
    fn triangulate_corner(&mut self, bottom: Corner<'a>, left: Corner<'a>, right: Corner<'a>) {
        use HexEdgeType::{Cliff, Flat, Slope};

        let left_edge = bottom.cell.edge_type_with(left.cell);
        let right_edge = bottom.cell.edge_type_with(right.cell);

        match (left_edge, right_edge) {
            (Slope, Slope) => self.triangulate_corner_terraces(bottom, left, right),
            (Slope, Flat) => self.triangulate_corner_terraces(left, right, bottom),
            (Slope, Cliff) => self.triangulate_corner_terraces_cliff(bottom, left, right),
            (Flat, Slope) => self.triangulate_corner_terraces(right, bottom, left),
            (Cliff, Slope) => self.triangulate_corner_cliff_terraces(bottom, left, right),
            _ if left.cell.edge_type_with(right.cell) == Slope => {
                if left.elevation() < right.elevation() {
                    self.triangulate_corner_cliff_terraces(right, bottom, left);
                } else {
                    self.triangulate_corner_terraces_cliff(left, right, bottom);
                }
            }
            _ => {
                self.mesh
                    .add_triangle(bottom.position, left.position, right.position);
                self.mesh
                    .add_triangle_colors(bottom.color(), left.color(), right.color());
            }
        }
    }

    fn triangulate_corner_terraces(
        &mut self,
        begin: Corner<'a>,
        left: Corner<'a>,
        right: Corner<'a>,
    ) {
        let mut v3 = terrace_lerp(begin.position, left.position, 1);
        let mut v4 = terrace_lerp(begin.position, right.position, 1);
        let mut c3 = terrace_lerp_color(begin.color(), left.color(), 1);
        let mut c4 = terrace_lerp_color(begin.color(), right.color(), 1);

        self.mesh.add_triangle(begin.position, v3, v4);
        self.mesh.add_triangle_colors(begin.color(), c3, c4);

        for i in 2..TERRACE_STEPS {
            let (v1, v2, c1, c2) = (v3, v4, c3, c4);
            v3 = terrace_lerp(begin.position, left.position, i);
            v4 = terrace_lerp(begin.position, right.position, i);
            c3 = terrace_lerp_color(begin.color(), left.color(), i);
            c4 = terrace_lerp_color(begin.color(), right.color(), i);
            self.mesh.add_quad(v1, v2, v3, v4);
            self.mesh.add_quad_colors(c1, c2, c3, c4);
        }

        self.mesh.add_quad(v3, v4, left.position, right.position);
        self.mesh.add_quad_colors(c3, c4, left.color(), right.color());
    }

    /// Terraces climb from `begin` to `left`; `begin` to `right` is a cliff.
    fn triangulate_corner_terraces_cliff(
        &mut self,
        begin: Corner<'a>,
        left: Corner<'a>,
        right: Corner<'a>,
    ) {
        let (boundary, boundary_color) = self.cliff_boundary(begin, right);
        self.triangulate_boundary_triangle(begin, left, boundary, boundary_color);
        self.fill_cliff_gap(left, right, boundary, boundary_color);
    }

    /// Terraces climb from `begin` to `right`; `begin` to `left` is a cliff.
    fn triangulate_corner_cliff_terraces(
        &mut self,
        begin: Corner<'a>,
        left: Corner<'a>,
        right: Corner<'a>,
    ) {
        let (boundary, boundary_color) = self.cliff_boundary(begin, left);
        self.triangulate_boundary_triangle(right, begin, boundary, boundary_color);
        self.fill_cliff_gap(left, right, boundary, boundary_color);
    }

    /// Point on the perturbed cliff edge where the terraces converge, one
    /// elevation level above `begin`. Returned already perturbed.
    fn cliff_boundary(&self, begin: Corner<'a>, top: Corner<'a>) -> (Vec3, LinearRgba) {
        // Only reached across cliffs, which span at least two levels.
        let delta = top.elevation() - begin.elevation();
        debug_assert_ne!(delta, 0);
        let b = 1.0 / delta.abs() as f32;
        let boundary = self
            .perturb(begin.position)
            .lerp(self.perturb(top.position), b);
        (boundary, begin.color().mix(&top.color(), b))
    }

    fn fill_cliff_gap(
        &mut self,
        left: Corner<'a>,
        right: Corner<'a>,
        boundary: Vec3,
        boundary_color: LinearRgba,
    ) {
        if left.cell.edge_type_with(right.cell) == HexEdgeType::Slope {
            self.triangulate_boundary_triangle(left, right, boundary, boundary_color);
        } else {
            let (l, r) = (self.perturb(left.position), self.perturb(right.position));
            self.mesh.add_triangle_unperturbed(l, r, boundary);
            self.mesh
                .add_triangle_colors(left.color(), right.color(), boundary_color);
        }
    }

    /// Fans the terrace points from `begin` to `left` into `boundary`.
    fn triangulate_boundary_triangle(
        &mut self,
        begin: Corner<'a>,
        left: Corner<'a>,
        boundary: Vec3,
        boundary_color: LinearRgba,
    ) {
        let start = self.perturb(begin.position);
        let mut v2 = self.perturb(terrace_lerp(begin.position, left.position, 1));
        let mut c2 = terrace_lerp_color(begin.color(), left.color(), 1);

        self.mesh.add_triangle_unperturbed(start, v2, boundary);
        self.mesh
            .add_triangle_colors(begin.color(), c2, boundary_color);

        for i in 2..TERRACE_STEPS {
            let (v1, c1) = (v2, c2);
            v2 = self.perturb(terrace_lerp(begin.position, left.position, i));
            c2 = terrace_lerp_color(begin.color(), left.color(), i);
            self.mesh.add_triangle_unperturbed(v1, v2, boundary);
            self.mesh.add_triangle_colors(c1, c2, boundary_color);
        }

        let end = self.perturb(left.position);
        self.mesh.add_triangle_unperturbed(v2, end, boundary);
        self.mesh
            .add_triangle_colors(c2, left.color(), boundary_color);
    }
}
