//! Append-only vertex, index and color buffers for one chunk mesh.

use bevy::asset::RenderAssetUsages;
use bevy::color::LinearRgba;
use bevy::math::Vec3;
use bevy::mesh::{Indices, Mesh};
use bevy::render::render_resource::PrimitiveTopology;

use super::hex_metrics::HexMetrics;
use crate::math;

/// Accumulates triangles for a chunk. Positions go through
/// [`HexMetrics::perturb`] unless added with an `_unperturbed` method.
///
/// Colors are pushed separately and must end up one per vertex.
pub struct HexMeshBuilder<'a> {
    metrics: &'a HexMetrics,
    vertices: Vec<Vec3>,
    triangles: Vec<u32>,
    colors: Vec<LinearRgba>,
}

impl<'a> HexMeshBuilder<'a> {
    /// Empty builder perturbing with `metrics`.
    pub fn new(metrics: &'a HexMetrics) -> Self {
        Self {
            metrics,
            vertices: Vec::new(),
            triangles: Vec::new(),
            colors: Vec::new(),
        }
    }

    fn next_index(&self) -> u32 {
        self.vertices.len() as u32
    }

    // ── Geometry ───────────────────────────────────────────────────

    /// Adds a perturbed triangle.
    pub fn add_triangle(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let m = self.metrics;
        self.add_triangle_unperturbed(m.perturb(v1), m.perturb(v2), m.perturb(v3));
    }

    /// Adds a triangle exactly as given.
    pub fn add_triangle_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let i = self.next_index();
        self.vertices.extend([v1, v2, v3]);
        self.triangles.extend([i, i + 1, i + 2]);
    }

    /// Adds a perturbed quad. `v1 v2` is one side and `v3 v4` the other,
    /// split into triangles `v1 v3 v2` and `v2 v3 v4`.
    pub fn add_quad(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let m = self.metrics;
        let i = self.next_index();
        self.vertices
            .extend([m.perturb(v1), m.perturb(v2), m.perturb(v3), m.perturb(v4)]);
        self.triangles
            .extend([i, i + 2, i + 1, i + 1, i + 2, i + 3]);
    }

    // ── Colors ─────────────────────────────────────────────────────

    /// One color for all three vertices of the last triangle.
    pub fn add_triangle_color(&mut self, color: LinearRgba) {
        self.colors.extend([color; 3]);
    }

    /// Per-vertex colors for the last triangle.
    pub fn add_triangle_colors(&mut self, c1: LinearRgba, c2: LinearRgba, c3: LinearRgba) {
        self.colors.extend([c1, c2, c3]);
    }

    /// One color for all four vertices of the last quad.
    pub fn add_quad_color(&mut self, color: LinearRgba) {
        self.colors.extend([color; 4]);
    }

    /// `c1` on the `v1 v2` side of the last quad, `c2` on the `v3 v4` side.
    pub fn add_quad_color_pair(&mut self, c1: LinearRgba, c2: LinearRgba) {
        self.colors.extend([c1, c1, c2, c2]);
    }

    /// Per-vertex colors for the last quad.
    pub fn add_quad_colors(
        &mut self,
        c1: LinearRgba,
        c2: LinearRgba,
        c3: LinearRgba,
        c4: LinearRgba,
    ) {
        self.colors.extend([c1, c2, c3, c4]);
    }

    /// Hands over the buffers together with freshly computed normals.
    pub fn finish(self) -> HexMeshData {
        debug_assert_eq!(self.vertices.len(), self.colors.len());
        let normals = math::vertex_normals(&self.vertices, &self.triangles);
        HexMeshData {
            vertices: self.vertices,
            triangles: self.triangles,
            colors: self.colors,
            normals,
        }
    }
}

/// Finished buffers of a triangulated chunk. Every index is in range and
/// `vertices`, `colors` and `normals` have the same length.
#[derive(Clone, Debug, Default)]
pub struct HexMeshData {
    /// Vertex positions, three or four per shape.
    pub vertices: Vec<Vec3>,
    /// Triangle list indices into `vertices`.
    pub triangles: Vec<u32>,
    /// Linear vertex colors.
    pub colors: Vec<LinearRgba>,
    /// Averaged vertex normals.
    pub normals: Vec<Vec3>,
}

impl HexMeshData {
    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Converts the buffers into a renderable triangle-list [`Mesh`].
    pub fn into_mesh(self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.vertices.iter().map(|v| v.to_array()).collect();
        let normals: Vec<[f32; 3]> = self.normals.iter().map(|n| n.to_array()).collect();
        let colors: Vec<[f32; 4]> = self
            .colors
            .iter()
            .map(|c| [c.red, c.green, c.blue, c.alpha])
            .collect();

        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
        .with_inserted_indices(Indices::U32(self.triangles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{MetricsSettings, TerrainConfig};

    fn metrics(strength: f32) -> HexMetrics {
        HexMetrics::from_settings(&MetricsSettings {
            cell_perturb_strength: strength,
            ..TerrainConfig::default().metrics
        })
    }

    #[test]
    fn quad_splits_into_two_triangles() {
        let m = metrics(0.0);
        let mut b = HexMeshBuilder::new(&m);
        b.add_quad(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(1.0, 0.0, 1.0));
        b.add_quad_color(LinearRgba::WHITE);
        let data = b.finish();
        assert_eq!(data.triangles, vec![0, 2, 1, 1, 2, 3]);
        assert_eq!(data.triangle_count(), 2);
        assert_eq!(data.colors.len(), 4);
    }

    #[test]
    fn indices_continue_after_earlier_shapes() {
        let m = metrics(0.0);
        let mut b = HexMeshBuilder::new(&m);
        b.add_triangle(Vec3::ZERO, Vec3::Z, Vec3::X);
        b.add_triangle_color(LinearRgba::RED);
        b.add_quad(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ONE);
        b.add_quad_color_pair(LinearRgba::RED, LinearRgba::BLUE);
        let data = b.finish();
        assert_eq!(&data.triangles[3..], &[3, 5, 4, 4, 5, 6]);
        assert_eq!(data.colors[3], LinearRgba::RED);
        assert_eq!(data.colors[4], LinearRgba::RED);
        assert_eq!(data.colors[5], LinearRgba::BLUE);
        assert_eq!(data.colors[6], LinearRgba::BLUE);
    }

    #[test]
    fn flat_triangle_normals_point_up() {
        let m = metrics(0.0);
        let mut b = HexMeshBuilder::new(&m);
        b.add_triangle(Vec3::ZERO, Vec3::Z, Vec3::X);
        b.add_triangle_colors(LinearRgba::RED, LinearRgba::GREEN, LinearRgba::BLUE);
        let data = b.finish();
        for n in &data.normals {
            assert!((*n - Vec3::Y).length() < 1e-5);
        }
    }

    #[test]
    fn unperturbed_triangle_keeps_positions() {
        let m = metrics(4.0);
        let mut b = HexMeshBuilder::new(&m);
        let p = [Vec3::new(1.5, 0.0, 2.5), Vec3::new(3.0, 1.0, 7.0), Vec3::new(8.0, 0.0, 1.0)];
        b.add_triangle_unperturbed(p[0], p[1], p[2]);
        b.add_triangle_color(LinearRgba::WHITE);
        assert_eq!(b.finish().vertices, p.to_vec());
    }

    #[test]
    fn perturbed_triangle_uses_metrics() {
        let m = metrics(4.0);
        let mut b = HexMeshBuilder::new(&m);
        let p = Vec3::new(13.0, 2.0, 21.0);
        b.add_triangle(p, p + Vec3::Z, p + Vec3::X);
        b.add_triangle_color(LinearRgba::WHITE);
        let data = b.finish();
        assert_eq!(data.vertices[0], m.perturb(p));
        assert_eq!(data.vertices[0].y, 2.0);
    }

    #[test]
    fn into_mesh_carries_all_attributes() {
        let m = metrics(0.0);
        let mut b = HexMeshBuilder::new(&m);
        b.add_quad(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::ONE);
        b.add_quad_colors(
            LinearRgba::RED,
            LinearRgba::GREEN,
            LinearRgba::BLUE,
            LinearRgba::WHITE,
        );
        let mesh = b.finish().into_mesh();
        assert_eq!(mesh.count_vertices(), 4);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
        assert!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).is_some());
        assert_eq!(mesh.indices().map(|i| i.len()), Some(6));
    }
}
