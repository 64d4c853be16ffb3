//! Hex geometry constants, terrace interpolation, edge classification and
//! noise-driven vertex perturbation.

use bevy::color::{LinearRgba, Mix};
use bevy::math::{Vec3, Vec4};
use bevy::reflect::Reflect;
use hexx::HexLayout;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::MetricsSettings;
use super::hex_direction::HexDirection;
use crate::math;

/// Ratio between the inner (edge) and outer (corner) radius: `√3 / 2`.
pub const OUTER_TO_INNER: f32 = 0.866_025_4;
/// Inverse of [`OUTER_TO_INNER`].
pub const INNER_TO_OUTER: f32 = 1.0 / OUTER_TO_INNER;

/// Distance from a cell center to its corners.
pub const OUTER_RADIUS: f32 = 10.0;
/// Distance from a cell center to the middle of its edges.
pub const INNER_RADIUS: f32 = OUTER_RADIUS * OUTER_TO_INNER;

/// Pointy-topped layout of cell centers. Its 2D `y` axis is world `z`.
pub const HEX_LAYOUT: HexLayout = HexLayout::pointy().with_hex_size(OUTER_RADIUS);

/// Fraction of the hex covered by the cell's own flat region.
pub const SOLID_FACTOR: f32 = 0.8;
/// Fraction of the hex left for connections to neighbors.
pub const BLEND_FACTOR: f32 = 1.0 - SOLID_FACTOR;

/// World height of one elevation level.
pub const ELEVATION_STEP: f32 = 3.0;

/// Flat terraces per sloped connection.
pub const TERRACES_PER_SLOPE: usize = 2;
/// Interpolation steps across a sloped connection.
pub const TERRACE_STEPS: usize = TERRACES_PER_SLOPE * 2 + 1;
/// Horizontal progress per terrace step.
pub const HORIZONTAL_TERRACE_STEP_SIZE: f32 = 1.0 / TERRACE_STEPS as f32;
/// Vertical progress per rising terrace step.
pub const VERTICAL_TERRACE_STEP_SIZE: f32 = 1.0 / (TERRACES_PER_SLOPE + 1) as f32;

/// Stream beds sit this many elevation levels below the cell surface.
pub const STREAM_BED_ELEVATION_OFFSET: f32 = -1.0;

/// Outer interpolation step of the narrowed edge through a river channel.
pub const RIVER_CHANNEL_OUTER_STEP: f32 = 1.0 / 6.0;

const CORNERS: [Vec3; 7] = [
    Vec3::new(0.0, 0.0, OUTER_RADIUS),
    Vec3::new(INNER_RADIUS, 0.0, 0.5 * OUTER_RADIUS),
    Vec3::new(INNER_RADIUS, 0.0, -0.5 * OUTER_RADIUS),
    Vec3::new(0.0, 0.0, -OUTER_RADIUS),
    Vec3::new(-INNER_RADIUS, 0.0, -0.5 * OUTER_RADIUS),
    Vec3::new(-INNER_RADIUS, 0.0, 0.5 * OUTER_RADIUS),
    Vec3::new(0.0, 0.0, OUTER_RADIUS),
];

/// Relationship between the elevations of two adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum HexEdgeType {
    /// Same elevation.
    Flat,
    /// One level apart: bridged with terraces.
    Slope,
    /// Two or more levels apart: bridged with a straight wall.
    Cliff,
}

/// Classifies the connection between cells at `elevation1` and `elevation2`.
pub fn edge_type(elevation1: i32, elevation2: i32) -> HexEdgeType {
    match (elevation2 - elevation1).abs() {
        0 => HexEdgeType::Flat,
        1 => HexEdgeType::Slope,
        _ => HexEdgeType::Cliff,
    }
}

/// Outer corner counter-clockwise of the edge in `direction`.
pub fn first_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index()]
}

/// Outer corner clockwise of the edge in `direction`.
pub fn second_corner(direction: HexDirection) -> Vec3 {
    CORNERS[direction.index() + 1]
}

/// [`first_corner`] pulled in to the solid region.
pub fn first_solid_corner(direction: HexDirection) -> Vec3 {
    first_corner(direction) * SOLID_FACTOR
}

/// [`second_corner`] pulled in to the solid region.
pub fn second_solid_corner(direction: HexDirection) -> Vec3 {
    second_corner(direction) * SOLID_FACTOR
}

/// Middle of the solid edge in `direction`, relative to the cell center.
pub fn solid_edge_middle(direction: HexDirection) -> Vec3 {
    (first_corner(direction) + second_corner(direction)) * (0.5 * SOLID_FACTOR)
}

/// Offset from a cell's solid edge to the facing solid edge of the neighbor
/// in `direction`, ignoring elevation.
pub fn bridge(direction: HexDirection) -> Vec3 {
    (first_corner(direction) + second_corner(direction)) * BLEND_FACTOR
}

/// Position `step` of [`TERRACE_STEPS`] along a terraced slope from `a` to `b`.
///
/// Horizontal progress is linear; height only rises on odd steps, so every
/// rise is followed by a flat run.
pub fn terrace_lerp(a: Vec3, b: Vec3, step: usize) -> Vec3 {
    let h = step as f32 * HORIZONTAL_TERRACE_STEP_SIZE;
    let v = step.div_ceil(2) as f32 * VERTICAL_TERRACE_STEP_SIZE;
    Vec3::new(
        a.x + (b.x - a.x) * h,
        a.y + (b.y - a.y) * v,
        a.z + (b.z - a.z) * h,
    )
}

/// Color blend matching [`terrace_lerp`]'s horizontal progress.
pub fn terrace_lerp_color(a: LinearRgba, b: LinearRgba, step: usize) -> LinearRgba {
    a.mix(&b, step as f32 * HORIZONTAL_TERRACE_STEP_SIZE)
}

/// Noise-backed metrics shared by the cell store and the triangulator.
///
/// Holds four independent fractal noise channels that stand in for a tiling
/// RGBA noise texture. Sampling is keyed on the horizontal position only.
pub struct HexMetrics {
    channels: [Fbm<Perlin>; 4],
    noise_scale: f64,
    cell_perturb_strength: f32,
    elevation_perturb_strength: f32,
}

impl HexMetrics {
    /// Builds the noise channels from metrics settings.
    pub fn from_settings(s: &MetricsSettings) -> Self {
        let channels = std::array::from_fn(|i| {
            Fbm::<Perlin>::new(s.noise_seed.wrapping_add(i as u32)).set_octaves(s.noise_octaves)
        });
        Self {
            channels,
            noise_scale: s.noise_scale,
            cell_perturb_strength: s.cell_perturb_strength,
            elevation_perturb_strength: s.elevation_perturb_strength,
        }
    }

    /// Four noise channels in `[0, 1]` at the horizontal part of `position`.
    pub fn sample_noise(&self, position: Vec3) -> Vec4 {
        let p = [
            position.x as f64 * self.noise_scale,
            position.z as f64 * self.noise_scale,
        ];
        let [x, y, z, w] = self
            .channels
            .each_ref()
            .map(|c| math::map_noise_to_range(c.get(p), 0.0, 1.0).clamp(0.0, 1.0));
        Vec4::new(x, y, z, w)
    }

    /// Jitters X and Z of `position`; Y is left alone.
    pub fn perturb(&self, position: Vec3) -> Vec3 {
        let sample = self.sample_noise(position);
        Vec3::new(
            position.x + (sample.x * 2.0 - 1.0) * self.cell_perturb_strength,
            position.y,
            position.z + (sample.z * 2.0 - 1.0) * self.cell_perturb_strength,
        )
    }

    /// Vertical jitter applied to a cell's center when its elevation is set.
    pub fn elevation_perturbation(&self, position: Vec3) -> f32 {
        (self.sample_noise(position).y * 2.0 - 1.0) * self.elevation_perturb_strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainConfig;
    use crate::terrain::hex_coordinates::HexCoordinates;

    fn metrics(strength: f32) -> HexMetrics {
        HexMetrics::from_settings(&MetricsSettings {
            cell_perturb_strength: strength,
            ..TerrainConfig::default().metrics
        })
    }

    // ── edge_type ───────────────────────────────────────────────────

    #[test]
    fn edge_type_classification() {
        assert_eq!(edge_type(2, 2), HexEdgeType::Flat);
        assert_eq!(edge_type(2, 3), HexEdgeType::Slope);
        assert_eq!(edge_type(3, 2), HexEdgeType::Slope);
        assert_eq!(edge_type(0, 2), HexEdgeType::Cliff);
        assert_eq!(edge_type(5, -1), HexEdgeType::Cliff);
    }

    #[test]
    fn edge_type_is_symmetric() {
        for a in -3..6 {
            for b in -3..6 {
                assert_eq!(edge_type(a, b), edge_type(b, a), "{a} vs {b}");
            }
        }
    }

    // ── corners & bridges ───────────────────────────────────────────

    #[test]
    fn corners_lie_on_outer_radius() {
        for d in HexDirection::ALL {
            assert!((first_corner(d).length() - OUTER_RADIUS).abs() < 1e-4);
            assert!((second_corner(d).length() - OUTER_RADIUS).abs() < 1e-4);
            assert!((first_solid_corner(d).length() - OUTER_RADIUS * SOLID_FACTOR).abs() < 1e-4);
        }
    }

    #[test]
    fn second_corner_is_next_first_corner() {
        for d in HexDirection::ALL {
            assert!((second_corner(d) - first_corner(d.next())).length() < 1e-5);
        }
    }

    #[test]
    fn bridge_reaches_neighbor_solid_edge() {
        let center = Vec3::ZERO;
        for d in HexDirection::ALL {
            let neighbor = HexCoordinates::new(0, 0).neighbor(d).to_position();
            let near = center + first_solid_corner(d) + bridge(d);
            let far = neighbor + second_solid_corner(d.opposite());
            assert!((near - far).length() < 1e-4, "{d:?}: {near} vs {far}");
        }
    }

    #[test]
    fn solid_edge_middle_is_average_of_solid_corners() {
        for d in HexDirection::ALL {
            let mid = (first_solid_corner(d) + second_solid_corner(d)) * 0.5;
            assert!((solid_edge_middle(d) - mid).length() < 1e-5);
        }
    }

    // ── terrace_lerp ────────────────────────────────────────────────

    #[test]
    fn terrace_lerp_endpoints() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 3.0, -5.0);
        assert!((terrace_lerp(a, b, 0) - a).length() < 1e-5);
        assert!((terrace_lerp(a, b, TERRACE_STEPS) - b).length() < 1e-5);
    }

    #[test]
    fn terrace_lerp_alternates_rise_and_run() {
        let a = Vec3::ZERO;
        let b = Vec3::new(5.0, 3.0, 0.0);
        let heights: Vec<f32> = (0..=TERRACE_STEPS)
            .map(|i| terrace_lerp(a, b, i).y)
            .collect();
        for (i, w) in heights.windows(2).enumerate() {
            let step = i + 1;
            if step % 2 == 1 {
                assert!(w[1] > w[0], "step {step} should rise");
            } else {
                assert!((w[1] - w[0]).abs() < 1e-6, "step {step} should run flat");
            }
        }
    }

    #[test]
    fn terrace_lerp_color_tracks_horizontal_progress() {
        let c = terrace_lerp_color(LinearRgba::BLACK, LinearRgba::WHITE, 2);
        assert!((c.red - 2.0 * HORIZONTAL_TERRACE_STEP_SIZE).abs() < 1e-5);
    }

    // ── perturbation ────────────────────────────────────────────────

    #[test]
    fn perturb_leaves_height_untouched() {
        let m = metrics(4.0);
        let p = Vec3::new(12.3, 7.5, -40.0);
        assert_eq!(m.perturb(p).y, 7.5);
    }

    #[test]
    fn perturb_is_bounded_and_deterministic() {
        let m = metrics(4.0);
        for i in 0..50 {
            let p = Vec3::new(i as f32 * 3.7, 0.0, i as f32 * -2.1);
            let q = m.perturb(p);
            assert_eq!(q, m.perturb(p));
            assert!((q.x - p.x).abs() <= 4.0 + 1e-4);
            assert!((q.z - p.z).abs() <= 4.0 + 1e-4);
        }
    }

    #[test]
    fn zero_strength_perturb_is_identity() {
        let m = metrics(0.0);
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(m.perturb(p), p);
    }

    #[test]
    fn noise_samples_stay_in_unit_range() {
        let m = metrics(4.0);
        for i in 0..100 {
            let s = m.sample_noise(Vec3::new(i as f32 * 13.1, 0.0, i as f32 * 7.9));
            for c in s.to_array() {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }
}
