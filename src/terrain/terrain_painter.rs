//! Deterministic startup painter: noise heights, banded colors, and rivers
//! traced downhill from the highest cells.

use bevy::color::Color;
use bevy::log::debug;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::TerrainSettings;
use super::hex_cell::CellId;
use super::hex_direction::HexDirection;
use super::hex_grid::HexGrid;
use crate::math;

/// Paints elevation, color and rivers onto every cell of `grid`.
///
/// All edits go through the grid's setters, so perturbation, river
/// validation and dirty tracking behave as for any other edit.
pub fn paint_terrain(grid: &mut HexGrid, t: &TerrainSettings) {
    let height = Fbm::<Perlin>::new(t.height_noise_seed).set_octaves(t.height_noise_octaves);
    let ids: Vec<CellId> = grid.cells().map(|(id, _)| id).collect();

    for &id in &ids {
        let p = grid.cell(id).position();
        let n = height.get([
            p.x as f64 * t.height_noise_scale,
            p.z as f64 * t.height_noise_scale,
        ]);
        let elevation = math::map_noise_to_range(n, 0.0, t.max_elevation as f32)
            .clamp(0.0, t.max_elevation as f32)
            .round() as i32;
        grid.set_elevation(id, elevation);
        if let Some(color) = palette_color(&t.palette, elevation, t.max_elevation) {
            grid.set_color(id, color);
        }
    }

    let mut sources = ids;
    sources.sort_by_key(|&id| std::cmp::Reverse(grid.cell(id).elevation()));

    let mut rivers = 0;
    for source in sources {
        if rivers == t.river_count {
            break;
        }
        if grid.cell(source).has_river() {
            continue;
        }
        let length = trace_river(grid, source, t.max_river_length);
        if length > 0 {
            debug!("river from {} runs {length} cells", grid.cell(source).coordinates);
            rivers += 1;
        }
    }
}

/// Color of the band `elevation` falls in, or `None` for an empty palette.
pub fn palette_color(palette: &[Color], elevation: i32, max_elevation: i32) -> Option<Color> {
    let last = palette.len().checked_sub(1)?;
    let levels = max_elevation.max(0) as usize + 1;
    let band = elevation.max(0) as usize * palette.len() / levels;
    palette.get(band.min(last)).copied()
}

/// Walks downhill from `source`, always into the lowest dry neighbor that is
/// not higher than the current cell. Returns the number of steps taken.
fn trace_river(grid: &mut HexGrid, source: CellId, max_length: usize) -> usize {
    let mut current = source;
    let mut length = 0;
    while length < max_length {
        let cell = grid.cell(current);
        let next = HexDirection::ALL
            .into_iter()
            .filter_map(|d| {
                let n = cell.neighbor(d)?;
                let neighbor = grid.cell(n);
                (neighbor.elevation() <= cell.elevation() && !neighbor.has_river())
                    .then_some((d, n, neighbor.elevation()))
            })
            .min_by_key(|&(_, _, elevation)| elevation);
        let Some((direction, n, _)) = next else {
            break;
        };
        grid.set_outgoing_river(current, direction);
        current = n;
        length += 1;
    }
    length
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainConfig;
    use crate::terrain::hex_metrics::HexMetrics;

    fn painted(t: &TerrainSettings) -> HexGrid {
        let cfg = TerrainConfig::default();
        let mut grid = HexGrid::new(&cfg.grid, HexMetrics::from_settings(&cfg.metrics));
        paint_terrain(&mut grid, t);
        grid
    }

    // ── palette_color ──────────────────────────────────────────────

    #[test]
    fn palette_bands_span_elevation_range() {
        let palette = [Color::BLACK, Color::WHITE];
        assert_eq!(palette_color(&palette, 0, 3), Some(Color::BLACK));
        assert_eq!(palette_color(&palette, 1, 3), Some(Color::BLACK));
        assert_eq!(palette_color(&palette, 2, 3), Some(Color::WHITE));
        assert_eq!(palette_color(&palette, 3, 3), Some(Color::WHITE));
        assert_eq!(palette_color(&palette, 9, 3), Some(Color::WHITE));
    }

    #[test]
    fn empty_palette_has_no_color() {
        assert_eq!(palette_color(&[], 2, 4), None);
    }

    // ── paint_terrain ──────────────────────────────────────────────

    #[test]
    fn elevations_stay_in_range() {
        let t = TerrainConfig::default().terrain;
        let grid = painted(&t);
        for (_, cell) in grid.cells() {
            assert!((0..=t.max_elevation).contains(&cell.elevation()));
            assert!(t.palette.contains(&cell.color()));
        }
    }

    #[test]
    fn painting_is_deterministic() {
        let t = TerrainConfig::default().terrain;
        let a = painted(&t);
        let b = painted(&t);
        for ((_, x), (_, y)) in a.cells().zip(b.cells()) {
            assert_eq!(x.elevation(), y.elevation());
            assert_eq!(x.outgoing_river(), y.outgoing_river());
        }
    }

    #[test]
    fn rivers_flow_downhill_and_are_mirrored() {
        let t = TerrainConfig::default().terrain;
        let grid = painted(&t);
        let mut flowing = 0;
        for (id, cell) in grid.cells() {
            let Some(d) = cell.outgoing_river() else {
                continue;
            };
            flowing += 1;
            let n = grid.neighbor(id, d).unwrap();
            assert!(grid.cell(n).elevation() <= cell.elevation());
            assert_eq!(grid.cell(n).incoming_river(), Some(d.opposite()));
        }
        assert!(flowing > 0);
    }

    #[test]
    fn river_count_limits_sources() {
        let t = TerrainSettings {
            river_count: 2,
            ..TerrainConfig::default().terrain
        };
        let grid = painted(&t);
        let sources = grid
            .cells()
            .filter(|(_, c)| c.has_outgoing_river() && !c.has_incoming_river())
            .count();
        assert!((1..=2).contains(&sources));
    }

    #[test]
    fn river_length_is_capped() {
        let t = TerrainSettings {
            river_count: 1,
            max_river_length: 3,
            ..TerrainConfig::default().terrain
        };
        let grid = painted(&t);
        let flowing = grid.cells().filter(|(_, c)| c.has_outgoing_river()).count();
        assert!((1..=3).contains(&flowing));
    }

    #[test]
    fn no_rivers_when_disabled() {
        let t = TerrainSettings {
            river_count: 0,
            ..TerrainConfig::default().terrain
        };
        assert!(painted(&t).cells().all(|(_, c)| !c.has_river()));
    }
}
