//! Cube coordinates of cells and their mapping to offset rows and world space.

use std::fmt;

use bevy::math::{Vec2, Vec3};
use bevy::reflect::Reflect;
use hexx::{Hex, OffsetHexMode};

use super::hex_direction::HexDirection;
use super::hex_metrics::HEX_LAYOUT;

/// Cube coordinates of a cell: `x + y + z == 0`.
///
/// Stored as an axial [`Hex`] where `hex.x` is the cube X and `hex.y` is the
/// cube Z; cube Y is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct HexCoordinates(pub Hex);

impl HexCoordinates {
    /// Builds coordinates from cube X and Z.
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Hex::new(x, z))
    }

    /// Cube X.
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// Cube Y, always `-x - z`.
    pub const fn y(self) -> i32 {
        -self.0.x - self.0.y
    }

    /// Cube Z (the row).
    pub const fn z(self) -> i32 {
        self.0.y
    }

    /// Converts offset (column, row) coordinates, where odd rows are shifted
    /// half a cell to the right.
    pub const fn from_offset_coordinates(x: i32, z: i32) -> Self {
        Self(Hex::from_offset_coordinates(
            [x, z],
            OffsetHexMode::Odd,
            HEX_LAYOUT.orientation,
        ))
    }

    /// Inverse of [`Self::from_offset_coordinates`].
    pub const fn to_offset_coordinates(self) -> (i32, i32) {
        let [x, z] = self
            .0
            .to_offset_coordinates(OffsetHexMode::Odd, HEX_LAYOUT.orientation);
        (x, z)
    }

    /// Coordinates of the adjacent cell in `direction`.
    pub fn neighbor(self, direction: HexDirection) -> Self {
        Self(self.0 + direction.offset())
    }

    /// Center of this cell on the `y = 0` plane.
    pub fn to_position(self) -> Vec3 {
        let p = HEX_LAYOUT.hex_to_world_pos(self.0);
        Vec3::new(p.x, 0.0, p.y)
    }

    /// Cell containing the horizontal part of `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self(HEX_LAYOUT.world_pos_to_hex(Vec2::new(position.x, position.z)))
    }
}

impl fmt::Display for HexCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::hex_metrics::{INNER_RADIUS, OUTER_RADIUS};

    #[test]
    fn cube_components_sum_to_zero() {
        for x in -4..4 {
            for z in -4..4 {
                let c = HexCoordinates::new(x, z);
                assert_eq!(c.x() + c.y() + c.z(), 0);
            }
        }
    }

    #[test]
    fn offset_roundtrip() {
        for z in 0..6 {
            for x in 0..6 {
                let c = HexCoordinates::from_offset_coordinates(x, z);
                assert_eq!(c.to_offset_coordinates(), (x, z));
            }
        }
    }

    #[test]
    fn odd_rows_shift_cube_x() {
        assert_eq!(
            HexCoordinates::from_offset_coordinates(0, 1),
            HexCoordinates::new(0, 1)
        );
        assert_eq!(
            HexCoordinates::from_offset_coordinates(0, 2),
            HexCoordinates::new(-1, 2)
        );
    }

    #[test]
    fn position_roundtrip() {
        for z in 0..6 {
            for x in 0..6 {
                let c = HexCoordinates::from_offset_coordinates(x, z);
                assert_eq!(HexCoordinates::from_position(c.to_position()), c);
            }
        }
    }

    #[test]
    fn position_near_center_resolves_to_cell() {
        let c = HexCoordinates::from_offset_coordinates(2, 3);
        let p = c.to_position() + Vec3::new(INNER_RADIUS * 0.6, 0.0, -OUTER_RADIUS * 0.3);
        assert_eq!(HexCoordinates::from_position(p), c);
    }

    #[test]
    fn neighbor_centers_are_two_inner_radii_apart() {
        let c = HexCoordinates::new(1, 2);
        for d in HexDirection::ALL {
            let dist = c.to_position().distance(c.neighbor(d).to_position());
            assert!((dist - INNER_RADIUS * 2.0).abs() < 1e-4, "{d:?}: {dist}");
        }
    }

    #[test]
    fn display_lists_cube_components() {
        assert_eq!(HexCoordinates::new(1, 2).to_string(), "(1, -3, 2)");
    }
}
