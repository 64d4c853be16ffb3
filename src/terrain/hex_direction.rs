//! The six edge directions of a pointy-topped hex, NE first, clockwise.

use bevy::reflect::Reflect;
use hexx::Hex;

/// One of the six edge directions of a pointy-top hex, in clockwise order
/// starting at north-east.
///
/// Ordering is meaningful: the triangulation only builds connections for
/// directions up to [`HexDirection::SouthEast`] and corners up to
/// [`HexDirection::East`], so each shared edge and corner is emitted once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub enum HexDirection {
    /// Upper right edge.
    NorthEast,
    /// Right edge.
    East,
    /// Lower right edge.
    SouthEast,
    /// Lower left edge.
    SouthWest,
    /// Left edge.
    West,
    /// Upper left edge.
    NorthWest,
}

impl HexDirection {
    /// All six directions in iteration order.
    pub const ALL: [Self; 6] = [
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// Position of this direction in [`Self::ALL`] (0..5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction at `index`, wrapping modulo six.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    /// The direction pointing the other way across the hex.
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// One step counter-clockwise.
    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    /// One step clockwise.
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Two steps counter-clockwise.
    pub const fn previous2(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    /// Two steps clockwise.
    pub const fn next2(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Axial offset `(dx, dz)` of the neighbor in this direction.
    pub const fn offset(self) -> Hex {
        match self {
            Self::NorthEast => Hex::new(0, 1),
            Self::East => Hex::new(1, 0),
            Self::SouthEast => Hex::new(1, -1),
            Self::SouthWest => Hex::new(0, -1),
            Self::West => Hex::new(-1, 0),
            Self::NorthWest => Hex::new(-1, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for d in HexDirection::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
        }
    }

    #[test]
    fn opposite_pairs() {
        assert_eq!(HexDirection::NorthEast.opposite(), HexDirection::SouthWest);
        assert_eq!(HexDirection::East.opposite(), HexDirection::West);
        assert_eq!(HexDirection::SouthEast.opposite(), HexDirection::NorthWest);
    }

    #[test]
    fn next_and_previous_wrap() {
        assert_eq!(HexDirection::NorthWest.next(), HexDirection::NorthEast);
        assert_eq!(HexDirection::NorthEast.previous(), HexDirection::NorthWest);
        for d in HexDirection::ALL {
            assert_eq!(d.next().previous(), d);
            assert_eq!(d.next2(), d.next().next());
            assert_eq!(d.previous2(), d.previous().previous());
        }
    }

    #[test]
    fn double_steps_wrap() {
        assert_eq!(HexDirection::West.next2(), HexDirection::NorthEast);
        assert_eq!(HexDirection::East.previous2(), HexDirection::West);
    }

    #[test]
    fn index_matches_all_order() {
        for (i, d) in HexDirection::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
            assert_eq!(HexDirection::from_index(i), *d);
        }
    }

    #[test]
    fn opposite_offsets_cancel() {
        for d in HexDirection::ALL {
            assert_eq!(d.offset() + d.opposite().offset(), Hex::ZERO);
        }
    }
}
