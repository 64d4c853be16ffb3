//! Five points along one cell edge, shared by fans, strips and river channels.

use bevy::math::Vec3;

use super::hex_metrics::{self, RIVER_CHANNEL_OUTER_STEP};

/// Five points spanning one hex edge, shared as the seam between a cell's
/// interior and whatever connects to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeVertices {
    /// First corner.
    pub v1: Vec3,
    /// Between the first corner and the middle.
    pub v2: Vec3,
    /// Middle of the edge; dropped to the stream bed where a river crosses.
    pub v3: Vec3,
    /// Between the middle and the second corner.
    pub v4: Vec3,
    /// Second corner.
    pub v5: Vec3,
}

impl EdgeVertices {
    /// Edge subdivided into equal quarters.
    pub fn new(corner1: Vec3, corner2: Vec3) -> Self {
        Self::with_outer_step(corner1, corner2, 0.25)
    }

    /// Edge whose second and fourth points sit `outer_step` from the corners.
    pub fn with_outer_step(corner1: Vec3, corner2: Vec3, outer_step: f32) -> Self {
        Self {
            v1: corner1,
            v2: corner1.lerp(corner2, outer_step),
            v3: corner1.lerp(corner2, 0.5),
            v4: corner1.lerp(corner2, 1.0 - outer_step),
            v5: corner2,
        }
    }

    /// Edge used for the seam, narrowed around the middle when a river
    /// channel runs through it.
    pub fn build(corner1: Vec3, corner2: Vec3, river_channel: bool) -> Self {
        if river_channel {
            Self::with_outer_step(corner1, corner2, RIVER_CHANNEL_OUTER_STEP)
        } else {
            Self::new(corner1, corner2)
        }
    }

    /// Point-wise [`hex_metrics::terrace_lerp`] between two edges.
    pub fn terrace_lerp(a: &Self, b: &Self, step: usize) -> Self {
        Self {
            v1: hex_metrics::terrace_lerp(a.v1, b.v1, step),
            v2: hex_metrics::terrace_lerp(a.v2, b.v2, step),
            v3: hex_metrics::terrace_lerp(a.v3, b.v3, step),
            v4: hex_metrics::terrace_lerp(a.v4, b.v4, step),
            v5: hex_metrics::terrace_lerp(a.v5, b.v5, step),
        }
    }

    /// The five points in order.
    pub fn points(&self) -> [Vec3; 5] {
        [self.v1, self.v2, self.v3, self.v4, self.v5]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::hex_metrics::TERRACE_STEPS;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn quarters_between_corners() {
        let e = EdgeVertices::new(Vec3::ZERO, Vec3::new(8.0, 0.0, 0.0));
        let xs: Vec<f32> = e.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn river_channel_edge_is_narrower() {
        let a = Vec3::ZERO;
        let b = Vec3::new(6.0, 0.0, 0.0);
        let e = EdgeVertices::build(a, b, true);
        assert!(close(e.v2, Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(e.v3, Vec3::new(3.0, 0.0, 0.0)));
        assert!(close(e.v4, Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(EdgeVertices::build(a, b, false), EdgeVertices::new(a, b));
    }

    #[test]
    fn terrace_lerp_hits_both_ends() {
        let a = EdgeVertices::new(Vec3::ZERO, Vec3::X * 4.0);
        let b = EdgeVertices::new(Vec3::new(0.0, 3.0, 2.0), Vec3::new(4.0, 3.0, 2.0));
        let start = EdgeVertices::terrace_lerp(&a, &b, 0);
        let end = EdgeVertices::terrace_lerp(&a, &b, TERRACE_STEPS);
        for (p, q) in start.points().iter().zip(a.points()) {
            assert!(close(*p, q));
        }
        for (p, q) in end.points().iter().zip(b.points()) {
            assert!(close(*p, q));
        }
    }

    #[test]
    fn terrace_steps_never_descend() {
        let a = EdgeVertices::new(Vec3::ZERO, Vec3::X * 4.0);
        let b = EdgeVertices::new(Vec3::new(0.0, 3.0, 2.0), Vec3::new(4.0, 3.0, 2.0));
        let heights: Vec<f32> = (0..=TERRACE_STEPS)
            .map(|i| EdgeVertices::terrace_lerp(&a, &b, i).v3.y)
            .collect();
        assert!(heights.windows(2).all(|w| w[1] >= w[0]));
        assert!(heights.last() > heights.first());
    }
}
