#![warn(missing_docs)]
//! Hex map terrain: a chunked hexagonal cell grid with elevation, colors and
//! rivers, triangulated into perturbed, terraced, vertex-colored meshes.

pub mod math;
pub mod terrain;
