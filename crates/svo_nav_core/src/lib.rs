//! Spatial addressing primitives for sparse voxel octree navigation:
//! - `Morton`: a 3-way bit-interleaved cell coordinate, the position key for
//!   every octree node
//! - `Link`: a node address packed into a single `u32`
//! - `Face`: the six axis directions with their child-selection tables
//! - `VolumeBounds`: the cubic world region an octree covers

pub mod bounds;
pub mod face;
pub mod link;
pub mod morton;

pub use bounds::VolumeBounds;
pub use face::Face;
pub use link::Link;
pub use morton::Morton;

pub use glam;

pub mod prelude {
    pub use super::{Face, Link, Morton, VolumeBounds};
}
