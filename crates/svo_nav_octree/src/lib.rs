//! A sparse, multi-resolution occupancy index over a bounded cubic region,
//! and the queries 3D navigation needs from it.
//!
//! The octree only subdivides where an occupancy oracle reports geometry, so
//! memory scales with obstacle surface area rather than volume. Nodes live in
//! per-layer sequences sorted by Morton code; the finest layer additionally
//! carries 4×4×4 occupancy bitmasks for cells that contain geometry. Every
//! node stores precomputed links to its six face neighbors, which may live at
//! a coarser layer than the node itself.
//!
//! Build once with [`generate`], then share the immutable [`Octree`] across
//! any number of concurrent readers. Regeneration is the only supported
//! mutation, and must be serialized against in-flight queries by the caller.

pub mod builder;
pub mod node;
pub mod octree;

mod neighbors;

#[cfg(feature = "serialization")]
pub mod io;

pub use builder::{
    generate, generate_with_observer, BuildObserver, BuildSettings, OccupancyOracle,
    MAX_VOXEL_POWER,
};
pub use node::{LeafNode, Node};
pub use octree::{Octree, ValidateError};

#[cfg(feature = "serialization")]
pub use io::{PersistError, FORMAT_VERSION};

pub mod prelude {
    pub use super::{generate, BuildSettings, LeafNode, Node, OccupancyOracle, Octree};
}
