//! Sparse voxel octree navigation: a multi-resolution occupancy index over a
//! bounded 3D region, and pathfinding over it for agents that are free to
//! move vertically: fliers and swimmers rather than walkers.
//!
//! The index only subdivides where an externally supplied occupancy oracle
//! reports geometry, so memory scales with obstacle surface area rather than
//! volume. Pathfinding runs a weighted A* over the index's cross-resolution
//! neighbor graph: one step may leave a tiny leaf sub-voxel and enter a cell
//! covering an eighth of the world.
//!
//! This library is organized into several crates:
//! - **core**: Morton codes, packed node links, face directions, volume bounds
//! - **octree**: the sparse layered octree, its generator, neighbor queries,
//!   validation, and persistence
//! - **search**: the A* pathfinder with blocking and async query surfaces
//!
//! ```
//! use svo_nav::prelude::*;
//! use svo_nav::core::glam::Vec3;
//!
//! // Geometry is a black box to the builder: any `fn(center, half) -> bool`.
//! let floor = |center: Vec3, half: f32| center.y - half <= -6.0;
//!
//! let octree = generate(
//!     VolumeBounds::new(Vec3::ZERO, 8.0),
//!     &BuildSettings::default(),
//!     &floor,
//! );
//! let path = find_path(
//!     &octree,
//!     &PathFinderSettings::default(),
//!     Vec3::new(-5.0, 0.0, -5.0),
//!     Vec3::new(5.0, 2.0, 5.0),
//! )
//! .unwrap();
//! assert_eq!(path.positions().next(), Some(Vec3::new(-5.0, 0.0, -5.0)));
//! ```

pub use svo_nav_core as core;
pub use svo_nav_octree as octree;

#[cfg(feature = "search")]
pub use svo_nav_search as search;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::octree::prelude::*;

    #[cfg(feature = "search")]
    pub use super::search::prelude::*;
}
