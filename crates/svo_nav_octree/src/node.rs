use svo_nav_core::{Link, Morton};

/// One entry in an octree layer.
///
/// An invalid `first_child` marks a leaf of the traversal tree: the node's
/// entire volume is free and directly pathable at this layer's resolution.
/// At layer 0 a valid `first_child` indexes the octree's leaf-occupancy array
/// instead of a finer node layer.
///
/// Fields are declared in persisted order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Position key within the layer; layers stay sorted by this.
    pub code: Morton,
    pub parent: Link,
    pub first_child: Link,
    /// One per face direction, in [`Face::ALL`](svo_nav_core::Face::ALL)
    /// storage order. A valid entry may address a coarser layer when no
    /// same-layer neighbor is materialized.
    pub neighbors: [Link; 6],
}

impl Node {
    pub fn new(code: Morton) -> Self {
        Self {
            code,
            parent: Link::INVALID,
            first_child: Link::INVALID,
            neighbors: [Link::INVALID; 6],
        }
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_valid()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(Morton::ZERO)
    }
}

/// Occupancy of a layer-0 node's volume subdivided into a 4×4×4 grid of
/// sub-voxels, each addressed by its own 6-bit Morton code. A set bit means
/// blocked.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeafNode(pub u64);

impl LeafNode {
    pub const EMPTY: Self = LeafNode(0);

    #[inline]
    pub fn is_blocked_at(&self, voxel: u8) -> bool {
        debug_assert!(voxel < 64);
        self.0 & (1 << voxel) != 0
    }

    #[inline]
    pub fn set_blocked(&mut self, voxel: u8) {
        debug_assert!(voxel < 64);
        self.0 |= 1 << voxel;
    }

    /// All 64 sub-voxels blocked. Such leaves are never linked to or returned
    /// from neighbor queries.
    #[inline]
    pub fn is_completely_blocked(&self) -> bool {
        self.0 == u64::MAX
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}
