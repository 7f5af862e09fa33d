use crate::{LeafNode, Node};

use glam::{UVec3, Vec3};
use svo_nav_core::{Link, Morton, VolumeBounds};

use std::mem;

/// The generated navigation index: per-layer node sequences from finest
/// (layer 0) to coarsest (the single root), plus the leaf occupancy grids for
/// blocked layer-0 cells.
///
/// Two invariants hold for every generated octree and are load-bearing for
/// the queries below:
/// - within each layer, nodes are sorted strictly ascending by `code`, so
///   code lookups are binary searches and sibling groups are contiguous;
/// - a node exists below the root only where its parent's subtree contains
///   geometry; uniformly free space above leaf resolution is represented by
///   the absence of nodes.
///
/// An octree is immutable once generated and may be read by any number of
/// threads at once.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Octree {
    pub(crate) bounds: VolumeBounds,
    pub(crate) voxel_power: u8,
    pub(crate) layers: Vec<Vec<Node>>,
    pub(crate) leaf_nodes: Vec<LeafNode>,
}

impl Octree {
    #[inline]
    pub fn bounds(&self) -> VolumeBounds {
        self.bounds
    }

    /// The subdivision power P: the finest node layer is 2^P cells per axis.
    #[inline]
    pub fn voxel_power(&self) -> u8 {
        self.voxel_power
    }

    /// Always `voxel_power + 1`.
    #[inline]
    pub fn num_layers(&self) -> u8 {
        self.layers.len() as u8
    }

    #[inline]
    pub fn layer(&self, layer: u8) -> &[Node] {
        &self.layers[layer as usize]
    }

    /// The node addressed by `link`, which must be a valid address in this
    /// octree. Links from a different octree are a contract violation and
    /// panic at worst.
    #[inline]
    pub fn node(&self, link: Link) -> &Node {
        &self.layers[link.layer() as usize][link.node_index() as usize]
    }

    #[inline]
    pub fn leaf(&self, index: u32) -> &LeafNode {
        &self.leaf_nodes[index as usize]
    }

    pub fn node_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_nodes.len()
    }

    /// Memory held by node and leaf storage.
    pub fn size_bytes(&self) -> usize {
        self.node_count() * mem::size_of::<Node>()
            + self.leaf_nodes.len() * mem::size_of::<LeafNode>()
    }

    /// Cells per axis at `layer`.
    #[inline]
    pub fn cells_per_axis(&self, layer: u8) -> u32 {
        1 << (self.voxel_power - layer)
    }

    /// Edge length of one cell at `layer`.
    #[inline]
    pub fn voxel_size(&self, layer: u8) -> f32 {
        self.bounds.edge_length() / self.cells_per_axis(layer) as f32
    }

    /// World-space center of the cell `code` at `layer`.
    pub fn node_position(&self, layer: u8, code: Morton) -> Vec3 {
        let size = self.voxel_size(layer);
        self.bounds.min_corner() + (UVec3::from(code).as_vec3() + 0.5) * size
    }

    /// World-space center of the cell addressed by `link`, descending into
    /// the quarter-size leaf grid for leaf sub-voxel links.
    pub fn link_position(&self, link: Link) -> Vec3 {
        let node = self.node(link);
        let position = self.node_position(link.layer(), node.code);
        if link.layer() == 0 && node.first_child.is_valid() {
            let size = self.voxel_size(0);
            let sub = UVec3::from(Morton(u64::from(link.subnode_index()))).as_vec3();
            position + sub * (size * 0.25) - Vec3::splat(size * 0.375)
        } else {
            position
        }
    }

    /// Index of the materialized node with `code` in `layer`. Layers are
    /// sorted by code, so this is a binary search.
    pub fn index_of_code(&self, layer: u8, code: Morton) -> Option<u32> {
        self.layers[layer as usize]
            .binary_search_by_key(&code, |node| node.code)
            .ok()
            .map(|index| index as u32)
    }

    /// Cell coordinates of `position` at `layer`, clamped into the grid.
    /// Callers check [`VolumeBounds::contains`] first.
    pub fn cell_coords(&self, position: Vec3, layer: u8) -> UVec3 {
        let size = self.voxel_size(layer);
        let max = self.cells_per_axis(layer) - 1;
        let local = (position - self.bounds.min_corner()) / size;
        local.floor().as_uvec3().min(UVec3::splat(max))
    }

    /// Resolves a world position to the deepest materialized node containing
    /// it, or to its open leaf sub-voxel. `None` when the position is outside
    /// the volume or inside blocked geometry, which is the precondition
    /// failure of a path query rather than a panic.
    pub fn find_link(&self, position: Vec3) -> Option<Link> {
        if !self.bounds.contains(position) {
            return None;
        }
        let mut layer = self.num_layers() - 1;
        loop {
            let code = Morton::from(self.cell_coords(position, layer));
            let index = self.index_of_code(layer, code)?;
            let node = &self.layers[layer as usize][index as usize];
            if !node.first_child.is_valid() {
                return Some(Link::new(layer, index, 0));
            }
            if layer == 0 {
                let leaf = self.leaf(node.first_child.node_index());
                if leaf.is_completely_blocked() {
                    return None;
                }
                let size = self.voxel_size(0);
                let leaf_min = self.node_position(0, code) - Vec3::splat(size * 0.5);
                let sub = ((position - leaf_min) / (size * 0.25))
                    .floor()
                    .as_uvec3()
                    .min(UVec3::splat(3));
                let voxel = Morton::from(sub).0 as u8;
                if leaf.is_blocked_at(voxel) {
                    return None;
                }
                return Some(Link::new(0, index, voxel));
            }
            layer -= 1;
        }
    }

    /// Bounds-checks every link and the per-layer code ordering. Run on every
    /// load, so corrupt persisted data surfaces as a typed failure here
    /// instead of as out-of-range indexing during queries.
    pub fn validate(&self) -> Result<(), ValidateError> {
        let expected = self.voxel_power as usize + 1;
        if self.layers.len() != expected {
            return Err(ValidateError::LayerCount {
                power: self.voxel_power,
                expected,
                found: self.layers.len(),
            });
        }
        for (layer, nodes) in self.layers.iter().enumerate() {
            for (index, pair) in nodes.windows(2).enumerate() {
                if pair[0].code >= pair[1].code {
                    return Err(ValidateError::UnsortedLayer {
                        layer: layer as u8,
                        index: index + 1,
                    });
                }
            }
            for (index, node) in nodes.iter().enumerate() {
                self.check_link(node.parent)?;
                for &neighbor in &node.neighbors {
                    self.check_link(neighbor)?;
                }
                if !node.first_child.is_valid() {
                    continue;
                }
                if layer == 0 {
                    if node.first_child.node_index() as usize >= self.leaf_nodes.len() {
                        return Err(ValidateError::DanglingLeaf {
                            index,
                            link: node.first_child,
                        });
                    }
                } else {
                    // Children come in contiguous groups of eight.
                    let first = node.first_child.node_index() as usize;
                    if node.first_child.layer() as usize != layer - 1
                        || first + 8 > self.layers[layer - 1].len()
                    {
                        return Err(ValidateError::DanglingLink {
                            link: node.first_child,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn check_link(&self, link: Link) -> Result<(), ValidateError> {
        if !link.is_valid() {
            return Ok(());
        }
        let layer = link.layer() as usize;
        if layer >= self.layers.len() || link.node_index() as usize >= self.layers[layer].len() {
            return Err(ValidateError::DanglingLink { link });
        }
        Ok(())
    }
}

/// Structural inconsistencies detected by [`Octree::validate`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidateError {
    #[error("expected {expected} layers for subdivision power {power}, found {found}")]
    LayerCount {
        power: u8,
        expected: usize,
        found: usize,
    },
    #[error("layer {layer} codes are not strictly ascending at index {index}")]
    UnsortedLayer { layer: u8, index: usize },
    #[error("link {link} points outside the octree")]
    DanglingLink { link: Link },
    #[error("layer-0 node {index} leaf link {link} points outside the leaf array")]
    DanglingLeaf { index: usize, link: Link },
}
