//! Resolution-aware neighbor queries over a generated octree.
//!
//! A node's precomputed face links point at the same layer or coarser. The
//! queries here resolve each link down to the resolution the traversal
//! actually needs: a subdivided neighbor is replaced by the children on the
//! shared face, recursively, until only uniformly free nodes and open leaf
//! sub-voxels remain. Results may therefore mix resolutions; pathfinding
//! handles that asymmetry rather than having it hidden here.

use crate::Octree;

use glam::{IVec3, UVec3};
use svo_nav_core::{Face, Link, Morton};

impl Octree {
    /// Appends the traversable neighbors of the node at `link` to `out`.
    ///
    /// For leaf sub-voxel links use [`Octree::leaf_neighbors`]; this query
    /// ignores the subnode index.
    pub fn neighbors(&self, link: Link, out: &mut Vec<Link>) {
        let node = self.node(link);
        let mut working = Vec::new();
        for face in Face::ALL {
            let neighbor_link = node.neighbors[face.index()];
            if !neighbor_link.is_valid() {
                continue;
            }
            if !self.node(neighbor_link).has_children() {
                // Uniformly free at its own resolution.
                out.push(neighbor_link);
                continue;
            }

            // Subdivided neighbor: descend through the children on the shared
            // face until every cell is free at its own resolution.
            working.push(neighbor_link);
            while let Some(current_link) = working.pop() {
                let current = self.node(current_link);
                if !current.has_children() {
                    out.push(current_link);
                    continue;
                }
                if current_link.layer() > 0 {
                    for &octant in face.facing_child_octants() {
                        let child = Link::new(
                            current.first_child.layer(),
                            current.first_child.node_index() + u32::from(octant),
                            0,
                        );
                        if self.node(child).has_children() {
                            working.push(child);
                        } else {
                            out.push(child);
                        }
                    }
                } else {
                    // Leaf granularity: the open sub-voxels on the shared
                    // face. A completely blocked leaf contributes nothing.
                    let leaf = self.leaf(current.first_child.node_index());
                    for &voxel in face.facing_leaf_voxels() {
                        if !leaf.is_blocked_at(voxel) {
                            out.push(Link::new(0, current_link.node_index(), voxel));
                        }
                    }
                }
            }
        }
    }

    /// Appends the neighbors of the leaf sub-voxel addressed by `link`.
    ///
    /// Steps that stay inside the 4×4×4 grid resolve against the local
    /// occupancy mask. Steps that cross the grid boundary follow the owning
    /// node's precomputed layer-0 face link: a coarser or unsubdivided
    /// neighbor is returned whole, a completely blocked leaf is excluded, and
    /// otherwise the crossing coordinate wraps to the opposite side of the
    /// adjacent grid and its bit decides.
    pub fn leaf_neighbors(&self, link: Link, out: &mut Vec<Link>) {
        let node = self.node(link);
        debug_assert!(
            node.first_child.is_valid(),
            "leaf neighbor query on a node without leaf data"
        );
        let leaf = self.leaf(node.first_child.node_index());
        let origin = UVec3::from(Morton(u64::from(link.subnode_index()))).as_ivec3();

        for face in Face::ALL {
            let target = origin + face.offset();
            if target.cmpge(IVec3::ZERO).all() && target.cmplt(IVec3::splat(4)).all() {
                let voxel = Morton::from(target.as_uvec3()).0 as u8;
                if !leaf.is_blocked_at(voxel) {
                    out.push(Link::new(0, link.node_index(), voxel));
                }
                continue;
            }

            let neighbor_link = node.neighbors[face.index()];
            if !neighbor_link.is_valid() {
                // Volume edge.
                continue;
            }
            let neighbor = self.node(neighbor_link);
            if neighbor_link.layer() != 0 || !neighbor.first_child.is_valid() {
                // Coarser or unsubdivided: the whole neighbor is free.
                out.push(neighbor_link);
                continue;
            }
            let neighbor_leaf = self.leaf(neighbor.first_child.node_index());
            if neighbor_leaf.is_completely_blocked() {
                continue;
            }
            // 0 ↔ 3 wrap across the shared face.
            let wrapped = target.rem_euclid(IVec3::splat(4));
            let voxel = Morton::from(wrapped.as_uvec3()).0 as u8;
            if !neighbor_leaf.is_blocked_at(voxel) {
                out.push(Link::new(0, neighbor_link.node_index(), voxel));
            }
        }
    }
}
