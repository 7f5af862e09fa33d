//! Octree generation: rasterizes an occupancy oracle into the sparse layer
//! hierarchy, bottom-up, then wires the cross-resolution neighbor graph.

use crate::{LeafNode, Node, Octree};

use fnv::FnvHashSet;
use glam::{IVec3, UVec3, Vec3};
use svo_nav_core::{Face, Link, Morton, VolumeBounds};

use std::ops::Range;
use std::time::Instant;

/// The layer index is stored in 4 bits with 15 reserved as the invalid
/// sentinel, which caps `num_layers` and therefore the subdivision power.
pub const MAX_VOXEL_POWER: u8 = 13;

/// Black-box occupancy test over world geometry: is the axis-aligned cube at
/// `center` with the given `half_extent` blocked? The builder never inspects
/// geometry itself.
pub trait OccupancyOracle {
    fn is_blocked(&self, center: Vec3, half_extent: f32) -> bool;
}

impl<F> OccupancyOracle for F
where
    F: Fn(Vec3, f32) -> bool,
{
    fn is_blocked(&self, center: Vec3, half_extent: f32) -> bool {
        self(center, half_extent)
    }
}

/// Hooks into generation for visualization and diagnostics; every method
/// defaults to a no-op, and production builds pass `&mut ()`.
pub trait BuildObserver {
    /// A node was added to `layer` at the cell `code`.
    fn node_materialized(&mut self, layer: u8, code: Morton, position: Vec3, voxel_size: f32) {
        let _ = (layer, code, position, voxel_size);
    }

    /// A face link of `from` was resolved, possibly to [`Link::INVALID`] at
    /// the volume edge or toward a solid leaf.
    fn neighbor_link_resolved(&mut self, from: Link, face: Face, to: Link) {
        let _ = (from, face, to);
    }
}

impl BuildObserver for () {}

/// Generation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildSettings {
    /// Subdivision power P: the finest node layer is 2^P cells per axis, and
    /// each blocked cell there carries a 4×4×4 occupancy grid. Clamped to
    /// [`MAX_VOXEL_POWER`]; 0 yields a degenerate root-only octree.
    pub voxel_power: u8,
    /// Margin added to every oracle box, keeping paths clear of geometry.
    pub clearance: f32,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            voxel_power: 3,
            clearance: 0.0,
        }
    }
}

/// Builds the octree for `bounds`. Synchronous and single-threaded; the
/// returned octree is immutable and safe to share across query threads.
///
/// Degenerate input (power 0, non-positive extent) is not an error: it
/// produces a minimal root-only octree.
pub fn generate(
    bounds: VolumeBounds,
    settings: &BuildSettings,
    oracle: &impl OccupancyOracle,
) -> Octree {
    generate_with_observer(bounds, settings, oracle, &mut ())
}

/// [`generate`], reporting progress through `observer`.
pub fn generate_with_observer(
    bounds: VolumeBounds,
    settings: &BuildSettings,
    oracle: &impl OccupancyOracle,
    observer: &mut impl BuildObserver,
) -> Octree {
    let started = Instant::now();
    let power = settings.voxel_power.min(MAX_VOXEL_POWER);

    let mut builder = Builder {
        bounds,
        power,
        clearance: settings.clearance,
        oracle,
        observer,
        blocked: Vec::new(),
        layers: vec![Vec::new(); usize::from(power) + 1],
        leaf_nodes: Vec::new(),
    };

    if power > 0 && bounds.half_extent > 0.0 {
        builder.first_pass_rasterize();
        builder.propagate_blocked_ancestry();
        builder.rasterize_leaf_layer();
        for layer in 1..power {
            builder.rasterize_interior_layer(layer);
        }
    }
    builder.materialize_root();
    for layer in (0..power).rev() {
        builder.build_neighbor_links(layer);
    }

    let octree = Octree {
        bounds,
        voxel_power: power,
        layers: builder.layers,
        leaf_nodes: builder.leaf_nodes,
    };
    tracing::info!(
        layers = octree.num_layers(),
        nodes = octree.node_count(),
        leaves = octree.leaf_count(),
        bytes = octree.size_bytes(),
        elapsed = ?started.elapsed(),
        "generated sparse voxel octree"
    );
    octree
}

struct Builder<'a, O, Obs> {
    bounds: VolumeBounds,
    power: u8,
    clearance: f32,
    oracle: &'a O,
    observer: &'a mut Obs,
    /// `blocked[i]` holds the layer-(i+1) resolution codes whose subtrees
    /// contain geometry. A layer-L node materializes iff its parent's code is
    /// in `blocked[L]`, so siblings always materialize in complete groups of
    /// eight and child ranges stay contiguous.
    blocked: Vec<FnvHashSet<u64>>,
    layers: Vec<Vec<Node>>,
    leaf_nodes: Vec<LeafNode>,
}

fn child_codes(parent: u64) -> Range<u64> {
    (parent << 3)..(parent << 3) + 8
}

impl<O: OccupancyOracle, Obs: BuildObserver> Builder<'_, O, Obs> {
    fn cells_per_axis(&self, layer: u8) -> u32 {
        1 << (self.power - layer)
    }

    fn voxel_size(&self, layer: u8) -> f32 {
        self.bounds.edge_length() / self.cells_per_axis(layer) as f32
    }

    fn node_position(&self, layer: u8, code: Morton) -> Vec3 {
        self.bounds.min_corner() + (UVec3::from(code).as_vec3() + 0.5) * self.voxel_size(layer)
    }

    fn is_blocked(&self, center: Vec3, half_extent: f32) -> bool {
        self.oracle.is_blocked(center, half_extent + self.clearance)
    }

    /// Coarse scan one layer above the leaves; finer structure only exists
    /// where this pass finds geometry.
    fn first_pass_rasterize(&mut self) {
        let mut blocked = FnvHashSet::default();
        let cell_count = 1u64 << (3 * u32::from(self.power - 1));
        let half = self.voxel_size(1) * 0.5;
        for code in 0..cell_count {
            if self.is_blocked(self.node_position(1, Morton(code)), half) {
                blocked.insert(code);
            }
        }
        self.blocked.push(blocked);
    }

    /// Unions parent codes upward until every layer that materializes nodes
    /// has its tracking set.
    fn propagate_blocked_ancestry(&mut self) {
        for _ in 1..self.power {
            let parents: FnvHashSet<u64> = self
                .blocked
                .last()
                .expect("first pass ran")
                .iter()
                .map(|code| code >> 3)
                .collect();
            self.blocked.push(parents);
        }
    }

    fn sorted_blocked(&self, index: usize) -> Vec<u64> {
        let mut codes: Vec<u64> = self.blocked[index].iter().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Materializes layer 0. Cells that are themselves blocked at full
    /// resolution get a rasterized 4×4×4 leaf grid; free cells stay whole.
    /// Iterating sorted parents and emitting their eight children keeps the
    /// layer sorted by code.
    fn rasterize_leaf_layer(&mut self) {
        let size = self.voxel_size(0);
        for parent in self.sorted_blocked(0) {
            for code in child_codes(parent) {
                let code = Morton(code);
                let position = self.node_position(0, code);
                let mut node = Node::new(code);
                if self.is_blocked(position, size * 0.5) {
                    let leaf_index = self.leaf_nodes.len() as u32;
                    self.rasterize_leaf(position - Vec3::splat(size * 0.5));
                    node.first_child = Link::new(0, leaf_index, 0);
                }
                self.observer.node_materialized(0, code, position, size);
                self.layers[0].push(node);
            }
        }
    }

    /// Tests all 64 sub-voxels of one blocked layer-0 cell and records the
    /// occupancy mask.
    fn rasterize_leaf(&mut self, origin: Vec3) {
        let size = self.voxel_size(0) * 0.25;
        let mut leaf = LeafNode::EMPTY;
        for voxel in 0..64u8 {
            let offset = UVec3::from(Morton(u64::from(voxel))).as_vec3();
            let center = origin + offset * size + Vec3::splat(size * 0.5);
            if self.is_blocked(center, size * 0.5) {
                leaf.set_blocked(voxel);
            }
        }
        self.leaf_nodes.push(leaf);
    }

    fn rasterize_interior_layer(&mut self, layer: u8) {
        let size = self.voxel_size(layer);
        for parent in self.sorted_blocked(usize::from(layer)) {
            for code in child_codes(parent) {
                let code = Morton(code);
                let position = self.node_position(layer, code);
                let index = self.layers[usize::from(layer)].len() as u32;
                let mut node = Node::new(code);
                self.wire_children(layer, index, &mut node);
                self.observer.node_materialized(layer, code, position, size);
                self.layers[usize::from(layer)].push(node);
            }
        }
    }

    /// Links `node` to its eight children in the layer below, if its own
    /// subtree contains geometry, and points those children back at it.
    fn wire_children(&mut self, layer: u8, index: u32, node: &mut Node) {
        let below = usize::from(layer) - 1;
        if let Ok(first) =
            self.layers[below].binary_search_by_key(&node.code.first_child(), |n| n.code)
        {
            debug_assert!(first + 8 <= self.layers[below].len());
            node.first_child = Link::new(layer - 1, first as u32, 0);
            for child in &mut self.layers[below][first..first + 8] {
                child.parent = Link::new(layer, index, 0);
            }
        }
    }

    /// The coarsest layer always holds the single root covering the whole
    /// volume, so an all-free volume still resolves positions to a node.
    fn materialize_root(&mut self) {
        let top = self.power;
        let position = self.node_position(top, Morton::ZERO);
        let size = self.voxel_size(top);
        let mut node = Node::new(Morton::ZERO);
        if top > 0 {
            self.wire_children(top, 0, &mut node);
        }
        self.observer.node_materialized(top, Morton::ZERO, position, size);
        self.layers[usize::from(top)].push(node);
    }

    fn build_neighbor_links(&mut self, layer: u8) {
        for index in 0..self.layers[usize::from(layer)].len() {
            let from = Link::new(layer, index as u32, 0);
            for face in Face::ALL {
                let link = self.find_neighbor(layer, index, face);
                self.layers[usize::from(layer)][index].neighbors[face.index()] = link;
                self.observer.neighbor_link_resolved(from, face, link);
            }
        }
    }

    /// Resolves one face link: searches the node's own layer first, then
    /// climbs to the parent (or the `code >> 3` lookup one layer up when no
    /// parent link is set) and retries one layer coarser, until a neighbor is
    /// found or the top layer is exhausted.
    fn find_neighbor(&self, layer: u8, index: usize, face: Face) -> Link {
        let mut layer = layer;
        let mut index = index;
        loop {
            if let Some(link) = self.find_link_in_direction(layer, index, face) {
                return link;
            }
            let node = &self.layers[usize::from(layer)][index];
            if node.parent.is_valid() {
                index = node.parent.node_index() as usize;
                layer = node.parent.layer();
            } else {
                let parent_code = node.code.parent();
                layer += 1;
                if layer > self.power {
                    return Link::INVALID;
                }
                match self.layers[usize::from(layer)]
                    .binary_search_by_key(&parent_code, |n| n.code)
                {
                    Ok(i) => index = i,
                    Err(_) => return Link::INVALID,
                }
            }
        }
    }

    /// Same-layer search for the face-adjacent code, as an incremental walk
    /// from the node's own index stepped by the code ordering. Layers are
    /// sorted, so overshooting the target code proves the cell is not
    /// materialized on this layer (`None`). `Some(Link::INVALID)` is a
    /// definitive "no neighbor": the volume edge, or a solid leaf not worth
    /// linking to.
    fn find_link_in_direction(&self, layer: u8, index: usize, face: Face) -> Option<Link> {
        let nodes = &self.layers[usize::from(layer)];
        let node = &nodes[index];
        let max_coord = self.cells_per_axis(layer) as i32;
        let target = UVec3::from(node.code).as_ivec3() + face.offset();
        if target.cmplt(IVec3::ZERO).any() || target.cmpge(IVec3::splat(max_coord)).any() {
            return Some(Link::INVALID);
        }

        let target_code = Morton::from(target.as_uvec3());
        let step: isize = if target_code > node.code { 1 } else { -1 };
        let mut candidate = index as isize + step;
        while candidate >= 0 && (candidate as usize) < nodes.len() {
            let other = &nodes[candidate as usize];
            if other.code == target_code {
                // Never link into a completely solid leaf.
                if layer == 0
                    && other.first_child.is_valid()
                    && self.leaf_nodes[other.first_child.node_index() as usize]
                        .is_completely_blocked()
                {
                    return Some(Link::INVALID);
                }
                return Some(Link::new(layer, candidate as u32, 0));
            }
            if (step > 0 && other.code > target_code) || (step < 0 && other.code < target_code) {
                return None;
            }
            candidate += step;
        }
        None
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
