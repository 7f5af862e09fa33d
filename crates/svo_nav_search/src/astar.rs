//! Weighted A* over the octree's cross-resolution neighbor graph.

use crate::{NavPath, PathPoint};

use float_ord::FloatOrd;
use fnv::{FnvHashMap, FnvHashSet};
use glam::Vec3;
use svo_nav_core::Link;
use svo_nav_octree::Octree;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Distance metric for the heuristic.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostMetric {
    Manhattan,
    Euclidean,
}

/// Tunables for a path query.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathFinderSettings {
    /// Charge a flat cost per hop instead of traveled distance.
    pub use_unit_cost: bool,
    pub unit_cost: f32,
    /// Heuristic multiplier. Values above 1 make the search greedier and no
    /// longer admissible.
    pub estimate_weight: f32,
    /// Discounts scores toward coarser cells, which cover long real-world
    /// distances in a single hop. 0 disables the discount.
    pub node_size_compensation: f32,
    /// Distance metric for the heuristic.
    pub cost_metric: CostMetric,
}

impl Default for PathFinderSettings {
    fn default() -> Self {
        Self {
            use_unit_cost: false,
            unit_cost: 1.0,
            estimate_weight: 1.0,
            node_size_compensation: 1.0,
            cost_metric: CostMetric::Euclidean,
        }
    }
}

/// Hooks into a search for visualization and diagnostics; production builds
/// pass `&mut ()`.
pub trait SearchObserver {
    /// `link` entered the open set for the first time.
    fn node_opened(&mut self, link: Link, position: Vec3) {
        let _ = (link, position);
    }
}

impl SearchObserver for () {}

/// A* over one octree. Every query owns its open/closed sets and score maps,
/// so any number of queries may run concurrently against a shared octree.
pub struct PathFinder<'a> {
    octree: &'a Octree,
    settings: &'a PathFinderSettings,
}

struct OpenEntry {
    f_score: FloatOrd<f32>,
    sequence: u64,
    link: Link,
}

// Min-heap on f-score, FIFO among equal scores, so equal-cost searches expand
// in a deterministic order.
impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then(other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl<'a> PathFinder<'a> {
    pub fn new(octree: &'a Octree, settings: &'a PathFinderSettings) -> Self {
        Self { octree, settings }
    }

    /// Searches from `start` to `target`. The exact endpoint positions
    /// replace the resolved cells' centers at the two ends of the returned
    /// path. `None` when the open set empties without reaching `target`,
    /// meaning the endpoints are not connected.
    pub fn find_path(
        &self,
        start: Link,
        target: Link,
        start_position: Vec3,
        target_position: Vec3,
    ) -> Option<NavPath> {
        self.find_path_with_observer(start, target, start_position, target_position, &mut ())
    }

    /// [`PathFinder::find_path`], reporting newly opened nodes to `observer`.
    pub fn find_path_with_observer(
        &self,
        start: Link,
        target: Link,
        start_position: Vec3,
        target_position: Vec3,
        observer: &mut impl SearchObserver,
    ) -> Option<NavPath> {
        let mut open = BinaryHeap::new();
        let mut closed = FnvHashSet::default();
        let mut came_from = FnvHashMap::default();
        let mut g_score = FnvHashMap::default();
        let mut sequence = 0u64;

        came_from.insert(start, start);
        g_score.insert(start, 0.0f32);
        open.push(OpenEntry {
            f_score: FloatOrd(self.heuristic(start, target)),
            sequence,
            link: start,
        });

        let mut neighbors = Vec::new();
        let mut iterations = 0u32;
        while let Some(OpenEntry { link: current, .. }) = open.pop() {
            if !closed.insert(current) {
                // Stale entry for a node relaxed again before being expanded.
                continue;
            }
            iterations += 1;

            if current == target {
                tracing::debug!(iterations, "path found");
                return Some(self.build_path(&came_from, start, target, start_position, target_position));
            }

            neighbors.clear();
            let node = self.octree.node(current);
            if current.layer() == 0 && node.first_child.is_valid() {
                self.octree.leaf_neighbors(current, &mut neighbors);
            } else {
                self.octree.neighbors(current, &mut neighbors);
            }

            // Missing scores count as infinite, and relaxing from an
            // unscored node is pointless.
            let Some(&current_g) = g_score.get(&current) else {
                continue;
            };
            for &neighbor in &neighbors {
                if closed.contains(&neighbor) {
                    continue;
                }
                let tentative = current_g + self.cost(current, neighbor);
                match g_score.get(&neighbor) {
                    Some(&g) if tentative >= g => continue,
                    Some(_) => {}
                    None => observer.node_opened(neighbor, self.octree.link_position(neighbor)),
                }
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                sequence += 1;
                open.push(OpenEntry {
                    f_score: FloatOrd(
                        tentative + self.settings.estimate_weight * self.heuristic(neighbor, target),
                    ),
                    sequence,
                    link: neighbor,
                });
            }
        }

        tracing::debug!(iterations, "open set exhausted without reaching the target");
        None
    }

    // Coarser cells cover long real distances in one hop; discounting their
    // scores keeps the search from shunning them.
    fn layer_scale(&self, target: Link) -> f32 {
        1.0 - (f32::from(target.layer()) / f32::from(self.octree.num_layers()))
            * self.settings.node_size_compensation
    }

    /// Estimated remaining distance, discounted for coarser target cells.
    fn heuristic(&self, from: Link, to: Link) -> f32 {
        let a = self.octree.link_position(from);
        let b = self.octree.link_position(to);
        let distance = match self.settings.cost_metric {
            CostMetric::Manhattan => {
                let d = (b - a).abs();
                d.x + d.y + d.z
            }
            CostMetric::Euclidean => a.distance(b),
        };
        distance * self.layer_scale(to)
    }

    /// Cost of stepping between two adjacent cells.
    fn cost(&self, from: Link, to: Link) -> f32 {
        let base = if self.settings.use_unit_cost {
            self.settings.unit_cost
        } else {
            self.octree
                .link_position(from)
                .distance(self.octree.link_position(to))
        };
        base * self.layer_scale(to)
    }

    // Walks the cameFrom chain from the target back to the start's
    // self-reference, then turns the visited cell centers into a start→target
    // waypoint list whose two ends are the exact requested positions.
    fn build_path(
        &self,
        came_from: &FnvHashMap<Link, Link>,
        start: Link,
        target: Link,
        start_position: Vec3,
        target_position: Vec3,
    ) -> NavPath {
        let mut points = Vec::new();
        let mut current = target;
        while let Some(&previous) = came_from.get(&current) {
            if previous == current {
                break;
            }
            current = previous;
            points.push(PathPoint::new(
                self.octree.link_position(current),
                self.resolution_tag(current),
            ));
        }

        if points.len() > 1 {
            // Collected in target→start order: the head stands in for the
            // target, the tail is the start cell.
            points[0].position = target_position;
            let last = points.len() - 1;
            points[last].position = start_position;
        } else {
            // Start and target share a cell, or sit one hop apart: the path
            // is the two literal endpoints.
            points.clear();
            points.push(PathPoint::new(target_position, self.resolution_tag(target)));
            points.push(PathPoint::new(start_position, self.resolution_tag(start)));
        }
        points.reverse();
        NavPath::new(points)
    }

    // Cosmetic sizing hint only; see [`PathPoint::layer`].
    fn resolution_tag(&self, link: Link) -> u8 {
        if link.layer() == 0 {
            if self.octree.node(link).first_child.is_valid() {
                0
            } else {
                1
            }
        } else {
            link.layer()
        }
    }
}
