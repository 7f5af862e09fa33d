//! Pathfinding over sparse voxel octree navigation data: a weighted A* on
//! the cross-resolution neighbor graph, offered as a blocking call and as a
//! fire-and-forget worker-thread dispatch.
//!
//! The octree being searched is read-only; every query owns its search state,
//! so queries scale across threads without locking.

pub mod astar;
pub mod path;
pub mod task;

pub use astar::{CostMetric, PathFinder, PathFinderSettings, SearchObserver};
pub use path::{NavPath, PathPoint};
pub use task::{find_path_async, PathResultSlot};

use glam::Vec3;
use svo_nav_octree::Octree;

/// Why a path query produced no path.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum FindPathError {
    /// The start position is outside the volume or inside blocked geometry:
    /// a precondition failure, reported before any search runs.
    #[error("start position {0} does not resolve to a navigable cell")]
    UnnavigableStart(Vec3),
    #[error("target position {0} does not resolve to a navigable cell")]
    UnnavigableTarget(Vec3),
    /// The search exhausted its open set: the endpoints are not connected.
    /// This is a valid connectivity answer, not a fault.
    #[error("no path exists between the start and target positions")]
    NoPath,
}

/// Finds a start→target path through `octree`, blocking until the search
/// completes. See [`find_path_async`] for the non-blocking form.
pub fn find_path(
    octree: &Octree,
    settings: &PathFinderSettings,
    start: Vec3,
    target: Vec3,
) -> Result<NavPath, FindPathError> {
    let start_link = octree
        .find_link(start)
        .ok_or(FindPathError::UnnavigableStart(start))?;
    let target_link = octree
        .find_link(target)
        .ok_or(FindPathError::UnnavigableTarget(target))?;
    PathFinder::new(octree, settings)
        .find_path(start_link, target_link, start, target)
        .ok_or(FindPathError::NoPath)
}

pub mod prelude {
    pub use super::{
        find_path, find_path_async, FindPathError, NavPath, PathFinder, PathFinderSettings,
        PathPoint,
    };
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{HashMap, VecDeque};

    use svo_nav_core::{Link, VolumeBounds};
    use svo_nav_octree::{generate, BuildSettings};

    fn bounds() -> VolumeBounds {
        VolumeBounds::new(Vec3::ZERO, 8.0)
    }

    fn free_space(_: Vec3, _: f32) -> bool {
        false
    }

    /// A thin wall across the whole volume at x ≈ 0, with an optional open
    /// window at y ∈ [2, 4], z ∈ [-2, 2].
    fn wall(with_window: bool) -> impl Fn(Vec3, f32) -> bool {
        move |center: Vec3, half: f32| {
            let lo = center - Vec3::splat(half);
            let hi = center + Vec3::splat(half);
            let hits_slab = hi.x >= -0.25 && lo.x <= 0.25;
            let inside_window = with_window
                && lo.y >= 2.0
                && hi.y <= 4.0
                && lo.z >= -2.0
                && hi.z <= 2.0;
            hits_slab && !inside_window
        }
    }

    fn build(power: u8, oracle: &impl Fn(Vec3, f32) -> bool) -> svo_nav_octree::Octree {
        generate(
            bounds(),
            &BuildSettings {
                voxel_power: power,
                clearance: 0.0,
            },
            oracle,
        )
    }

    /// Unweighted hop count through the same neighbor graph the pathfinder
    /// expands, as an optimality reference.
    fn hop_distance(octree: &svo_nav_octree::Octree, start: Link, target: Link) -> usize {
        let mut distance = HashMap::new();
        let mut queue = VecDeque::new();
        distance.insert(start, 0usize);
        queue.push_back(start);
        let mut neighbors = Vec::new();
        while let Some(current) = queue.pop_front() {
            let steps = distance[&current];
            if current == target {
                return steps;
            }
            neighbors.clear();
            let node = octree.node(current);
            if current.layer() == 0 && node.first_child.is_valid() {
                octree.leaf_neighbors(current, &mut neighbors);
            } else {
                octree.neighbors(current, &mut neighbors);
            }
            for &next in &neighbors {
                if !distance.contains_key(&next) {
                    distance.insert(next, steps + 1);
                    queue.push_back(next);
                }
            }
        }
        panic!("target not reachable in reference search");
    }

    #[test]
    fn empty_volume_yields_the_two_literal_endpoints() {
        let octree = build(3, &free_space);
        let start = Vec3::new(-6.0, 1.0, 2.0);
        let target = Vec3::new(5.0, -3.0, 0.5);
        let path = find_path(&octree, &PathFinderSettings::default(), start, target).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.points()[0].position, start);
        assert_eq!(path.points()[1].position, target);
    }

    #[test]
    fn endpoints_outside_the_volume_are_precondition_failures() {
        let octree = build(3, &free_space);
        let inside = Vec3::ZERO;
        let outside = Vec3::new(20.0, 0.0, 0.0);
        assert_eq!(
            find_path(&octree, &PathFinderSettings::default(), inside, outside),
            Err(FindPathError::UnnavigableTarget(outside))
        );
        assert_eq!(
            find_path(&octree, &PathFinderSettings::default(), outside, inside),
            Err(FindPathError::UnnavigableStart(outside))
        );
    }

    #[test]
    fn endpoints_inside_geometry_are_precondition_failures() {
        let octree = build(2, &wall(false));
        // Dead center of the wall.
        let blocked = Vec3::new(0.1, 0.5, 0.5);
        assert!(matches!(
            find_path(
                &octree,
                &PathFinderSettings::default(),
                Vec3::new(-5.0, 0.5, 0.5),
                blocked,
            ),
            Err(FindPathError::UnnavigableTarget(_))
        ));
    }

    #[test]
    fn path_detours_through_the_window() {
        let octree = build(2, &wall(true));
        let oracle = wall(true);
        let start = Vec3::new(-5.0, 0.5, 0.5);
        let target = Vec3::new(5.0, 0.5, 0.5);
        let path = find_path(&octree, &PathFinderSettings::default(), start, target).unwrap();

        assert!(path.len() >= 3);
        assert_eq!(path.points()[0].position, start);
        assert_eq!(path.points()[path.len() - 1].position, target);

        // The crossing happens inside the window, and interior waypoints are
        // cell centers of free space.
        assert!(path
            .positions()
            .any(|p| p.x.abs() <= 1.0 && (2.0..4.0).contains(&p.y)));
        for point in &path.points()[1..path.len() - 1] {
            assert!(!oracle(point.position, 0.05));
        }
    }

    #[test]
    fn sealed_wall_exhausts_the_search() {
        let octree = build(2, &wall(false));
        let result = find_path(
            &octree,
            &PathFinderSettings::default(),
            Vec3::new(-5.0, 0.5, 0.5),
            Vec3::new(5.0, 0.5, 0.5),
        );
        assert_eq!(result, Err(FindPathError::NoPath));
    }

    #[test]
    fn unit_cost_paths_are_hop_optimal() {
        let octree = build(2, &wall(true));
        let start = Vec3::new(-5.0, 0.5, 0.5);
        let target = Vec3::new(5.0, 0.5, 0.5);
        let start_link = octree.find_link(start).unwrap();
        let target_link = octree.find_link(target).unwrap();

        // A unit cost far above any straight-line estimate keeps the
        // heuristic admissible, so the weighted search must return a
        // hop-minimal path.
        let settings = PathFinderSettings {
            use_unit_cost: true,
            unit_cost: 1000.0,
            estimate_weight: 1.0,
            node_size_compensation: 0.0,
            cost_metric: CostMetric::Euclidean,
        };
        let path = find_path(&octree, &settings, start, target).unwrap();
        let optimal = hop_distance(&octree, start_link, target_link);
        assert!(optimal >= 2);
        assert_eq!(path.len(), optimal);
    }

    #[test]
    fn identical_queries_return_identical_paths() {
        let octree = build(2, &wall(true));
        let settings = PathFinderSettings::default();
        let start = Vec3::new(-5.0, 0.5, 0.5);
        let target = Vec3::new(5.0, -0.5, -0.5);
        let first = find_path(&octree, &settings, start, target).unwrap();
        let second = find_path(&octree, &settings, start, target).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn observer_sees_opened_nodes() {
        struct Count(usize);
        impl SearchObserver for Count {
            fn node_opened(&mut self, _: Link, _: Vec3) {
                self.0 += 1;
            }
        }

        let octree = build(2, &wall(true));
        let start = Vec3::new(-5.0, 0.5, 0.5);
        let target = Vec3::new(5.0, 0.5, 0.5);
        let start_link = octree.find_link(start).unwrap();
        let target_link = octree.find_link(target).unwrap();

        let settings = PathFinderSettings::default();
        let mut count = Count(0);
        PathFinder::new(&octree, &settings)
            .find_path_with_observer(start_link, target_link, start, target, &mut count)
            .unwrap();
        assert!(count.0 > 0);
    }
}
