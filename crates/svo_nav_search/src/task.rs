//! Fire-and-forget path queries on a worker thread, polled through a
//! completion flag.

use crate::{find_path, FindPathError, NavPath, PathFinderSettings};

use glam::Vec3;
use parking_lot::Mutex;
use svo_nav_octree::Octree;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Caller-supplied output slot for an async query.
pub type PathResultSlot = Arc<Mutex<Option<Result<NavPath, FindPathError>>>>;

/// Dispatches a path query onto a worker thread so the caller never blocks.
///
/// The worker writes its outcome into `result` and then flips `complete`
/// exactly once; the caller polls the flag. There is no cancellation: a
/// dispatched query runs to completion, and a query against a pathologically
/// open region runs until its open set is exhausted.
pub fn find_path_async(
    octree: Arc<Octree>,
    settings: PathFinderSettings,
    start: Vec3,
    target: Vec3,
    result: PathResultSlot,
    complete: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let outcome = find_path(&octree, &settings, start, target);
        *result.lock() = Some(outcome);
        complete.store(true, Ordering::Release);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use svo_nav_octree::{generate, BuildSettings};
    use svo_nav_core::VolumeBounds;

    #[test]
    fn completion_flag_flips_after_the_result_lands() {
        let octree = Arc::new(generate(
            VolumeBounds::new(Vec3::ZERO, 8.0),
            &BuildSettings::default(),
            &|_: Vec3, _: f32| false,
        ));
        let result: PathResultSlot = Arc::new(Mutex::new(None));
        let complete = Arc::new(AtomicBool::new(false));

        let handle = find_path_async(
            octree,
            PathFinderSettings::default(),
            Vec3::new(-6.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
            result.clone(),
            complete.clone(),
        );
        handle.join().unwrap();

        assert!(complete.load(Ordering::Acquire));
        let outcome = result.lock().take().expect("result populated");
        let path = outcome.expect("path through empty volume");
        assert_eq!(path.points()[0].position, Vec3::new(-6.0, 0.0, 0.0));
    }

    #[test]
    fn failures_also_complete() {
        let octree = Arc::new(generate(
            VolumeBounds::new(Vec3::ZERO, 8.0),
            &BuildSettings::default(),
            &|_: Vec3, _: f32| false,
        ));
        let result: PathResultSlot = Arc::new(Mutex::new(None));
        let complete = Arc::new(AtomicBool::new(false));

        find_path_async(
            octree,
            PathFinderSettings::default(),
            Vec3::ZERO,
            Vec3::splat(100.0),
            result.clone(),
            complete.clone(),
        )
        .join()
        .unwrap();

        assert!(complete.load(Ordering::Acquire));
        assert!(result.lock().take().unwrap().is_err());
    }
}
