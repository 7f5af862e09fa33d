use glam::Vec3;

/// One waypoint of a computed path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathPoint {
    pub position: Vec3,
    /// Resolution tag for size-dependent rendering only: 0 for leaf
    /// sub-voxels, 1 for unsubdivided layer-0 cells, otherwise the layer the
    /// point came from. Nothing in the search reads it back.
    pub layer: u8,
}

impl PathPoint {
    pub fn new(position: Vec3, layer: u8) -> Self {
        Self { position, layer }
    }
}

/// An ordered start→target sequence of waypoints. The first and last points
/// are the exact requested endpoint positions; interior points are the
/// centers of the cells the path passes through.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavPath {
    points: Vec<PathPoint>,
}

impl NavPath {
    pub(crate) fn new(points: Vec<PathPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().map(|point| point.position)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
