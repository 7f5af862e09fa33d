use glam::Vec3;

/// The cubic axis-aligned region of world space an octree covers, stored as
/// a center and half of the edge length. Cell coordinates at every layer are
/// measured from [`VolumeBounds::min_corner`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeBounds {
    pub center: Vec3,
    pub half_extent: f32,
}

impl VolumeBounds {
    #[inline]
    pub fn new(center: Vec3, half_extent: f32) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    /// Edge length of the cube.
    #[inline]
    pub fn edge_length(&self) -> f32 {
        self.half_extent * 2.0
    }

    #[inline]
    pub fn min_corner(&self) -> Vec3 {
        self.center - Vec3::splat(self.half_extent)
    }

    #[inline]
    pub fn max_corner(&self) -> Vec3 {
        self.center + Vec3::splat(self.half_extent)
    }

    /// Whether `position` lies inside the region, inclusive on all faces.
    #[inline]
    pub fn contains(&self, position: Vec3) -> bool {
        position.cmpge(self.min_corner()).all() && position.cmple(self.max_corner()).all()
    }
}
