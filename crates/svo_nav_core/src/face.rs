use glam::IVec3;

/// One of the six axis-aligned face directions, in the order neighbor links
/// are stored on a node: +X, −X, +Y, −Y, +Z, −Z.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// The index for this direction in a node's neighbor array.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit cell offset toward this face.
    #[inline]
    pub fn offset(self) -> IVec3 {
        match self {
            Face::PosX => IVec3::X,
            Face::NegX => IVec3::NEG_X,
            Face::PosY => IVec3::Y,
            Face::NegY => IVec3::NEG_Y,
            Face::PosZ => IVec3::Z,
            Face::NegZ => IVec3::NEG_Z,
        }
    }

    /// The four child octants of a neighbor cell that touch the face shared
    /// with a cell traveling in this direction. Octant bits follow Morton
    /// order: x = bit 0, y = bit 1, z = bit 2.
    #[inline]
    pub fn facing_child_octants(self) -> &'static [u8; 4] {
        &FACING_CHILD_OCTANTS[self.index()]
    }

    /// Same selection one level finer: the sixteen sub-voxels of a neighbor's
    /// 4×4×4 leaf grid that touch the shared face, as 6-bit Morton codes.
    #[inline]
    pub fn facing_leaf_voxels(self) -> &'static [u8; 16] {
        &FACING_LEAF_VOXELS[self.index()]
    }
}

// Traveling +X enters the neighbor through its x = 0 face, so the facing
// octants are the ones with the x bit clear, and so on for each direction.
const FACING_CHILD_OCTANTS: [[u8; 4]; 6] = [
    [0, 2, 4, 6], // +X: x = 0
    [1, 3, 5, 7], // −X: x = 1
    [0, 1, 4, 5], // +Y: y = 0
    [2, 3, 6, 7], // −Y: y = 1
    [0, 1, 2, 3], // +Z: z = 0
    [4, 5, 6, 7], // −Z: z = 1
];

const FACING_LEAF_VOXELS: [[u8; 16]; 6] = [
    [0, 2, 16, 18, 4, 6, 20, 22, 32, 34, 48, 50, 36, 38, 52, 54], // +X: x = 0
    [9, 11, 25, 27, 13, 15, 29, 31, 41, 43, 57, 59, 45, 47, 61, 63], // −X: x = 3
    [0, 1, 8, 9, 4, 5, 12, 13, 32, 33, 40, 41, 36, 37, 44, 45], // +Y: y = 0
    [18, 19, 26, 27, 22, 23, 30, 31, 50, 51, 58, 59, 54, 55, 62, 63], // −Y: y = 3
    [0, 1, 8, 9, 2, 3, 10, 11, 16, 17, 24, 25, 18, 19, 26, 27], // +Z: z = 0
    [36, 37, 44, 45, 38, 39, 46, 47, 52, 53, 60, 61, 54, 55, 62, 63], // −Z: z = 3
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Morton;

    use glam::UVec3;

    // Which component of the cell coordinate a face constrains, and to what,
    // for a cell sitting on the entry face of a grid with the given edge.
    fn entry_plane(face: Face, edge: u32) -> (usize, u32) {
        let axis = face.index() / 2;
        let value = if face.index() % 2 == 0 { 0 } else { edge - 1 };
        (axis, value)
    }

    #[test]
    fn facing_child_octants_lie_on_the_entry_face() {
        for face in Face::ALL {
            let (axis, value) = entry_plane(face, 2);
            let mut seen = [false; 8];
            for &octant in face.facing_child_octants() {
                assert!(octant < 8);
                assert!(!seen[octant as usize]);
                seen[octant as usize] = true;
                let p = UVec3::from(Morton(u64::from(octant)));
                assert_eq!(p[axis], value, "{face:?} octant {octant}");
            }
            // Exactly the four octants on that face, no repeats.
            assert_eq!(seen.iter().filter(|&&s| s).count(), 4);
        }
    }

    #[test]
    fn facing_leaf_voxels_lie_on_the_entry_face() {
        for face in Face::ALL {
            let (axis, value) = entry_plane(face, 4);
            let mut seen = [false; 64];
            for &voxel in face.facing_leaf_voxels() {
                assert!(voxel < 64);
                assert!(!seen[voxel as usize]);
                seen[voxel as usize] = true;
                let p = UVec3::from(Morton(u64::from(voxel)));
                assert_eq!(p[axis], value, "{face:?} voxel {voxel}");
            }
            assert_eq!(seen.iter().filter(|&&s| s).count(), 16);
        }
    }

    #[test]
    fn offsets_are_unit_vectors_in_storage_order() {
        assert_eq!(Face::PosX.offset(), IVec3::new(1, 0, 0));
        assert_eq!(Face::NegZ.offset(), IVec3::new(0, 0, -1));
        for face in Face::ALL {
            assert_eq!(face.offset().abs().element_sum(), 1);
            assert_eq!(Face::ALL[face.index()], face);
        }
    }
}
