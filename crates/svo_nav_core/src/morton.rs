use glam::UVec3;
use morton_encoding::{morton_decode, morton_encode};

use std::fmt;

/// A Morton-encoded cell coordinate: the 3-way bit interleaving of (x, y, z)
/// into a single `u64`, with x in the least significant interleave position.
///
/// Interleaving makes octree arithmetic trivial: the parent cell of `code` is
/// `code >> 3`, and the eight children of `code` fill the contiguous range
/// `code << 3 ..= (code << 3) + 7`. Sorting nodes by code therefore keeps
/// whole sibling groups adjacent, which the octree layers rely on.
///
/// <https://en.wikipedia.org/wiki/Z-order_curve>
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Morton(pub u64);

impl Morton {
    pub const ZERO: Self = Morton(0);

    /// The code of the cell one layer coarser that contains this cell.
    #[inline]
    pub fn parent(self) -> Self {
        Morton(self.0 >> 3)
    }

    /// The code of this cell's first child, one layer finer. The other seven
    /// children follow contiguously.
    #[inline]
    pub fn first_child(self) -> Self {
        Morton(self.0 << 3)
    }

    /// The code of the child in `octant` (`0..8`, x = bit 0, y = bit 1,
    /// z = bit 2).
    #[inline]
    pub fn child(self, octant: u8) -> Self {
        Morton((self.0 << 3) | u64::from(octant))
    }
}

impl fmt::Debug for Morton {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} = {:b}", self.0, self.0)
    }
}

/// Coordinates must fit in 16 bits per axis; the 4-bit layer index in a
/// [`Link`](crate::Link) caps the subdivision power at 13, so in-range cell
/// coordinates never exceed 2^13.
impl From<UVec3> for Morton {
    #[inline]
    fn from(p: UVec3) -> Self {
        Self(morton_encode([p.z as u16, p.y as u16, p.x as u16]))
    }
}

impl From<Morton> for UVec3 {
    #[inline]
    fn from(m: Morton) -> Self {
        let zyx: [u16; 3] = morton_decode(m.0);
        UVec3::new(u32::from(zyx[2]), u32::from(zyx[1]), u32::from(zyx[0]))
    }
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

    use rand::Rng;

    #[test]
    fn decode_is_inverse_of_encode() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let p = UVec3::new(
                rng.gen_range(0..8192),
                rng.gen_range(0..8192),
                rng.gen_range(0..8192),
            );
            assert_eq!(p, UVec3::from(Morton::from(p)));
        }

        let max = UVec3::splat(8191);
        assert_eq!(max, UVec3::from(Morton::from(max)));
        assert_eq!(UVec3::ZERO, UVec3::from(Morton::from(UVec3::ZERO)));
    }

    #[test]
    fn x_is_the_least_significant_axis() {
        assert_eq!(Morton::from(UVec3::new(1, 0, 0)), Morton(0b001));
        assert_eq!(Morton::from(UVec3::new(0, 1, 0)), Morton(0b010));
        assert_eq!(Morton::from(UVec3::new(0, 0, 1)), Morton(0b100));
    }

    #[test]
    fn octants_are_contiguous_in_morton_space() {
        for &parent in [Morton(0), Morton(7), Morton(42), Morton(999)].iter() {
            let first = parent.first_child();
            for octant in 0..8u8 {
                let child = parent.child(octant);
                assert_eq!(child.0, first.0 + u64::from(octant));
                assert_eq!(child.parent(), parent);
            }
        }
    }

    #[test]
    fn siblings_share_a_parent_cell() {
        let p = UVec3::new(6, 3, 5);
        let code = Morton::from(p);
        assert_eq!(UVec3::from(code.parent()), p / 2);
    }
}
