use std::fmt;

const LAYER_SHIFT: u32 = 28;
const NODE_SHIFT: u32 = 6;
const NODE_MASK: u32 = (1 << 22) - 1;
const SUBNODE_MASK: u32 = (1 << 6) - 1;
const INVALID_LAYER: u8 = 15;

/// The address of a node, or of a sub-voxel inside a node's 4×4×4 leaf grid,
/// packed into one `u32`:
///
/// ```text
/// bits 28..32  layer index    (0..=13 valid, 15 = invalid sentinel)
/// bits  6..28  node index     (into that layer's node sequence)
/// bits  0..6   subnode index  (Morton code into the leaf grid; meaningful
///                              only for layer-0 nodes with leaf data)
/// ```
///
/// Equality is exact bit-pattern equality across all three fields, and the
/// packed form is also the persisted form.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Link(u32);

impl Link {
    /// The invalid sentinel: layer 15, node 0, subnode 0.
    pub const INVALID: Self = Link((INVALID_LAYER as u32) << LAYER_SHIFT);

    #[inline]
    pub fn new(layer: u8, node_index: u32, subnode_index: u8) -> Self {
        debug_assert!(layer <= INVALID_LAYER);
        debug_assert!(node_index <= NODE_MASK);
        debug_assert!(u32::from(subnode_index) <= SUBNODE_MASK);
        Link(
            (u32::from(layer) << LAYER_SHIFT)
                | ((node_index & NODE_MASK) << NODE_SHIFT)
                | (u32::from(subnode_index) & SUBNODE_MASK),
        )
    }

    #[inline]
    pub fn layer(self) -> u8 {
        (self.0 >> LAYER_SHIFT) as u8
    }

    #[inline]
    pub fn node_index(self) -> u32 {
        (self.0 >> NODE_SHIFT) & NODE_MASK
    }

    #[inline]
    pub fn subnode_index(self) -> u8 {
        (self.0 & SUBNODE_MASK) as u8
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.layer() != INVALID_LAYER
    }

    /// The raw packed bit pattern. This is what gets persisted, so files are
    /// bit-layout dependent.
    #[inline]
    pub fn to_bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn from_bits(bits: u32) -> Self {
        Link(bits)
    }
}

impl Default for Link {
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.layer(),
            self.node_index(),
            self.subnode_index()
        )
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Link({self})")
        } else {
            write!(f, "Link(invalid)")
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Link {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Link {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <u32 as serde::Deserialize>::deserialize(deserializer).map(Link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_round_trip() {
        let link = Link::new(13, NODE_MASK, 63);
        assert_eq!(link.layer(), 13);
        assert_eq!(link.node_index(), NODE_MASK);
        assert_eq!(link.subnode_index(), 63);
        assert!(link.is_valid());
    }

    #[test]
    fn bit_layout_is_fixed() {
        assert_eq!(Link::new(0, 0, 0).to_bits(), 0);
        assert_eq!(Link::new(1, 0, 0).to_bits(), 1 << 28);
        assert_eq!(Link::new(0, 1, 0).to_bits(), 1 << 6);
        assert_eq!(Link::new(0, 0, 1).to_bits(), 1);
        assert_eq!(Link::new(2, 3, 4).to_bits(), (2 << 28) | (3 << 6) | 4);
    }

    #[test]
    fn invalid_sentinel() {
        assert!(!Link::INVALID.is_valid());
        assert_eq!(Link::INVALID, Link::new(15, 0, 0));
        assert_eq!(Link::default(), Link::INVALID);
        // A valid link never compares equal to the sentinel.
        assert_ne!(Link::new(0, 0, 0), Link::INVALID);
    }

    #[test]
    fn displays_as_colon_separated_fields() {
        assert_eq!(Link::new(2, 17, 5).to_string(), "2:17:5");
    }
}
