//! Binary persistence: a small magic-headed container around the
//! bincode-encoded octree, validated on load.
//!
//! The payload layout is order-significant and bit-exact: per layer a
//! length-prefixed sequence of node records with fields in `{code, parent,
//! first_child, neighbors[6]}` order, then a length-prefixed sequence of raw
//! `u64` leaf masks. Links persist as their packed 32-bit patterns, so files
//! do not port across bit-layout revisions; the format version guards that.

use crate::{Octree, ValidateError};

use std::io::{Read, Write};

const MAGIC: [u8; 4] = *b"SNAV";

/// Bumped whenever the persisted layout changes.
pub const FORMAT_VERSION: u16 = 1;

/// Failures while saving or loading a persisted octree.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Codec(#[from] bincode::Error),
    #[error("not an octree file (bad magic)")]
    BadMagic,
    #[error("unsupported format version {0} (expected {FORMAT_VERSION})")]
    UnsupportedVersion(u16),
    #[error("corrupt octree data: {0}")]
    Invalid(#[from] ValidateError),
}

impl Octree {
    /// Writes the magic, format version, and payload.
    pub fn save<W: Write>(&self, mut writer: W) -> Result<(), PersistError> {
        writer.write_all(&MAGIC)?;
        writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Reads an octree written by [`Octree::save`], rejecting foreign files,
    /// unknown versions, and structurally inconsistent data.
    pub fn load<R: Read>(mut reader: R) -> Result<Self, PersistError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(PersistError::BadMagic);
        }
        let mut version = [0u8; 2];
        reader.read_exact(&mut version)?;
        let version = u16::from_le_bytes(version);
        if version != FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion(version));
        }
        let octree: Octree = bincode::deserialize_from(reader)?;
        octree.validate()?;
        Ok(octree)
    }
}
