//! Binary serialization trait for resource file headers.
//!
//! The file header and both descriptor types implement `BinarySerializable`,
//! which lets the writer and reader treat the fixed-size tables generically.
//! Each header keeps its own `to_bytes()` returning a fixed-size array.

/// Trait for binary-serializable format headers.
///
/// The trait uses `Vec<u8>` for the return type because associated const
/// generics in return types (`[u8; Self::SIZE]`) are not yet stable in Rust.
///
/// # Example
///
/// ```
/// use sceneview_common::formats::{BinarySerializable, TextureDescriptor};
///
/// let desc = TextureDescriptor::new(64, 16, 16);
///
/// let bytes = desc.serialize();
/// let parsed = TextureDescriptor::deserialize(&bytes).unwrap();
/// assert_eq!(parsed, desc);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short.
    fn deserialize(bytes: &[u8]) -> Option<Self>;

    /// Deserialize entry `index` of a table of these headers starting at `table_offset`.
    fn deserialize_at(bytes: &[u8], table_offset: usize, index: usize) -> Option<Self> {
        let start = table_offset.checked_add(index.checked_mul(Self::SIZE)?)?;
        Self::deserialize(bytes.get(start..)?)
    }
}

impl BinarySerializable for super::ResourceFileHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

impl BinarySerializable for super::TextureDescriptor {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

impl BinarySerializable for super::MeshDescriptor {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{MeshDescriptor, ResourceFileHeader, TextureDescriptor};

    #[test]
    fn test_header_trait() {
        let header = ResourceFileHeader::new(100, 2, 3);
        let bytes = header.serialize();
        assert_eq!(bytes.len(), ResourceFileHeader::SIZE);
        assert_eq!(<ResourceFileHeader as BinarySerializable>::SIZE, 12);

        let parsed = ResourceFileHeader::deserialize(&bytes).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_mesh_descriptor_trait() {
        let desc = MeshDescriptor::new(64, 1, 24, 36);
        let bytes = desc.serialize();
        assert_eq!(<MeshDescriptor as BinarySerializable>::SIZE, 16);

        let parsed = MeshDescriptor::deserialize(&bytes).unwrap();
        assert_eq!(parsed.texture_index, 1);
        assert_eq!(parsed.vertex_count, 24);
        assert_eq!(parsed.index_count, 36);
    }

    #[test]
    fn test_deserialize_at() {
        let mut table = Vec::new();
        table.extend_from_slice(&[0xAA; 4]);
        table.extend(TextureDescriptor::new(1, 2, 3).serialize());
        table.extend(TextureDescriptor::new(4, 5, 6).serialize());

        let second = TextureDescriptor::deserialize_at(&table, 4, 1).unwrap();
        assert_eq!(second, TextureDescriptor::new(4, 5, 6));
        assert!(TextureDescriptor::deserialize_at(&table, 4, 2).is_none());
    }
}
