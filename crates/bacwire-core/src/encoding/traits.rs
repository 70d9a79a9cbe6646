use crate::encoding::writer::Writer;
use crate::EncodeError;
use alloc::vec;
use alloc::vec::Vec;

/// Exact encoded size of a node.
///
/// Composite nodes sum their fields in declaration order; derived (virtual)
/// accessors contribute nothing because they are never written.
pub trait BitLength {
    fn length_in_bits(&self) -> u32;

    /// Encoded size in octets. Frames are byte aligned, so a remainder means
    /// the accounting is wrong.
    fn length_in_bytes(&self) -> u32 {
        let bits = self.length_in_bits();
        debug_assert_eq!(bits % 8, 0, "encoded length is not byte aligned");
        bits / 8
    }
}

/// A node that can write itself to a [`Writer`].
pub trait Encode: BitLength {
    fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError>;

    /// Encodes into a buffer sized from [`BitLength`].
    fn to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        let len = self.length_in_bytes() as usize;
        let mut buf = vec![0u8; len];
        let mut w = Writer::new(&mut buf);
        self.encode(&mut w)?;
        if w.position() != len {
            return Err(EncodeError::InvalidLength);
        }
        Ok(buf)
    }
}

impl<T: BitLength> BitLength for [T] {
    fn length_in_bits(&self) -> u32 {
        self.iter().map(BitLength::length_in_bits).sum()
    }
}

impl<T: BitLength> BitLength for Vec<T> {
    fn length_in_bits(&self) -> u32 {
        self.as_slice().length_in_bits()
    }
}

impl<T: BitLength> BitLength for Option<T> {
    fn length_in_bits(&self) -> u32 {
        self.as_ref().map_or(0, BitLength::length_in_bits)
    }
}

/// Bits taken by a raw octet run.
pub(crate) fn octets_in_bits(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX / 8).saturating_mul(8)
}
