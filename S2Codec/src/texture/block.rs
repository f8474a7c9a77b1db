//! 128-bit compressed block access.
//!
//! A BPTC block is two little-endian 64-bit words read as one `u128`, so a
//! field that straddles the word boundary needs no special casing.

/// Bytes per compressed 4x4 block.
pub const BLOCK_BYTES: usize = 16;

/// One 16-byte block viewed as a 128-bit little-endian integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Block(u128);

impl Block {
    pub(crate) fn from_bytes(bytes: &[u8; BLOCK_BYTES]) -> Self {
        Self(u128::from_le_bytes(*bytes))
    }

    /// Bit at absolute position `p` (0..128), whichever word holds it.
    #[inline]
    pub(crate) fn bit(self, p: u32) -> u32 {
        ((self.0 >> p) & 1) as u32
    }

    /// `width` bits (at most 32) starting at absolute position `offset`.
    #[inline]
    pub(crate) fn bits(self, offset: u32, width: u32) -> u32 {
        if width == 0 {
            return 0;
        }
        ((self.0 >> offset) as u32) & (u32::MAX >> (32 - width))
    }

    pub(crate) fn reader(self) -> BitReader {
        BitReader {
            block: self,
            position: 0,
        }
    }
}

/// Sequential LSB-first reader over a [`Block`].
///
/// Reads past bit 128 yield zeros; mode tables guarantee they never happen.
pub(crate) struct BitReader {
    block: Block,
    position: u32,
}

impl BitReader {
    #[inline]
    pub(crate) fn position(&self) -> u32 {
        self.position
    }

    #[inline]
    pub(crate) fn skip(&mut self, width: u32) {
        self.position += width;
    }

    #[inline]
    pub(crate) fn read(&mut self, width: u32) -> u32 {
        let value = if self.position >= 128 {
            0
        } else {
            self.block.bits(self.position, width)
        };
        self.position += width;
        value
    }

    /// Read `width` bits and mirror them (first bit read lands in the top position).
    #[inline]
    pub(crate) fn read_reversed(&mut self, width: u32) -> u32 {
        let value = self.read(width);
        if width == 0 {
            0
        } else {
            value.reverse_bits() >> (32 - width)
        }
    }
}
