//! Fixed-size backing blocks and offset translation.
//!
//! A buffer's logical offset space is split into blocks of [`BLOCK_SIZE`] bytes.
//! Because the block size is a power of two, a logical offset translates into a
//! block index and an intra-block offset with a shift and a mask.

/// Power of two of the block size. This is the only tunable constant.
pub const BLOCK_POW2: u32 = 15;

/// Size of a single block in bytes.
pub const BLOCK_SIZE: usize = 1 << BLOCK_POW2;

/// Mask selecting the intra-block part of a logical offset.
pub const BLOCK_MASK: usize = BLOCK_SIZE - 1;

/// A zero-initialized block of storage.
pub struct Block {
    data: Box<[u8; BLOCK_SIZE]>,
}

impl Block {
    pub fn new() -> Self {
        Self {
            data: Box::new([0u8; BLOCK_SIZE]),
        }
    }

    pub fn data(&self) -> &[u8; BLOCK_SIZE] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8; BLOCK_SIZE] {
        &mut self.data
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Block([u8; {}])", BLOCK_SIZE)
    }
}

/// A logical offset split into its block index and the byte within that block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockIndex {
    pub block: usize,
    pub byte: usize,
}

impl BlockIndex {
    pub fn from_offset(offset: usize) -> Self {
        Self {
            block: offset >> BLOCK_POW2,
            byte: offset & BLOCK_MASK,
        }
    }

    /// Reassemble the logical offset.
    pub fn offset(&self) -> usize {
        (self.block << BLOCK_POW2) | (self.byte & BLOCK_MASK)
    }
}

impl From<usize> for BlockIndex {
    fn from(offset: usize) -> Self {
        Self::from_offset(offset)
    }
}
