use crate::buffer::ReadOutcome;
use crate::error::BufferResult;
use crate::page::{BLOCK_SIZE, Block, BlockIndex};
use bytes::{Bytes, BytesMut};
use std::fmt::{self, Debug, Display};

/// Diagnostic sink attached to a [`PagedBuffer`](crate::buffer::PagedBuffer).
///
/// Observers only ever see read-only snapshots and cannot change buffer state.
/// Every hook defaults to doing nothing.
pub trait Observer: Send + Debug {
    /// A new block was appended at index `block`.
    fn on_allocate(&mut self, _block: usize, _state: Snapshot<'_>) {}

    /// A read finished, `data` holds the bytes handed to the caller.
    fn on_read(&mut self, _data: &[u8], _outcome: ReadOutcome, _state: Snapshot<'_>) {}

    /// A write finished, `data` holds the bytes that were stored.
    fn on_write(&mut self, _data: &[u8], _state: Snapshot<'_>) {}

    /// A seek finished, successfully or not.
    fn on_seek(&mut self, _result: &BufferResult<u64>, _state: Snapshot<'_>) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Block count, cursor and logical length of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferStats {
    pub blocks: usize,
    pub cursor: usize,
    pub length: usize,
}

impl Display for BufferStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PagedBuffer{{blocks: {}, cursor: {}, length: {}}}",
            self.blocks, self.cursor, self.length
        )
    }
}

/// Borrowed, read-only view of a buffer's state.
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    blocks: &'a [Block],
    cursor: usize,
    length: usize,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(blocks: &'a [Block], cursor: usize, length: usize) -> Self {
        Self {
            blocks,
            cursor,
            length,
        }
    }

    pub fn stats(&self) -> BufferStats {
        BufferStats {
            blocks: self.blocks.len(),
            cursor: self.cursor,
            length: self.length,
        }
    }

    /// Iterate over the logically valid part of each block, in order.
    pub fn chunks(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let length = self.length;
        let last = BlockIndex::from_offset(length.saturating_sub(1));
        self.blocks
            .iter()
            .enumerate()
            .take_while(move |(i, _)| length > 0 && *i <= last.block)
            .map(move |(i, block)| {
                let end = if i == last.block {
                    last.byte + 1
                } else {
                    BLOCK_SIZE
                };
                &block.data()[..end]
            })
    }

    /// Copy the logically valid contents out of the blocks.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.length);
        for chunk in self.chunks() {
            out.extend_from_slice(chunk);
        }
        out.freeze()
    }
}

impl Debug for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.stats(), f)
    }
}
