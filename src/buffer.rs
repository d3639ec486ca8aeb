//! Growable, seekable in-memory buffer backed by fixed-size blocks.

pub mod logging;
pub mod observer;

use crate::error::{BufferError, BufferResult};
use crate::page::{BLOCK_SIZE, Block, BlockIndex};
use bytes::Bytes;
use observer::{BufferStats, NoopObserver, Observer, Snapshot};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Reference point for [`PagedBuffer::seek_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekOrigin {
    Start,
    Current,
    End,
}

impl TryFrom<i32> for SeekOrigin {
    type Error = BufferError;

    /// Numeric origins follow the classic `whence` values: 0, 1 and 2.
    fn try_from(whence: i32) -> BufferResult<Self> {
        match whence {
            0 => Ok(SeekOrigin::Start),
            1 => Ok(SeekOrigin::Current),
            2 => Ok(SeekOrigin::End),
            other => Err(BufferError::InvalidOrigin(other)),
        }
    }
}

/// Result of a [`PagedBuffer::read_chunk`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Number of bytes copied into the destination.
    pub count: usize,
    /// No bytes are available at the cursor after this read.
    pub end_of_data: bool,
}

/// A random-access byte buffer that grows one block at a time.
///
/// Previously written bytes never move: storage is a list of [`BLOCK_SIZE`]
/// blocks and every access goes through [`BlockIndex`] translation of the
/// cursor. The cursor is always within `0..=len()`.
#[derive(Debug)]
pub struct PagedBuffer {
    blocks: Vec<Block>,
    cursor: usize,
    length: usize,
    observer: Box<dyn Observer>,
}

impl PagedBuffer {
    pub fn new() -> Self {
        Self::with_observer(Box::new(NoopObserver))
    }

    pub fn with_observer(observer: Box<dyn Observer>) -> Self {
        Self {
            blocks: Vec::new(),
            cursor: 0,
            length: 0,
            observer,
        }
    }

    /// Logical length: one past the highest offset ever written.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Allocated bytes, including the unused tail of the last block.
    pub fn capacity(&self) -> usize {
        self.blocks.len() * BLOCK_SIZE
    }

    pub fn stats(&self) -> BufferStats {
        self.snapshot().stats()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(&self.blocks, self.cursor, self.length)
    }

    /// Copy of the logically valid contents.
    pub fn to_bytes(&self) -> Bytes {
        self.snapshot().to_bytes()
    }

    /// Copy bytes at the cursor into `dst`, advancing the cursor.
    ///
    /// Stops early when the logical length is reached. Bytes at or beyond the
    /// logical length are never returned, even if their block is allocated.
    pub fn read_chunk(&mut self, dst: &mut [u8]) -> ReadOutcome {
        let mut count = 0;
        let mut end_of_data = false;
        while count < dst.len() {
            let available = self.available();
            if available.is_empty() {
                end_of_data = true;
                break;
            }
            let n = available.len().min(dst.len() - count);
            dst[count..count + n].copy_from_slice(&available[..n]);
            self.cursor += n;
            count += n;
        }
        if self.cursor >= self.length {
            end_of_data = true;
        }

        let outcome = ReadOutcome { count, end_of_data };
        self.observer.on_read(
            &dst[..count],
            outcome,
            Snapshot::new(&self.blocks, self.cursor, self.length),
        );
        outcome
    }

    /// Store all of `src` at the cursor, allocating blocks as needed.
    ///
    /// Overwrites existing bytes and extends the logical length when writing
    /// past it. Only allocation failure can stop a write, and that aborts.
    pub fn write_chunk(&mut self, src: &[u8]) -> usize {
        let mut written = 0;
        while written < src.len() {
            let index = BlockIndex::from_offset(self.cursor);
            // cursor <= capacity, so at most one block is missing
            if index.block >= self.blocks.len() {
                self.blocks.push(Block::new());
                self.observer.on_allocate(
                    self.blocks.len() - 1,
                    Snapshot::new(&self.blocks, self.cursor, self.length),
                );
            }

            let target = &mut self.blocks[index.block].data_mut()[index.byte..];
            let n = target.len().min(src.len() - written);
            target[..n].copy_from_slice(&src[written..written + n]);
            self.cursor += n;
            written += n;
            if self.cursor > self.length {
                self.length = self.cursor;
            }
        }

        self.observer.on_write(
            src,
            Snapshot::new(&self.blocks, self.cursor, self.length),
        );
        written
    }

    /// Move the cursor relative to `origin`.
    ///
    /// The target must lie within `0..=len()`; a failed seek leaves the cursor
    /// where it was.
    pub fn seek_to(&mut self, offset: i64, origin: SeekOrigin) -> BufferResult<u64> {
        let base = match origin {
            SeekOrigin::Start => 0,
            SeekOrigin::Current => self.cursor as i128,
            SeekOrigin::End => self.length as i128,
        };
        let target = base + offset as i128;

        let result = if target < 0 || target > self.length as i128 {
            Err(BufferError::OutOfRange {
                offset: target,
                length: self.length,
            })
        } else {
            self.cursor = target as usize;
            Ok(self.cursor as u64)
        };

        self.observer.on_seek(
            &result,
            Snapshot::new(&self.blocks, self.cursor, self.length),
        );
        result
    }

    /// Like [`seek_to`](Self::seek_to) with a numeric origin (0, 1 or 2).
    pub fn seek_whence(&mut self, offset: i64, whence: i32) -> BufferResult<u64> {
        let origin = SeekOrigin::try_from(whence)?;
        self.seek_to(offset, origin)
    }

    /// Release the buffer and all of its blocks.
    pub fn close(self) {}

    /// Readable bytes of the block holding the cursor.
    fn available(&self) -> &[u8] {
        if self.cursor >= self.length {
            return &[];
        }
        let index = BlockIndex::from_offset(self.cursor);
        let Some(block) = self.blocks.get(index.block) else {
            return &[];
        };

        let last = BlockIndex::from_offset(self.length - 1);
        let end = if index.block == last.block {
            last.byte + 1
        } else {
            BLOCK_SIZE
        };
        &block.data()[index.byte..end]
    }
}

impl Default for PagedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PagedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.stats(), f)
    }
}

impl Read for PagedBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_chunk(buf).count)
    }
}

impl Write for PagedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_chunk(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for PagedBuffer {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, origin) = match pos {
            SeekFrom::Start(n) => {
                let offset = i64::try_from(n).map_err(|_| BufferError::OutOfRange {
                    offset: n as i128,
                    length: self.length,
                })?;
                (offset, SeekOrigin::Start)
            }
            SeekFrom::Current(n) => (n, SeekOrigin::Current),
            SeekFrom::End(n) => (n, SeekOrigin::End),
        };
        Ok(self.seek_to(offset, origin)?)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.cursor as u64)
    }
}
